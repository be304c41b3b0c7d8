use crate::puzzle::{Puzzle, Square};

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    height: u8,
    width: u8,
    squares: Vec<Square>,
    errors: Vec<bool>,
}

impl Board {
    pub fn new(puzzle: &Puzzle) -> Self {
        let mut squares = Vec::with_capacity(puzzle.height as usize * puzzle.width as usize);
        for row in &puzzle.grid {
            for square in row {
                squares.push(if square.is_block() {
                    Square::Block
                } else {
                    Square::Empty
                });
            }
        }
        let errors = vec![false; squares.len()];
        Self {
            height: puzzle.height,
            width: puzzle.width,
            squares,
            errors,
        }
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    fn index(&self, row: u8, col: u8) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| row as usize * self.width as usize + col as usize)
    }

    pub fn square(&self, row: u8, col: u8) -> Square {
        self.index(row, col)
            .map(|idx| self.squares[idx])
            .unwrap_or(Square::Block)
    }

    pub fn error(&self, row: u8, col: u8) -> bool {
        self.index(row, col)
            .map(|idx| self.errors[idx])
            .unwrap_or(false)
    }

    // Blocked cells are never written; a re-edit clears the error flag.
    pub fn set_square(&mut self, row: u8, col: u8, square: Square) -> bool {
        if square.is_block() {
            return false;
        }
        let Some(idx) = self.index(row, col) else {
            return false;
        };
        if self.squares[idx].is_block() {
            return false;
        }
        self.squares[idx] = square;
        self.errors[idx] = false;
        true
    }

    pub fn clear_square(&mut self, row: u8, col: u8) -> bool {
        self.set_square(row, col, Square::Empty)
    }

    pub fn replace(&mut self, grid: &[Vec<Square>], errors: &[Vec<bool>]) -> bool {
        let height = self.height as usize;
        let width = self.width as usize;
        if grid.len() != height || errors.len() != height {
            return false;
        }
        if grid.iter().any(|row| row.len() != width) || errors.iter().any(|row| row.len() != width) {
            return false;
        }
        for (row_idx, (row, error_row)) in grid.iter().zip(errors).enumerate() {
            for (col_idx, (square, flagged)) in row.iter().zip(error_row).enumerate() {
                let idx = row_idx * width + col_idx;
                self.squares[idx] = *square;
                self.errors[idx] = *flagged;
            }
        }
        true
    }

    pub fn is_solved(&self, puzzle: &Puzzle) -> bool {
        if puzzle.height != self.height || puzzle.width != self.width {
            return false;
        }
        puzzle
            .grid
            .iter()
            .flatten()
            .zip(&self.squares)
            .all(|(solution, entered)| solution == entered)
    }

    pub fn grid_rows(&self) -> Vec<Vec<Square>> {
        self.squares
            .chunks(self.width as usize)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    pub fn error_rows(&self) -> Vec<Vec<bool>> {
        self.errors
            .chunks(self.width as usize)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}
