use crate::puzzle::Puzzle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub entry: usize,
    pub cell: usize,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self { entry: 0, cell: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("no entry with that name")]
    EntryNotFound,
    #[error("no entry contains that cell")]
    InvalidCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl NavigationState {
    pub fn position(&self, puzzle: &Puzzle) -> (u8, u8) {
        puzzle.entries[self.entry].cells[self.cell]
    }

    pub fn go_to_entry(self, puzzle: &Puzzle, name: &str) -> Result<Self, NavError> {
        let entry = puzzle.entry_index(name).ok_or(NavError::EntryNotFound)?;
        Ok(Self { entry, cell: 0 })
    }

    // Tie-break on intersections: re-clicking the active cell toggles
    // orientation, otherwise the current orientation is kept.
    pub fn go_to_cell(self, puzzle: &Puzzle, row: u8, col: u8) -> Result<Self, NavError> {
        let candidates = puzzle.entries_containing(row, col);
        let Some(&first) = candidates.first() else {
            return Err(NavError::InvalidCell);
        };
        let chosen = if candidates.len() == 1 {
            first
        } else {
            let orientation = puzzle.entries[self.entry].orientation();
            let wanted = if (row, col) == self.position(puzzle) {
                orientation.opposite()
            } else {
                orientation
            };
            candidates
                .iter()
                .copied()
                .find(|&idx| puzzle.entries[idx].orientation() == wanted)
                .unwrap_or(first)
        };
        let cell = puzzle.entries[chosen]
            .cells
            .iter()
            .position(|&(r, c)| (r, c) == (row, col))
            .ok_or(NavError::InvalidCell)?;
        Ok(Self { entry: chosen, cell })
    }

    pub fn advance_for_letter(self, puzzle: &Puzzle) -> Self {
        if self.cell + 1 < puzzle.entries[self.entry].cells.len() {
            Self {
                entry: self.entry,
                cell: self.cell + 1,
            }
        } else {
            Self {
                entry: (self.entry + 1) % puzzle.entries.len(),
                cell: 0,
            }
        }
    }

    pub fn retreat_for_backspace(self, puzzle: &Puzzle) -> Self {
        if self.cell > 0 {
            Self {
                entry: self.entry,
                cell: self.cell - 1,
            }
        } else {
            let count = puzzle.entries.len();
            let entry = (self.entry + count - 1) % count;
            Self {
                entry,
                cell: puzzle.entries[entry].cells.len() - 1,
            }
        }
    }

    pub fn next_entry(self, puzzle: &Puzzle) -> Self {
        Self {
            entry: (self.entry + 1) % puzzle.entries.len(),
            cell: 0,
        }
    }

    pub fn toggle_orientation(self, puzzle: &Puzzle) -> Self {
        let (row, col) = self.position(puzzle);
        self.go_to_cell(puzzle, row, col).unwrap_or(self)
    }

    // Bounded to one lap of the scanned dimension; a fully blocked lane
    // leaves the state unchanged.
    pub fn step_directional(self, puzzle: &Puzzle, direction: Direction) -> Self {
        let (row, col) = self.position(puzzle);
        let height = puzzle.height as usize;
        let width = puzzle.width as usize;
        let lap = match direction {
            Direction::Up | Direction::Down => height,
            Direction::Left | Direction::Right => width,
        };
        let mut r = row as usize;
        let mut c = col as usize;
        for _ in 1..lap {
            match direction {
                Direction::Up => r = (r + height - 1) % height,
                Direction::Down => r = (r + 1) % height,
                Direction::Left => c = (c + width - 1) % width,
                Direction::Right => c = (c + 1) % width,
            }
            if let Ok(next) = self.go_to_cell(puzzle, r as u8, c as u8) {
                return next;
            }
        }
        self
    }
}
