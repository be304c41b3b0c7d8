use std::collections::HashMap;
use std::fmt;

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, RkyvSerialize, RkyvDeserialize)]
pub enum Square {
    Block,
    Empty,
    Letter(char),
}

impl Square {
    pub fn is_block(self) -> bool {
        matches!(self, Square::Block)
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        upper.is_ascii_uppercase().then_some(Square::Letter(upper))
    }
}

// JSON form: "#" block, "" empty, single uppercase letter.
impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Square::Block => serializer.serialize_str("#"),
            Square::Empty => serializer.serialize_str(""),
            Square::Letter(ch) => serializer.serialize_char(*ch),
        }
    }
}

struct SquareVisitor;

impl Visitor<'_> for SquareVisitor {
    type Value = Square;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"#\", \"\" or a single letter")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Square, E> {
        match value {
            "#" => Ok(Square::Block),
            "" => Ok(Square::Empty),
            _ => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Square::from_letter(ch)
                        .ok_or_else(|| E::custom(format!("invalid square letter {value:?}"))),
                    _ => Err(E::custom(format!("invalid square {value:?}"))),
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Square, D::Error> {
        deserializer.deserialize_str(SquareVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Across,
    Down,
}

impl Orientation {
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Across => Orientation::Down,
            Orientation::Down => Orientation::Across,
        }
    }

    pub fn from_tag(ch: char) -> Option<Self> {
        match ch {
            'A' => Some(Orientation::Across),
            'D' => Some(Orientation::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub clue: String,
    pub cells: Vec<(u8, u8)>,
}

impl Entry {
    pub fn orientation(&self) -> Orientation {
        match self.name.as_bytes().first() {
            Some(b'D') => Orientation::Down,
            _ => Orientation::Across,
        }
    }

    // "A01" -> "1"
    pub fn number(&self) -> &str {
        let digits = self.name.get(1..).unwrap_or("");
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() { digits } else { trimmed }
    }

    pub fn anchor(&self) -> Option<(u8, u8)> {
        self.cells.first().copied()
    }

    pub fn contains(&self, row: u8, col: u8) -> bool {
        self.cells.iter().any(|&(r, c)| r == row && c == col)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub title: String,
    pub author: String,
    pub date: String,
    pub height: u8,
    pub width: u8,
    pub grid: Vec<Vec<Square>>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("grid is {found_rows} rows, expected {height}")]
    RowCountMismatch { height: u8, found_rows: usize },
    #[error("row {row} has {found_cols} columns, expected {width}")]
    ColCountMismatch { width: u8, row: usize, found_cols: usize },
    #[error("solution grid holds an empty square at ({row}, {col})")]
    EmptySolutionSquare { row: u8, col: u8 },
    #[error("puzzle has no entries")]
    NoEntries,
    #[error("entry {name:?} has a malformed name")]
    BadEntryName { name: String },
    #[error("duplicate entry name {name:?}")]
    DuplicateEntryName { name: String },
    #[error("entry {name:?} has no cells")]
    EmptyEntry { name: String },
    #[error("entry {name:?} cell ({row}, {col}) is out of bounds")]
    CellOutOfBounds { name: String, row: u8, col: u8 },
    #[error("entry {name:?} cell ({row}, {col}) is blocked")]
    BlockedEntryCell { name: String, row: u8, col: u8 },
}

impl Puzzle {
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.grid.len() != self.height as usize {
            return Err(PuzzleError::RowCountMismatch {
                height: self.height,
                found_rows: self.grid.len(),
            });
        }
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != self.width as usize {
                return Err(PuzzleError::ColCountMismatch {
                    width: self.width,
                    row,
                    found_cols: cells.len(),
                });
            }
            for (col, square) in cells.iter().enumerate() {
                if *square == Square::Empty {
                    return Err(PuzzleError::EmptySolutionSquare {
                        row: row as u8,
                        col: col as u8,
                    });
                }
            }
        }
        if self.entries.is_empty() {
            return Err(PuzzleError::NoEntries);
        }
        let mut seen = HashMap::new();
        for entry in &self.entries {
            let mut chars = entry.name.chars();
            let tag_ok = chars
                .next()
                .and_then(Orientation::from_tag)
                .is_some();
            let digits: String = chars.collect();
            if !tag_ok || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PuzzleError::BadEntryName {
                    name: entry.name.clone(),
                });
            }
            if seen.insert(entry.name.clone(), ()).is_some() {
                return Err(PuzzleError::DuplicateEntryName {
                    name: entry.name.clone(),
                });
            }
            if entry.cells.is_empty() {
                return Err(PuzzleError::EmptyEntry {
                    name: entry.name.clone(),
                });
            }
            for &(row, col) in &entry.cells {
                if row >= self.height || col >= self.width {
                    return Err(PuzzleError::CellOutOfBounds {
                        name: entry.name.clone(),
                        row,
                        col,
                    });
                }
                if self.grid[row as usize][col as usize].is_block() {
                    return Err(PuzzleError::BlockedEntryCell {
                        name: entry.name.clone(),
                        row,
                        col,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn in_bounds(&self, row: u8, col: u8) -> bool {
        row < self.height && col < self.width
    }

    pub fn is_blocked(&self, row: u8, col: u8) -> bool {
        !self.in_bounds(row, col) || self.grid[row as usize][col as usize].is_block()
    }

    pub fn entry_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn entries_containing(&self, row: u8, col: u8) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.contains(row, col))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn entries_with_orientation(
        &self,
        orientation: Orientation,
    ) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |entry| entry.orientation() == orientation)
    }

    pub fn start_cells(&self) -> HashMap<(u8, u8), String> {
        let mut cells = HashMap::new();
        for entry in &self.entries {
            if let Some(anchor) = entry.anchor() {
                cells.entry(anchor).or_insert_with(|| entry.number().to_string());
            }
        }
        cells
    }
}
