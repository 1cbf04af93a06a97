//! Board snapshot
//!
//! Row-major grid decoded from the flattened board string of a status line.
//! Row 0 is the first `width` symbols.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{BoardError, Result};

/// Symbol for an empty intersection
pub const EMPTY_SYMBOL: char = '.';

/// Symbol for a blocked intersection
pub const WALL_SYMBOL: char = '/';

/// Classification of a single board symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cell {
    Empty,
    Wall,
    /// Stone of the player using this marker
    Player(char),
}

impl From<char> for Cell {
    fn from(symbol: char) -> Self {
        match symbol {
            EMPTY_SYMBOL => Cell::Empty,
            WALL_SYMBOL => Cell::Wall,
            other => Cell::Player(other),
        }
    }
}

/// Immutable board snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl Board {
    /// Decode a flattened board string
    ///
    /// Fails when a dimension is zero or when the string does not hold
    /// exactly `width * height` symbols.
    pub fn from_flat(width: u32, height: u32, flat: &str) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BoardError::Protocol(format!(
                "board dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                BoardError::Protocol(format!("board {width}x{height} is too large"))
            })?;

        let cells: Vec<char> = flat.chars().collect();
        if cells.len() != expected {
            return Err(BoardError::Protocol(format!(
                "board string has {} cells, expected {width}x{height} = {expected}",
                cells.len()
            )));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw symbol at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Classified cell at column `x`, row `y`
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        self.get(x, y).map(Cell::from)
    }

    /// Rows of symbols, top to bottom
    pub fn rows(&self) -> Vec<Vec<char>> {
        self.cells
            .chunks(self.width as usize)
            .map(<[char]>::to_vec)
            .collect()
    }

    /// Re-flatten row-major; inverse of `from_flat`
    pub fn to_flat_string(&self) -> String {
        self.cells.iter().collect()
    }

    /// Number of cells holding each symbol
    pub fn symbol_counts(&self) -> BTreeMap<char, usize> {
        let mut counts = BTreeMap::new();
        for &symbol in &self.cells {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        counts
    }

    /// Coordinates of every empty cell, row-major
    pub fn empty_cells(&self) -> Vec<(u32, u32)> {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &symbol)| Cell::from(symbol) == Cell::Empty)
            .map(|(i, _)| ((i % width) as u32, (i / width) as u32))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.cells {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
