//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for customers, allocated sequentially and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

impl CustomerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation tick counter (one tick is one minute)
pub type Tick = u64;

/// Grid coordinate as (row, col)
pub type Coord = (usize, usize);

/// Inclusive rectangular region of grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub rows: (usize, usize),
    pub cols: (usize, usize),
}

impl Region {
    pub fn new(rows: (usize, usize), cols: (usize, usize)) -> Self {
        Self { rows, cols }
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row >= self.rows.0 && row <= self.rows.1 && col >= self.cols.0 && col <= self.cols.1
    }

    pub fn cell_count(&self) -> usize {
        (self.rows.1.saturating_sub(self.rows.0) + 1) * (self.cols.1.saturating_sub(self.cols.0) + 1)
    }
}
