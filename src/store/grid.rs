//! Tile grid for the store floor
//!
//! The grid is an arena of cells addressed by row-major index. It holds only
//! terrain; per-search scratch data lives in `pathfinding::SearchContext`, so a
//! single grid can serve any number of concurrent searches.

use ahash::{AHashMap, AHashSet};
use rand::Rng;

use crate::core::error::{Result, SimError};
use crate::core::types::{Coord, Region};
use crate::store::zone::Zone;

/// Upper bound on random draws when looking for a standing cell near a zone
pub const MAX_TARGET_ATTEMPTS: u32 = 500;

/// A single tile of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub zone: Zone,
}

impl Cell {
    pub fn coord(&self) -> Coord {
        (self.row, self.col)
    }

    pub fn symbol(&self) -> char {
        self.zone.symbol()
    }
}

/// Immutable store map with obstacle and zone-region metadata
#[derive(Debug, Clone)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Cell>,
    obstacles: AHashSet<Zone>,
    regions: AHashMap<Zone, Region>,
}

impl Grid {
    /// Build a grid from layout rows of equal length
    ///
    /// Only walls (`#`) are impassable until `with_obstacles` says otherwise.
    pub fn build<S: AsRef<str>>(layout: &[S]) -> Result<Self> {
        let Some(first) = layout.first() else {
            return Err(SimError::MalformedLayout("layout has no rows".into()));
        };
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(SimError::MalformedLayout("layout rows are empty".into()));
        }

        let mut cells = Vec::with_capacity(layout.len() * cols);
        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != cols {
                return Err(SimError::MalformedLayout(format!(
                    "row {} has {} columns, expected {}",
                    row, width, cols
                )));
            }
            for (col, symbol) in line.chars().enumerate() {
                let zone = Zone::from_symbol(symbol).ok_or_else(|| {
                    SimError::MalformedLayout(format!(
                        "unknown symbol '{}' at ({}, {})",
                        symbol, row, col
                    ))
                })?;
                cells.push(Cell { row, col, zone });
            }
        }

        let mut obstacles = AHashSet::new();
        obstacles.insert(Zone::Background);

        Ok(Self {
            rows: layout.len(),
            cols,
            cells,
            obstacles,
            regions: AHashMap::new(),
        })
    }

    /// Build a grid from a newline-separated layout
    pub fn from_layout_str(layout: &str) -> Result<Self> {
        let rows: Vec<&str> = layout.trim().lines().map(str::trim_end).collect();
        Self::build(&rows)
    }

    /// Replace the set of impassable zones
    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Zone>) -> Self {
        self.obstacles = obstacles.into_iter().collect();
        self
    }

    /// Register the bounding boxes used to pick standing cells near zones
    pub fn with_regions(mut self, regions: impl IntoIterator<Item = (Zone, Region)>) -> Result<Self> {
        for (zone, region) in regions {
            if region.rows.0 > region.rows.1 || region.cols.0 > region.cols.1 {
                return Err(SimError::MalformedLayout(format!(
                    "region for {} is inverted: {:?}",
                    zone, region
                )));
            }
            if region.rows.1 >= self.rows || region.cols.1 >= self.cols {
                return Err(SimError::MalformedLayout(format!(
                    "region for {} ({:?}) exceeds {}x{} grid",
                    zone, region, self.rows, self.cols
                )));
            }
            self.regions.insert(zone, region);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, (row, col): Coord) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    /// Cell at an arena index. Panics if out of range.
    #[inline]
    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn obstacles(&self) -> &AHashSet<Zone> {
        &self.obstacles
    }

    pub fn region(&self, zone: Zone) -> Option<&Region> {
        self.regions.get(&zone)
    }

    pub fn regions(&self) -> impl Iterator<Item = (Zone, &Region)> + '_ {
        self.regions.iter().map(|(zone, region)| (*zone, region))
    }

    /// Axis-aligned in-bounds neighbors in up, down, left, right order
    pub fn neighbors(&self, cell: &Cell) -> impl Iterator<Item = &Cell> + '_ {
        let (row, col) = cell.coord();
        let candidates = [
            row.checked_sub(1).map(|r| (r, col)),
            (row + 1 < self.rows).then_some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            (col + 1 < self.cols).then_some((row, col + 1)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter_map(move |coord| self.get(coord))
    }

    /// Pick the cell a walk to `zone` should end on
    ///
    /// Exact resolution returns the cell carrying the zone's symbol. Entrance
    /// and exit must be unique; for other zones the first cell in row-major
    /// order wins. Approximate resolution draws random cells from the zone's
    /// region until one is not itself part of the zone.
    pub fn resolve_target<R: Rng + ?Sized>(&self, zone: Zone, exact: bool, rng: &mut R) -> Result<&Cell> {
        if exact {
            return self.resolve_exact(zone);
        }

        let region = self
            .regions
            .get(&zone)
            .ok_or(SimError::TargetResolution { zone, attempts: 0 })?;

        for _ in 0..MAX_TARGET_ATTEMPTS {
            let row = rng.gen_range(region.rows.0..=region.rows.1);
            let col = rng.gen_range(region.cols.0..=region.cols.1);
            if let Some(cell) = self.get((row, col)) {
                if cell.zone != zone {
                    return Ok(cell);
                }
            }
        }

        Err(SimError::TargetResolution {
            zone,
            attempts: MAX_TARGET_ATTEMPTS,
        })
    }

    /// The cell carrying `zone`'s symbol
    ///
    /// A repeated interior zone resolves to its first cell in row-major order,
    /// not its last.
    pub fn resolve_exact(&self, zone: Zone) -> Result<&Cell> {
        let mut matches = self.cells.iter().filter(|cell| cell.zone == zone);
        let first = matches.next().ok_or(SimError::SymbolNotFound {
            symbol: zone.symbol(),
            found: 0,
        })?;

        if zone.is_terminal() {
            let extra = matches.count();
            if extra > 0 {
                return Err(SimError::SymbolNotFound {
                    symbol: zone.symbol(),
                    found: extra + 1,
                });
            }
        }

        Ok(first)
    }
}
