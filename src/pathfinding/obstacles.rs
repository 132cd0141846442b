//! Obstacle policy for a single search

use ahash::AHashSet;

use crate::pathfinding::PathRequest;
use crate::store::{Grid, Zone};

/// Zones a search may not step onto
///
/// Built fresh for every query from the grid's base set, so extensions never
/// accumulate across searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleSet {
    zones: AHashSet<Zone>,
}

impl ObstacleSet {
    /// The grid's own impassable zones
    pub fn base(grid: &Grid) -> Self {
        Self {
            zones: grid.obstacles().clone(),
        }
    }

    /// Obstacles for `request`
    ///
    /// A customer heading for the area around a zone keeps out of every
    /// registered zone except the exit.
    pub fn for_request(grid: &Grid, request: &PathRequest) -> Self {
        let mut obstacles = Self::base(grid);
        if !request.is_exact_target() {
            obstacles.zones.extend(
                grid.regions()
                    .map(|(zone, _)| zone)
                    .filter(|zone| *zone != Zone::Exit),
            );
        }
        obstacles
    }

    #[inline]
    pub fn blocks(&self, zone: Zone) -> bool {
        self.zones.contains(&zone)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
