//! A* pathfinding over the store grid
//!
//! Movement is 4-connected with unit cost, so Manhattan distance is an
//! admissible and consistent heuristic and returned paths are shortest.
//!
//! Ties in `f` are broken by lower `h`, then by push order. Among several
//! shortest paths the one returned is therefore fixed for a given grid and
//! request, but it is not otherwise special.

pub mod context;
pub mod obstacles;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::Rng;

use crate::core::error::{Result, SimError};
use crate::core::types::Coord;
use crate::store::{Cell, Grid, Zone};

pub use context::SearchContext;
pub use obstacles::ObstacleSet;

/// What a customer wants to walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRequest {
    pub start: Zone,
    pub end: Zone,
    pub efficient: bool,
}

impl PathRequest {
    pub fn new(start: Zone, end: Zone, efficient: bool) -> Self {
        Self { start, end, efficient }
    }

    /// Efficient customers and walks to the entrance or exit end on the zone cell itself
    pub fn is_exact_target(&self) -> bool {
        self.efficient || self.end.is_terminal()
    }
}

/// Entry in the A* open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    h: u32,
    seq: u64,
    idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manhattan distance between two cells
#[inline]
pub fn heuristic(cell: &Cell, target: &Cell) -> u32 {
    (cell.row.abs_diff(target.row) + cell.col.abs_diff(target.col)) as u32
}

/// One search from a start cell to a resolved target cell
pub struct PathFinder<'a> {
    grid: &'a Grid,
    context: &'a mut SearchContext,
    obstacles: ObstacleSet,
    start: usize,
    target: usize,
}

impl<'a> PathFinder<'a> {
    /// Resolve endpoints and obstacles for `request`
    ///
    /// The context is reset here, so whatever a previous search left in it is
    /// discarded.
    pub fn new<R: Rng + ?Sized>(
        grid: &'a Grid,
        request: &PathRequest,
        context: &'a mut SearchContext,
        rng: &mut R,
    ) -> Result<Self> {
        let start = grid.resolve_exact(request.start)?.coord();
        let target = grid
            .resolve_target(request.end, request.is_exact_target(), rng)?
            .coord();
        let obstacles = ObstacleSet::for_request(grid, request);

        context.reset(grid.len());

        Ok(Self {
            grid,
            context,
            obstacles,
            start: to_index(grid, start)?,
            target: to_index(grid, target)?,
        })
    }

    pub fn start(&self) -> &Cell {
        self.grid.cell(self.start)
    }

    pub fn target(&self) -> &Cell {
        self.grid.cell(self.target)
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Run A* to completion
    pub fn search(mut self) -> Result<Vec<Coord>> {
        let grid = self.grid;
        let target_cell = grid.cell(self.target);
        let mut open_set = BinaryHeap::new();
        let mut seq: u64 = 0;

        let start_h = heuristic(grid.cell(self.start), target_cell);
        self.context.update(self.start, 0, start_h, None);
        open_set.push(OpenEntry {
            f: start_h,
            h: start_h,
            seq,
            idx: self.start,
        });

        while let Some(current) = open_set.pop() {
            // Stale entry superseded by a cheaper push
            if self.context.is_closed(current.idx) {
                continue;
            }
            self.context.close(current.idx);

            if current.idx == self.target {
                let path = self.context.reconstruct(grid, self.target);
                tracing::debug!(
                    "Path {:?} -> {:?}: {} steps, {} cells explored",
                    grid.cell(self.start).coord(),
                    target_cell.coord(),
                    path.len() - 1,
                    self.context.explored()
                );
                return Ok(path);
            }

            let tentative_g = self.context.g(current.idx) + 1;
            for neighbor in grid.neighbors(grid.cell(current.idx)) {
                if self.obstacles.blocks(neighbor.zone) {
                    continue;
                }
                let Some(n_idx) = grid.index(neighbor.coord()) else {
                    continue;
                };
                if self.context.is_closed(n_idx) {
                    continue;
                }

                if !self.context.is_open(n_idx) || tentative_g < self.context.g(n_idx) {
                    let h = heuristic(neighbor, target_cell);
                    self.context.update(n_idx, tentative_g, h, Some(current.idx));
                    seq += 1;
                    open_set.push(OpenEntry {
                        f: tentative_g + h,
                        h,
                        seq,
                        idx: n_idx,
                    });
                }
            }
        }

        tracing::debug!(
            "No path {:?} -> {:?} after exploring {} cells",
            grid.cell(self.start).coord(),
            target_cell.coord(),
            self.context.explored()
        );
        Err(SimError::NoPathFound {
            from: grid.cell(self.start).coord(),
            to: target_cell.coord(),
        })
    }
}

fn to_index(grid: &Grid, coord: Coord) -> Result<usize> {
    grid.index(coord).ok_or_else(|| {
        SimError::MalformedLayout(format!("cell {:?} outside {}x{} grid", coord, grid.rows, grid.cols))
    })
}

/// Find a walking route for `request`, inclusive of both endpoints
pub fn find_path<R: Rng + ?Sized>(grid: &Grid, request: &PathRequest, rng: &mut R) -> Result<Vec<Coord>> {
    let mut context = SearchContext::new(grid.len());
    find_path_with(grid, request, &mut context, rng)
}

/// Like `find_path`, reusing a caller-owned scratch context
pub fn find_path_with<R: Rng + ?Sized>(
    grid: &Grid,
    request: &PathRequest,
    context: &mut SearchContext,
    rng: &mut R,
) -> Result<Vec<Coord>> {
    PathFinder::new(grid, request, context, rng)?.search()
}

/// Number of moves in a path
pub fn path_length(path: &[Coord]) -> usize {
    path.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn is_connected(path: &[Coord]) -> bool {
        path.windows(2)
            .all(|w| w[0].0.abs_diff(w[1].0) + w[0].1.abs_diff(w[1].1) == 1)
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let grid = Grid::build(&["G....", ".....", ".....", ".....", "....E"]).unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Exit, true);

        let path = find_path(&grid, &request, &mut rng()).unwrap();

        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(4, 4)));
        assert!(is_connected(&path));
    }

    #[test]
    fn test_path_through_wall_gap() {
        let grid = Grid::build(&["G....", ".....", "##.##", ".....", "....E"]).unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Exit, true);

        let path = find_path(&grid, &request, &mut rng()).unwrap();

        assert!(path.contains(&(2, 2)));
        assert_eq!(path_length(&path), 8);
        assert!(is_connected(&path));
    }

    #[test]
    fn test_walled_off_target() {
        let grid = Grid::build(&["G....", ".....", "#####", ".....", "....E"]).unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Exit, true);

        let result = find_path(&grid, &request, &mut rng());

        assert!(matches!(
            result,
            Err(SimError::NoPathFound { from: (0, 0), to: (4, 4) })
        ));
    }

    #[test]
    fn test_same_start_and_end() {
        let grid = Grid::default_store().unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Entrance, false);

        let path = find_path(&grid, &request, &mut rng()).unwrap();

        assert_eq!(path, vec![(11, 16)]);
    }

    #[test]
    fn test_start_symbol_missing() {
        let grid = Grid::build(&["....", "...E"]).unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Exit, true);
        assert!(matches!(
            find_path(&grid, &request, &mut rng()),
            Err(SimError::SymbolNotFound { symbol: 'G', .. })
        ));
    }

    #[test]
    fn test_inefficient_customer_stops_beside_zone() {
        let grid = Grid::default_store().unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Dairy, false);
        let mut rng = rng();

        for _ in 0..20 {
            let path = find_path(&grid, &request, &mut rng).unwrap();
            let end = *path.last().unwrap();
            let region = grid.region(Zone::Dairy).unwrap();
            assert!(region.contains(end));
            assert_eq!(grid.get(end).unwrap().zone, Zone::Floor);
            // Only the start cell may belong to a section
            for coord in &path[1..] {
                assert_eq!(grid.get(*coord).unwrap().zone, Zone::Floor);
            }
        }
    }

    #[test]
    fn test_efficient_customer_walks_onto_zone() {
        let grid = Grid::default_store().unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Spices, true);

        let path = find_path(&grid, &request, &mut rng()).unwrap();

        assert_eq!(path.last(), Some(&(2, 10)));
        assert!(is_connected(&path));
    }

    #[test]
    fn test_inefficient_exit_walk_is_exact() {
        let grid = Grid::default_store().unwrap();
        let request = PathRequest::new(Zone::Checkout, Zone::Exit, false);

        let path = find_path(&grid, &request, &mut rng()).unwrap();

        assert_eq!(path.first(), Some(&(8, 5)));
        assert_eq!(path.last(), Some(&(11, 3)));
    }

    #[test]
    fn test_custom_obstacle_zone_forces_detour() {
        // Drinks shelves act as a wall once marked impassable
        let layout = ["G.L..", "..L..", "..L..", ".....", "....E"];
        let request = PathRequest::new(Zone::Entrance, Zone::Exit, true);

        let open = Grid::build(&layout).unwrap();
        let walled = Grid::build(&layout)
            .unwrap()
            .with_obstacles([Zone::Background, Zone::Drinks]);

        let direct = find_path(&open, &request, &mut rng()).unwrap();
        let detour = find_path(&walled, &request, &mut rng()).unwrap();

        assert_eq!(path_length(&direct), 8);
        assert_eq!(path_length(&detour), 8);
        assert!(detour.iter().all(|c| walled.get(*c).unwrap().zone != Zone::Drinks));
        assert!(detour.iter().filter(|c| c.1 == 2).all(|c| c.0 >= 3));

        let blocked = Grid::build(&["G.L..", "..L..", "..L.E"])
            .unwrap()
            .with_obstacles([Zone::Drinks]);
        assert!(matches!(
            find_path(&blocked, &request, &mut rng()),
            Err(SimError::NoPathFound { .. })
        ));
    }

    #[test]
    fn test_path_finder_exposes_resolved_endpoints() {
        let grid = Grid::default_store().unwrap();
        let request = PathRequest::new(Zone::Checkout, Zone::Exit, false);
        let mut context = SearchContext::new(grid.len());

        let finder = PathFinder::new(&grid, &request, &mut context, &mut rng()).unwrap();

        assert_eq!(finder.start().coord(), (8, 5));
        assert_eq!(finder.target().coord(), (11, 3));
        assert!(finder.obstacles().blocks(Zone::Background));
        assert!(!finder.obstacles().blocks(Zone::Dairy));

        let path = finder.search().unwrap();
        assert_eq!(path.last(), Some(&(11, 3)));
    }

    #[test]
    fn test_context_reuse_gives_same_result() {
        let grid = Grid::default_store().unwrap();
        let request = PathRequest::new(Zone::Entrance, Zone::Exit, true);
        let mut context = SearchContext::new(grid.len());

        let first = find_path_with(&grid, &request, &mut context, &mut rng()).unwrap();
        assert!(!context.is_pristine());
        let second = find_path_with(&grid, &request, &mut context, &mut rng()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, find_path(&grid, &request, &mut rng()).unwrap());
    }

    #[test]
    fn test_open_entry_ordering() {
        let low_f = OpenEntry { f: 3, h: 2, seq: 5, idx: 0 };
        let high_f = OpenEntry { f: 4, h: 0, seq: 0, idx: 1 };
        let low_h = OpenEntry { f: 3, h: 1, seq: 9, idx: 2 };
        let early = OpenEntry { f: 3, h: 1, seq: 1, idx: 3 };

        let mut heap = BinaryHeap::from(vec![high_f, low_f, low_h, early]);
        assert_eq!(heap.pop().map(|e| e.idx), Some(3));
        assert_eq!(heap.pop().map(|e| e.idx), Some(2));
        assert_eq!(heap.pop().map(|e| e.idx), Some(0));
        assert_eq!(heap.pop().map(|e| e.idx), Some(1));
    }

    #[test]
    fn test_heuristic_is_manhattan() {
        let a = Cell { row: 1, col: 7, zone: Zone::Floor };
        let b = Cell { row: 4, col: 2, zone: Zone::Floor };
        assert_eq!(heuristic(&a, &b), 8);
        assert_eq!(heuristic(&b, &a), 8);
    }
}
