//! Per-search scratch state
//!
//! Indexed by the grid's arena index. A context is never shared between two
//! running searches; reuse one across sequential searches by calling `reset`.

use crate::core::types::Coord;
use crate::store::Grid;

#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    g: Vec<u32>,
    h: Vec<u32>,
    f: Vec<u32>,
    parent: Vec<Option<usize>>,
    open: Vec<bool>,
    closed: Vec<bool>,
    explored: usize,
}

impl SearchContext {
    pub fn new(len: usize) -> Self {
        let mut context = Self::default();
        context.reset(len);
        context
    }

    /// Clear all scratch values and size the arrays for a grid of `len` cells
    pub fn reset(&mut self, len: usize) {
        for buffer in [&mut self.g, &mut self.h, &mut self.f] {
            buffer.clear();
            buffer.resize(len, 0);
        }
        self.parent.clear();
        self.parent.resize(len, None);
        self.open.clear();
        self.open.resize(len, false);
        self.closed.clear();
        self.closed.resize(len, false);
        self.explored = 0;
    }

    pub fn len(&self) -> usize {
        self.g.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g.is_empty()
    }

    /// True when no search has touched this context since the last reset
    pub fn is_pristine(&self) -> bool {
        self.explored == 0
            && self.g.iter().all(|&v| v == 0)
            && self.h.iter().all(|&v| v == 0)
            && self.f.iter().all(|&v| v == 0)
            && self.parent.iter().all(Option::is_none)
            && !self.open.iter().any(|&v| v)
            && !self.closed.iter().any(|&v| v)
    }

    #[inline]
    pub fn g(&self, idx: usize) -> u32 {
        self.g[idx]
    }

    #[inline]
    pub fn h(&self, idx: usize) -> u32 {
        self.h[idx]
    }

    #[inline]
    pub fn f(&self, idx: usize) -> u32 {
        self.f[idx]
    }

    #[inline]
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parent[idx]
    }

    #[inline]
    pub fn is_open(&self, idx: usize) -> bool {
        self.open[idx]
    }

    #[inline]
    pub fn is_closed(&self, idx: usize) -> bool {
        self.closed[idx]
    }

    /// Number of cells moved to the closed set
    pub fn explored(&self) -> usize {
        self.explored
    }

    /// Record a new best route to `idx`
    pub(crate) fn update(&mut self, idx: usize, g: u32, h: u32, parent: Option<usize>) {
        self.g[idx] = g;
        self.h[idx] = h;
        self.f[idx] = g + h;
        self.parent[idx] = parent;
        self.open[idx] = true;
    }

    pub(crate) fn close(&mut self, idx: usize) {
        self.open[idx] = false;
        self.closed[idx] = true;
        self.explored += 1;
    }

    /// Follow parent links from `target` back to the start
    pub fn reconstruct(&self, grid: &Grid, target: usize) -> Vec<Coord> {
        let mut path = vec![grid.cell(target).coord()];
        let mut current = target;
        while let Some(prev) = self.parent[current] {
            path.push(grid.cell(prev).coord());
            current = prev;
        }
        path.reverse();
        path
    }
}
