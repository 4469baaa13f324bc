//! Sparse last-known-state store keyed by cell coordinate.

use std::collections::hash_map;
use std::collections::HashMap;

use neurostream_data::{CellCoordinate, CellState, GridConfig};

/// Read-only view of the reconstructed grid.
///
/// Renderers are written against this trait so they can never mutate the
/// state owned by the ingestor.
pub trait GridView {
    type Iter<'a>: Iterator<Item = (&'a CellCoordinate, &'a CellState)>
    where
        Self: 'a;

    fn get(&self, coordinate: CellCoordinate) -> Option<&CellState>;

    /// Every known cell, in no particular order. Borrowing, so it can be
    /// walked again on every frame.
    fn iter(&self) -> Self::Iter<'_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Clone)]
pub struct GridStateStore {
    cells: HashMap<CellCoordinate, CellState>,
}

impl GridStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(capacity),
        }
    }

    /// Stores `state` under its coordinate, replacing (never merging with)
    /// whatever was there. Returns the replaced state.
    pub fn set(&mut self, state: CellState) -> Option<CellState> {
        self.cells.insert(state.coordinate, state)
    }

    /// Drops every entry outside `grid`, returning how many were removed.
    pub fn retain_within(&mut self, grid: GridConfig) -> usize {
        let before = self.cells.len();
        self.cells.retain(|coordinate, _| grid.contains(*coordinate));
        before - self.cells.len()
    }
}

impl GridView for GridStateStore {
    type Iter<'a> = hash_map::Iter<'a, CellCoordinate, CellState>;

    fn get(&self, coordinate: CellCoordinate) -> Option<&CellState> {
        self.cells.get(&coordinate)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.cells.iter()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}
