use serde::{Deserialize, Serialize};

use super::cell::CellCoordinate;

/// Grid dimensions, discovered once from a snapshot batch and then frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
}

impl GridConfig {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, coordinate: CellCoordinate) -> bool {
        coordinate.x < self.width && coordinate.y < self.height
    }

    /// Number of cells, or `None` when it does not fit in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Row-major slot index of `coordinate`, if it lies inside the grid.
    pub fn index_of(&self, coordinate: CellCoordinate) -> Option<usize> {
        if self.contains(coordinate) {
            Some(coordinate.y as usize * self.width as usize + coordinate.x as usize)
        } else {
            None
        }
    }

    pub fn coordinate_of(&self, index: usize) -> Option<CellCoordinate> {
        let count = self.cell_count()?;
        if self.width == 0 || index >= count {
            return None;
        }
        let width = self.width as usize;
        Some(CellCoordinate::new((index % width) as u32, (index / width) as u32))
    }
}
