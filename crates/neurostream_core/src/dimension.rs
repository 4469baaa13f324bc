//! Grid dimension inference from a snapshot batch.

use neurostream_data::{CellState, GridConfig};

/// Batches with at most this many records are treated as incremental ticks.
pub const DEFAULT_SNAPSHOT_THRESHOLD: usize = 100;
/// Largest grid (`width * height`) a snapshot may describe.
pub const DEFAULT_MAX_GRID_CELLS: usize = 1 << 20;

/// Outcome of inspecting one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Too few records to be a snapshot.
    Incremental,
    Grid(GridConfig),
    /// A snapshot whose bounds exceed the cell limit.
    Oversized(GridConfig),
}

/// Decides whether a batch is a near-complete snapshot and, if so, which
/// grid it describes. Pure; the one-shot freeze lives with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionDetector {
    threshold: usize,
    max_cells: usize,
}

impl Default for DimensionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_THRESHOLD)
    }
}

impl DimensionDetector {
    pub const fn new(threshold: usize) -> Self {
        Self {
            threshold,
            max_cells: DEFAULT_MAX_GRID_CELLS,
        }
    }

    pub const fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    pub fn qualifies(&self, batch: &[CellState]) -> bool {
        batch.len() > self.threshold
    }

    /// `width = max(x) + 1`, `height = max(y) + 1` over a qualifying batch,
    /// provided the grid stays within the cell limit.
    pub fn detect(&self, batch: &[CellState]) -> Option<GridConfig> {
        match self.inspect(batch) {
            Detection::Grid(grid) => Some(grid),
            Detection::Incremental | Detection::Oversized(_) => None,
        }
    }

    pub fn inspect(&self, batch: &[CellState]) -> Detection {
        if !self.qualifies(batch) {
            return Detection::Incremental;
        }
        let (max_x, max_y) = batch.iter().fold((0u32, 0u32), |(mx, my), s| {
            (mx.max(s.coordinate.x), my.max(s.coordinate.y))
        });
        let grid = GridConfig::new(max_x.saturating_add(1), max_y.saturating_add(1));
        match grid.cell_count() {
            Some(count) if count <= self.max_cells => Detection::Grid(grid),
            _ => Detection::Oversized(grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurostream_data::{CellCoordinate, CellType, CorticalLayer};

    fn grid_batch(width: u32, height: u32) -> Vec<CellState> {
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                CellState::new(
                    CellCoordinate::new(x, y),
                    CellType::Excitatory,
                    CorticalLayer::L2_3,
                )
            })
            .collect()
    }

    #[test]
    fn test_full_snapshot_detected() {
        let detector = DimensionDetector::default();
        assert_eq!(
            detector.detect(&grid_batch(20, 20)),
            Some(GridConfig::new(20, 20))
        );
    }

    #[test]
    fn test_small_batch_ignored() {
        let detector = DimensionDetector::default();
        assert_eq!(detector.detect(&grid_batch(10, 10)), None);
        assert_eq!(detector.detect(&[]), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let detector = DimensionDetector::new(4);
        assert!(!detector.qualifies(&grid_batch(2, 2)));
        assert!(detector.qualifies(&grid_batch(5, 1)));
    }

    #[test]
    fn test_partial_snapshot_uses_maximum() {
        let detector = DimensionDetector::new(2);
        let mut batch = grid_batch(3, 1);
        batch.push(CellState::new(
            CellCoordinate::new(0, 9),
            CellType::Inhibitory,
            CorticalLayer::L6,
        ));
        assert_eq!(detector.detect(&batch), Some(GridConfig::new(3, 10)));
    }

    #[test]
    fn test_stray_coordinate_exceeds_limit() {
        let detector = DimensionDetector::default();
        let mut batch = grid_batch(10, 10);
        batch.push(CellState::new(
            CellCoordinate::new(u32::MAX - 1, u32::MAX - 1),
            CellType::Excitatory,
            CorticalLayer::L4,
        ));
        assert_eq!(
            detector.inspect(&batch),
            Detection::Oversized(GridConfig::new(u32::MAX, u32::MAX))
        );
        assert_eq!(detector.detect(&batch), None);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let detector = DimensionDetector::new(4).with_max_cells(12);
        assert_eq!(
            detector.inspect(&grid_batch(4, 3)),
            Detection::Grid(GridConfig::new(4, 3))
        );
        assert_eq!(
            detector.inspect(&grid_batch(13, 1)),
            Detection::Oversized(GridConfig::new(13, 1))
        );
    }
}
