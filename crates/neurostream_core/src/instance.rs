//! Fixed-size render instance pool.
//!
//! One slot per grid position, allocated once when the grid is established.
//! Slot `i` always shows coordinate `(i % width, i / width)`; cells with no
//! data are parked below the scene at near-zero scale instead of being removed,
//! so the index mapping never changes during a session.

use neurostream_data::{CellCoordinate, GridConfig};

use crate::encoder::{self, Rgb};
use crate::store::GridView;

/// Where hidden instances are parked.
pub const HIDDEN_TRANSLATION: [f32; 3] = [0.0, -1000.0, 0.0];
pub const HIDDEN_SCALE: f32 = 0.01;
/// Horizontal footprint of a visible cell; leaves a gap between neighbours.
pub const CELL_FOOTPRINT: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub const HIDDEN: Transform = Transform {
        translation: HIDDEN_TRANSLATION,
        scale: [HIDDEN_SCALE; 3],
    };

    /// Column-major model matrix (scale then translate).
    pub fn to_matrix(&self) -> [[f32; 4]; 4] {
        let [tx, ty, tz] = self.translation;
        let [sx, sy, sz] = self.scale;
        [
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [tx, ty, tz, 1.0],
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub transform: Transform,
    pub color: Rgb,
    pub height: f32,
    pub visible: bool,
}

impl Instance {
    const HIDDEN: Instance = Instance {
        transform: Transform::HIDDEN,
        color: Rgb::new(0.0, 0.0, 0.0),
        height: 0.0,
        visible: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub visible: usize,
    pub hidden: usize,
    pub firing: usize,
}

#[derive(Debug, Default)]
pub struct InstancedRenderer {
    grid: Option<GridConfig>,
    instances: Vec<Instance>,
    frames: u64,
    last_stats: FrameStats,
}

impl InstancedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the pool to `grid`. Only the first call has any effect.
    pub fn establish(&mut self, grid: GridConfig) -> bool {
        if let Some(current) = self.grid {
            if current != grid {
                tracing::warn!(
                    current_width = current.width,
                    current_height = current.height,
                    requested_width = grid.width,
                    requested_height = grid.height,
                    "Instance pool already sized; ignoring new grid"
                );
            }
            return false;
        }

        let Some(count) = grid.cell_count() else {
            tracing::warn!(
                width = grid.width,
                height = grid.height,
                "Grid too large to index; instance pool not allocated"
            );
            return false;
        };
        let mut instances = Vec::new();
        if let Err(e) = instances.try_reserve_exact(count) {
            tracing::warn!(
                width = grid.width,
                height = grid.height,
                error = %e,
                "Could not allocate instance pool"
            );
            return false;
        }
        instances.resize(count, Instance::HIDDEN);
        self.instances = instances;
        self.grid = Some(grid);
        tracing::info!(
            width = grid.width,
            height = grid.height,
            instances = self.instances.len(),
            "Instance pool established"
        );
        true
    }

    /// Rewrites every slot in place from `view`.
    pub fn update<V: GridView>(&mut self, view: &V) -> FrameStats {
        let Some(grid) = self.grid else {
            return FrameStats::default();
        };

        let half_w = grid.width as f32 / 2.0;
        let half_h = grid.height as f32 / 2.0;
        let width = grid.width as usize;
        let mut stats = FrameStats::default();

        for (i, instance) in self.instances.iter_mut().enumerate() {
            let x = (i % width) as u32;
            let y = (i / width) as u32;

            match view.get(CellCoordinate::new(x, y)) {
                Some(state) => {
                    let visual = encoder::encode(state);
                    instance.transform.translation = [
                        x as f32 - half_w + 0.5,
                        visual.height / 2.0,
                        y as f32 - half_h + 0.5,
                    ];
                    instance.transform.scale = [CELL_FOOTPRINT, visual.height, CELL_FOOTPRINT];
                    instance.color = visual.color;
                    instance.height = visual.height;
                    instance.visible = true;
                    stats.visible += 1;
                    if state.is_firing {
                        stats.firing += 1;
                    }
                }
                None => {
                    instance.transform = Transform::HIDDEN;
                    instance.height = 0.0;
                    instance.visible = false;
                    stats.hidden += 1;
                }
            }
        }

        self.frames += 1;
        self.last_stats = stats;
        stats
    }

    pub fn grid(&self) -> Option<GridConfig> {
        self.grid
    }

    pub fn is_established(&self) -> bool {
        self.grid.is_some()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn index_of(&self, coordinate: CellCoordinate) -> Option<usize> {
        self.grid?.index_of(coordinate)
    }

    pub fn instance_at(&self, coordinate: CellCoordinate) -> Option<&Instance> {
        self.index_of(coordinate).and_then(|i| self.instances.get(i))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
