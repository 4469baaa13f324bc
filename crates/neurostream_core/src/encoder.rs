//! Cell state to visual mapping.
//!
//! Biological color coding:
//! - white / cyan: firing excitatory / inhibitory cells
//! - green / blue: active excitatory / inhibitory cells, dimmed by layer depth
//! - dark gray: resting cells

use neurostream_data::{CellState, CellType, CorticalLayer};

/// Height of a firing cell, regardless of its analog activation.
pub const FIRING_HEIGHT: f32 = 2.0;
pub const MIN_HEIGHT: f32 = 0.1;
pub const ACTIVATION_HEIGHT_SCALE: f32 = 1.5;
/// Below this absolute activation a cell is drawn as resting.
pub const ACTIVITY_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// 8-bit channels, clamped to the displayable range.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

pub const INHIBITORY_FIRING: Rgb = Rgb::new(0.4, 1.0, 1.0);
/// Full-intensity hues of active cells, scaled by activation and layer.
pub const EXCITATORY_ACTIVE: Rgb = Rgb::new(0.3, 0.9, 0.1);
pub const INHIBITORY_ACTIVE: Rgb = Rgb::new(0.2, 0.6, 0.9);
pub const EXCITATORY_RESTING: Rgb = Rgb::new(0.1, 0.1, 0.1);
pub const INHIBITORY_RESTING: Rgb = Rgb::new(0.08, 0.1, 0.12);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub height: f32,
    pub color: Rgb,
}

pub fn encode(state: &CellState) -> Visual {
    Visual {
        height: cell_height(state),
        color: cell_color(state),
    }
}

pub fn cell_height(state: &CellState) -> f32 {
    if state.is_firing {
        FIRING_HEIGHT
    } else {
        (state.activation as f32 * ACTIVATION_HEIGHT_SCALE).max(MIN_HEIGHT)
    }
}

pub fn layer_brightness(layer: CorticalLayer) -> f32 {
    match layer {
        CorticalLayer::L2_3 => 1.0,
        CorticalLayer::L4 => 0.9,
        CorticalLayer::L5 => 0.75,
        CorticalLayer::L6 => 0.6,
        CorticalLayer::Unknown => 0.8,
    }
}

pub fn cell_color(state: &CellState) -> Rgb {
    if state.is_firing {
        return match state.cell_type {
            CellType::Inhibitory => INHIBITORY_FIRING,
            CellType::Excitatory => Rgb::WHITE,
        };
    }

    if state.activation.abs() > ACTIVITY_EPSILON {
        let i = state.activation.abs() as f32 * layer_brightness(state.layer);
        return match state.cell_type {
            CellType::Inhibitory => INHIBITORY_ACTIVE.scaled(i),
            CellType::Excitatory => EXCITATORY_ACTIVE.scaled(i),
        };
    }

    match state.cell_type {
        CellType::Inhibitory => INHIBITORY_RESTING,
        CellType::Excitatory => EXCITATORY_RESTING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurostream_data::CellCoordinate;

    fn state(cell_type: CellType, layer: CorticalLayer, activation: f64) -> CellState {
        CellState::new(CellCoordinate::new(0, 0), cell_type, layer).with_activation(activation)
    }

    fn approx(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6
    }

    #[test]
    fn test_firing_overrides_low_activation() {
        let s = state(CellType::Excitatory, CorticalLayer::L4, 0.01).with_firing(true);
        assert_eq!(cell_height(&s), 2.0);
        assert_eq!(cell_color(&s), Rgb::WHITE);
    }

    #[test]
    fn test_firing_inhibitory_is_cyan() {
        let s = state(CellType::Inhibitory, CorticalLayer::L6, 0.9).with_firing(true);
        let c = cell_color(&s);
        assert!(c.r < c.g && c.g == 1.0 && c.b == 1.0);
    }

    #[test]
    fn test_height_floor() {
        assert_eq!(cell_height(&state(CellType::Excitatory, CorticalLayer::L4, 0.0)), 0.1);
        assert_eq!(cell_height(&state(CellType::Excitatory, CorticalLayer::L4, -0.5)), 0.1);
        let h = cell_height(&state(CellType::Excitatory, CorticalLayer::L4, 0.8));
        assert!((h - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_active_excitatory_scaled_by_layer() {
        let c = cell_color(&state(CellType::Excitatory, CorticalLayer::L5, 0.8));
        let i = 0.8 * 0.75;
        assert!(approx(c, Rgb::new(0.3 * i, 0.9 * i, 0.1 * i)));
    }

    #[test]
    fn test_negative_activation_uses_magnitude() {
        let c = cell_color(&state(CellType::Inhibitory, CorticalLayer::Unknown, -0.5));
        let i = 0.5 * 0.8;
        assert!(approx(c, Rgb::new(0.2 * i, 0.6 * i, 0.9 * i)));
    }

    #[test]
    fn test_resting_tint_per_type() {
        let e = cell_color(&state(CellType::Excitatory, CorticalLayer::L2_3, 0.005));
        let i = cell_color(&state(CellType::Inhibitory, CorticalLayer::L2_3, 0.005));
        assert_eq!(e, Rgb::new(0.1, 0.1, 0.1));
        assert_eq!(i, Rgb::new(0.08, 0.1, 0.12));
        assert_ne!(e, i);
    }

    #[test]
    fn test_layer_brightness_table() {
        assert_eq!(layer_brightness(CorticalLayer::L2_3), 1.0);
        assert_eq!(layer_brightness(CorticalLayer::L4), 0.9);
        assert_eq!(layer_brightness(CorticalLayer::L5), 0.75);
        assert_eq!(layer_brightness(CorticalLayer::L6), 0.6);
        assert_eq!(layer_brightness(CorticalLayer::Unknown), 0.8);
    }

    #[test]
    fn test_to_u8_clamps() {
        assert_eq!(Rgb::new(1.5, -0.2, 0.5).to_u8(), (255, 0, 128));
    }
}
