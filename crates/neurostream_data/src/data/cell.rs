use serde::{Deserialize, Serialize};

/// Grid-addressable position of a single cell, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub x: u32,
    pub y: u32,
}

impl CellCoordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellType {
    Excitatory,
    Inhibitory,
}

/// Cortical depth of a cell. Only affects rendering brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CorticalLayer {
    #[serde(rename = "LAYER_2_3")]
    L2_3,
    #[serde(rename = "LAYER_4")]
    L4,
    #[serde(rename = "LAYER_5")]
    L5,
    #[serde(rename = "LAYER_6")]
    L6,
    /// Any layer name this client does not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Phase of the action potential waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NeuronPhase {
    #[default]
    Resting,
    Depolarizing,
    Repolarizing,
    Hyperpolarized,
    Recovering,
    Bursting,
}

/// One cell record exactly as it travels over the stream.
///
/// Coordinates are signed on the wire; [`CellRecord::into_state`] rejects the
/// negative ones since they can never address a grid slot. The producer's
/// native names for phase and refractory countdown are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub x: i64,
    pub y: i64,
    pub activation: f64,
    pub is_firing: bool,
    pub cell_type: CellType,
    #[serde(default)]
    pub layer: CorticalLayer,
    #[serde(default, alias = "neuronPhase")]
    pub phase: NeuronPhase,
    #[serde(default, alias = "refractoryCountdown")]
    pub refractory_counter: u32,
}

impl CellRecord {
    /// Converts into a domain state, or `None` when a coordinate is negative
    /// or does not fit in `u32`.
    pub fn into_state(self) -> Option<CellState> {
        let x = u32::try_from(self.x).ok()?;
        let y = u32::try_from(self.y).ok()?;
        Some(CellState {
            coordinate: CellCoordinate::new(x, y),
            activation: self.activation,
            is_firing: self.is_firing,
            cell_type: self.cell_type,
            layer: self.layer,
            phase: self.phase,
            refractory_counter: self.refractory_counter,
        })
    }
}

impl From<&CellState> for CellRecord {
    fn from(state: &CellState) -> Self {
        Self {
            x: i64::from(state.coordinate.x),
            y: i64::from(state.coordinate.y),
            activation: state.activation,
            is_firing: state.is_firing,
            cell_type: state.cell_type,
            layer: state.layer,
            phase: state.phase,
            refractory_counter: state.refractory_counter,
        }
    }
}

/// Last known state of one cell. Immutable once received; a newer state for
/// the same coordinate replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    pub coordinate: CellCoordinate,
    pub activation: f64,
    pub is_firing: bool,
    pub cell_type: CellType,
    pub layer: CorticalLayer,
    pub phase: NeuronPhase,
    pub refractory_counter: u32,
}

impl CellState {
    /// A resting, non-firing cell at `coordinate`.
    pub fn new(coordinate: CellCoordinate, cell_type: CellType, layer: CorticalLayer) -> Self {
        Self {
            coordinate,
            activation: 0.0,
            is_firing: false,
            cell_type,
            layer,
            phase: NeuronPhase::Resting,
            refractory_counter: 0,
        }
    }

    #[must_use]
    pub fn with_activation(mut self, activation: f64) -> Self {
        self.activation = activation;
        self
    }

    #[must_use]
    pub fn with_firing(mut self, is_firing: bool) -> Self {
        self.is_firing = is_firing;
        self
    }

    #[must_use]
    pub fn with_phase(mut self, phase: NeuronPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn is_inhibitory(&self) -> bool {
        self.cell_type == CellType::Inhibitory
    }
}
