//! Validated topology description as read from `topology.yaml`.
//!
//! Schema validation happens before these types are produced; the model
//! builder only performs the semantic checks that need cross references.

use indexmap::IndexMap;
use pcg_core::{from_yaml_str, PcgError};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccelerationChoice, CouplingStrength, DataKind, FilterKind, MappingKind, Preconditioner,
    SolverDomain,
};

/// Root of the topology description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyInput {
    /// Simulation and coupling parameters.
    #[serde(rename = "coupling-scheme", default)]
    pub simulation: SimulationParams,
    /// Participants in declaration order, keyed by name.
    pub participants: IndexMap<String, ParticipantInput>,
    /// Pairwise data exchanges.
    #[serde(default)]
    pub exchanges: Vec<ExchangeInput>,
}

impl TopologyInput {
    /// Parses a YAML topology description.
    pub fn from_yaml(text: &str) -> Result<Self, PcgError> {
        from_yaml_str(text)
    }
}

/// Simulation parameters shared by the whole coupling scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulationParams {
    /// Number of coupling time windows.
    #[serde(default = "default_max_time_windows")]
    pub max_time_windows: u32,
    /// Size of a single time window.
    #[serde(default = "default_time_window_size")]
    pub time_window_size: f64,
    /// Relative convergence limit used by implicit schemes.
    #[serde(default = "default_relative_accuracy")]
    pub relative_accuracy: f64,
    /// Iteration cap per time window for implicit schemes.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Spatial dimensionality of every coupling mesh.
    #[serde(default = "default_dimensions")]
    pub dimensions: u8,
    /// Mapping method used for every mapped exchange.
    #[serde(default)]
    pub mapping: MappingKind,
    /// Forces an acceleration type instead of the automatic selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<AccelerationChoice>,
    /// Quasi-Newton filter replacing the variant default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterKind>,
    /// Quasi-Newton preconditioner replacing the variant default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preconditioner: Option<Preconditioner>,
    /// Directory used by socket connections to exchange connection info.
    #[serde(default = "default_exchange_directory")]
    pub exchange_directory: String,
    /// Profiling synchronisation switch (`on` / `off`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<String>,
    /// Profiling mode (`fundamental`, `api`, `all`, `off`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

fn default_max_time_windows() -> u32 {
    10
}

fn default_time_window_size() -> f64 {
    0.1
}

fn default_relative_accuracy() -> f64 {
    1e-4
}

fn default_max_iterations() -> u32 {
    100
}

fn default_dimensions() -> u8 {
    3
}

fn default_exchange_directory() -> String {
    "..".to_string()
}

fn default_patch() -> String {
    "interface".to_string()
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_time_windows: default_max_time_windows(),
            time_window_size: default_time_window_size(),
            relative_accuracy: default_relative_accuracy(),
            max_iterations: default_max_iterations(),
            dimensions: default_dimensions(),
            mapping: MappingKind::default(),
            acceleration: None,
            filter: None,
            preconditioner: None,
            exchange_directory: default_exchange_directory(),
            sync_mode: None,
            mode: None,
        }
    }
}

/// Participant entry: either a bare domain tag or a detailed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantInput {
    /// `Fluid: fluid`
    Domain(String),
    /// `Solid: {domain: structure, complexity: 2, meshes: {...}}`
    Detailed(ParticipantDetail),
}

/// Detailed participant declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDetail {
    /// Domain tag of the solver.
    pub domain: String,
    /// Explicit complexity rank overriding the domain default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
    /// Patch name to mesh name overrides.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub meshes: IndexMap<String, String>,
}

impl ParticipantInput {
    /// Domain of the participant.
    pub fn domain(&self) -> SolverDomain {
        match self {
            ParticipantInput::Domain(tag) => SolverDomain::parse(tag),
            ParticipantInput::Detailed(detail) => SolverDomain::parse(&detail.domain),
        }
    }

    /// Complexity rank, honouring an explicit override.
    pub fn complexity(&self) -> u32 {
        match self {
            ParticipantInput::Detailed(ParticipantDetail {
                complexity: Some(rank),
                ..
            }) => *rank,
            other => other.domain().complexity(),
        }
    }

    /// Mesh name overrides declared for this participant.
    pub fn mesh_overrides(&self) -> Option<&IndexMap<String, String>> {
        match self {
            ParticipantInput::Domain(_) => None,
            ParticipantInput::Detailed(detail) => Some(&detail.meshes),
        }
    }
}

/// One directed data exchange between two participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExchangeInput {
    /// Sending participant.
    pub from: String,
    /// Coupling patch on the sending side.
    #[serde(default = "default_patch")]
    pub from_patch: String,
    /// Receiving participant.
    pub to: String,
    /// Coupling patch on the receiving side.
    #[serde(default = "default_patch")]
    pub to_patch: String,
    /// Name of the exchanged data field.
    pub data: String,
    /// Explicit data kind; inferred from the name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataKind>,
    /// Coupling strength of the exchange.
    #[serde(rename = "type", default)]
    pub strength: CouplingStrength,
}

impl ExchangeInput {
    /// Data kind, explicit or inferred.
    pub fn data_kind(&self) -> DataKind {
        self.data_type.unwrap_or_else(|| DataKind::infer(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPOLOGY: &str = r#"
coupling-scheme:
  max-time-windows: 5
  time-window-size: 0.01
  acceleration: IQN-IMVJ
participants:
  Solid:
    domain: structure
    complexity: 7
    meshes:
      surface: Solid-Surface
  Fluid: fluid
exchanges:
  - from: Fluid
    from-patch: wall
    to: Solid
    to-patch: surface
    data: Force
    type: strong
  - from: Solid
    to: Fluid
    data: Displacement
    type: weak
"#;

    #[test]
    fn parses_full_description() {
        let input = TopologyInput::from_yaml(TOPOLOGY).unwrap();
        assert_eq!(input.simulation.max_time_windows, 5);
        assert_eq!(input.simulation.time_window_size, 0.01);
        assert_eq!(input.simulation.relative_accuracy, 1e-4);
        assert_eq!(
            input.simulation.acceleration,
            Some(AccelerationChoice::QuasiNewtonMultiVector)
        );
        let names: Vec<_> = input.participants.keys().cloned().collect();
        assert_eq!(names, vec!["Solid", "Fluid"]);
        assert_eq!(input.participants["Solid"].complexity(), 7);
        assert_eq!(input.participants["Fluid"].domain(), SolverDomain::Fluid);
        assert_eq!(input.exchanges[1].from_patch, "interface");
        assert_eq!(input.exchanges[1].strength, CouplingStrength::Weak);
        assert_eq!(input.exchanges[0].data_kind(), DataKind::Vector);
    }

    #[test]
    fn missing_scheme_section_uses_defaults() {
        let input = TopologyInput::from_yaml(
            "participants:\n  A: fluid\n  B: solid\nexchanges:\n  - {from: A, to: B, data: Pressure}\n",
        )
        .unwrap();
        assert_eq!(input.simulation, SimulationParams::default());
        assert_eq!(input.exchanges[0].strength, CouplingStrength::Strong);
        assert_eq!(input.exchanges[0].data_kind(), DataKind::Scalar);
    }
}
