use serde::Serialize;

use crate::acceleration::Acceleration;
use crate::warning::SynthesisWarning;

/// Placeholder mesh name substituted when a partner mesh cannot be located.
pub const UNRESOLVED_MESH: &str = "UNRESOLVED-MESH";

/// Placeholder participant name substituted when a role cannot be filled.
pub const UNRESOLVED_PARTICIPANT: &str = "UNRESOLVED-PARTICIPANT";

/// Synthesized control structure of the coupled simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouplingScheme {
    /// Explicit or implicit iteration.
    pub kind: SchemeKind,
    /// Participant roles.
    pub roles: ParticipantRoles,
    /// Number of coupling time windows.
    pub max_time_windows: u32,
    /// Size of one time window.
    pub time_window_size: f64,
    /// Exchanges with their optional convergence measure, in quantity order.
    pub exchanges: Vec<CoupledExchange>,
    /// Non-fatal anomalies recorded during synthesis.
    pub warnings: Vec<SynthesisWarning>,
}

impl CouplingScheme {
    /// Returns whether the scheme iterates within each time window.
    pub fn is_implicit(&self) -> bool {
        matches!(self.kind, SchemeKind::Implicit { .. })
    }

    /// Acceleration block of an implicit scheme.
    pub fn acceleration(&self) -> Option<&Acceleration> {
        match &self.kind {
            SchemeKind::Implicit { acceleration, .. } => acceleration.as_ref(),
            SchemeKind::Explicit => None,
        }
    }

    /// Tag of the `coupling-scheme:<kind>` element.
    pub fn tag(&self) -> &'static str {
        match (&self.roles, self.is_implicit()) {
            (ParticipantRoles::Multi { .. }, _) => "coupling-scheme:multi",
            (ParticipantRoles::Pair { .. }, true) => "coupling-scheme:parallel-implicit",
            (ParticipantRoles::Pair { .. }, false) => "coupling-scheme:parallel-explicit",
        }
    }
}

/// Iteration scheme of the coupling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SchemeKind {
    /// One exchange per time window.
    Explicit,
    /// Iterated to convergence within each time window.
    Implicit {
        /// Iteration cap per time window.
        max_iterations: u32,
        /// Acceleration of the fixed-point iteration, absent without exchanges.
        acceleration: Option<Acceleration>,
    },
}

/// Participant roles within the scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum ParticipantRoles {
    /// Two-participant scheme.
    Pair {
        /// Driving participant (higher complexity).
        first: String,
        /// Second participant.
        second: String,
    },
    /// Scheme with more than two participants and one controller.
    Multi {
        /// Participant controlling the coupling.
        controller: String,
        /// All participants in declaration order, controller included.
        participants: Vec<String>,
    },
}

/// An exchange together with its convergence measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoupledExchange {
    /// Data transfer.
    pub exchange: Exchange,
    /// Convergence measure, present for implicit schemes only.
    pub convergence: Option<ConvergenceMeasure>,
}

/// Directed transfer of one data field over one mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    /// Data name.
    pub data: String,
    /// Mesh the data travels on.
    pub mesh: String,
    /// Sending participant.
    pub from: String,
    /// Receiving participant.
    pub to: String,
    /// Mesh the sender writes the data on.
    pub source_mesh: String,
    /// Mesh the receiver reads the data on.
    pub target_mesh: String,
}

/// Side of an exchange that maps data between the two meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingDirection {
    /// The receiver maps from the source mesh onto its own mesh.
    Read,
    /// The sender maps from its own mesh onto the receiver's mesh.
    Write,
}

impl Exchange {
    /// Which side performs the mapping, derived from the exchange mesh.
    pub fn mapping_direction(&self) -> MappingDirection {
        if self.mesh == self.source_mesh {
            MappingDirection::Read
        } else {
            MappingDirection::Write
        }
    }
}

/// Relative convergence criterion on one exchanged data field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceMeasure {
    /// Data name.
    pub data: String,
    /// Mesh the data is measured on.
    pub mesh: String,
    /// Relative residual limit.
    pub limit: f64,
}

impl ConvergenceMeasure {
    /// Tag of the convergence element.
    pub fn tag(&self) -> &'static str {
        "relative-convergence-measure"
    }
}
