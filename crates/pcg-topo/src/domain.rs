//! Closed vocabularies used by the topology description.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical domain solved by a participant.
///
/// The domain determines the participant's complexity rank, which drives
/// participant ordering and exchange-direction inference during synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverDomain {
    /// Fluid dynamics solver.
    Fluid,
    /// Structural mechanics solver.
    Structure,
    /// Heat conduction solver.
    Heat,
    /// Particle or discrete-element solver.
    Particles,
    /// Any other domain tag, kept verbatim.
    Other(String),
}

impl SolverDomain {
    /// Parses a domain tag as it appears in the topology description.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "fluid" => SolverDomain::Fluid,
            "structure" | "solid" => SolverDomain::Structure,
            "heat" | "thermal" => SolverDomain::Heat,
            "particles" | "particle" => SolverDomain::Particles,
            _ => SolverDomain::Other(tag.trim().to_string()),
        }
    }

    /// Default complexity rank of the domain.
    pub fn complexity(&self) -> u32 {
        match self {
            SolverDomain::Fluid | SolverDomain::Other(_) => 0,
            SolverDomain::Structure => 1,
            SolverDomain::Heat => 2,
            SolverDomain::Particles => 3,
        }
    }

    /// Canonical tag of the domain.
    pub fn tag(&self) -> &str {
        match self {
            SolverDomain::Fluid => "fluid",
            SolverDomain::Structure => "structure",
            SolverDomain::Heat => "heat",
            SolverDomain::Particles => "particles",
            SolverDomain::Other(tag) => tag,
        }
    }
}

impl fmt::Display for SolverDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Strength of a coupling, taken from an exchange's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouplingStrength {
    /// Strongly coupled: iterated to convergence within a time window.
    #[default]
    Strong,
    /// Weakly coupled: one exchange per time window.
    Weak,
}

impl CouplingStrength {
    /// Returns whether the coupling requires implicit iteration.
    pub fn is_strong(self) -> bool {
        matches!(self, CouplingStrength::Strong)
    }
}

/// Multi-physics classification of a participant pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouplingPhysics {
    /// Fluid-structure interaction (forces and displacements).
    FluidStructure,
    /// Conjugate heat transfer (temperatures and heat fluxes).
    ConjugateHeatTransfer,
}

impl CouplingPhysics {
    /// Classifies a pair from the names of the data exchanged across it.
    pub fn classify<'a>(data_names: impl IntoIterator<Item = &'a str>) -> Self {
        let thermal = data_names.into_iter().any(|name| {
            let lower = name.to_ascii_lowercase();
            lower.contains("temperature") || lower.contains("heat")
        });
        if thermal {
            CouplingPhysics::ConjugateHeatTransfer
        } else {
            CouplingPhysics::FluidStructure
        }
    }
}

/// Rank of an exchanged data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataKind {
    /// One value per vertex.
    Scalar,
    /// One vector of mesh dimensionality per vertex.
    Vector,
}

impl DataKind {
    const VECTOR_HINTS: [&'static str; 4] = ["force", "displacement", "velocity", "stress"];

    /// Infers the kind from the data name.
    pub fn infer(data_name: &str) -> Self {
        let lower = data_name.to_ascii_lowercase();
        if Self::VECTOR_HINTS.iter().any(|hint| lower.contains(hint)) {
            DataKind::Vector
        } else {
            DataKind::Scalar
        }
    }

    /// Suffix used in the `data:<kind>` declaration tag.
    pub fn tag(self) -> &'static str {
        match self {
            DataKind::Scalar => "scalar",
            DataKind::Vector => "vector",
        }
    }
}

/// Data mapping method emitted for each mapped exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingKind {
    /// Nearest-neighbour interpolation.
    #[default]
    NearestNeighbor,
    /// Projection onto the nearest edge or face.
    NearestProjection,
    /// Linear interpolation inside mesh cells.
    LinearCellInterpolation,
    /// Global radial-basis-function interpolation with thin plate splines.
    RbfThinPlateSplines,
}

impl MappingKind {
    /// Suffix used in the `mapping:<kind>` tag.
    pub fn tag(self) -> &'static str {
        match self {
            MappingKind::NearestNeighbor => "nearest-neighbor",
            MappingKind::NearestProjection => "nearest-projection",
            MappingKind::LinearCellInterpolation => "linear-cell-interpolation",
            MappingKind::RbfThinPlateSplines => "rbf-thin-plate-splines",
        }
    }
}

/// Acceleration requested explicitly in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccelerationChoice {
    /// Constant under-relaxation.
    #[serde(rename = "constant")]
    Constant,
    /// Aitken adaptive under-relaxation.
    #[serde(rename = "aitken")]
    Aitken,
    /// Interface quasi-Newton, inverse least-squares.
    #[serde(rename = "IQN-ILS")]
    QuasiNewtonLeastSquares,
    /// Interface quasi-Newton, multi-vector Jacobian.
    #[serde(rename = "IQN-IMVJ")]
    QuasiNewtonMultiVector,
}

/// Quasi-Newton filter removing nearly linearly dependent history columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    /// QR1 filter.
    #[serde(rename = "QR1")]
    Qr1,
    /// QR2 filter.
    #[serde(rename = "QR2")]
    Qr2,
}

impl FilterKind {
    /// Value of the filter `type` attribute.
    pub fn tag(self) -> &'static str {
        match self {
            FilterKind::Qr1 => "QR1",
            FilterKind::Qr2 => "QR2",
        }
    }
}

/// Quasi-Newton preconditioner scaling the residuals of different data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preconditioner {
    /// Scale by the sum of residuals.
    ResidualSum,
    /// Scale by the residual of the current iteration.
    Residual,
    /// Scale by the data values.
    Value,
    /// No scaling.
    Constant,
}

impl Preconditioner {
    /// Value of the preconditioner `type` attribute.
    pub fn tag(self) -> &'static str {
        match self {
            Preconditioner::ResidualSum => "residual-sum",
            Preconditioner::Residual => "residual",
            Preconditioner::Value => "value",
            Preconditioner::Constant => "constant",
        }
    }
}
