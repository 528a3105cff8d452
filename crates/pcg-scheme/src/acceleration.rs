//! Acceleration of implicit coupling iterations.

use pcg_topo::{FilterKind, Preconditioner};
use serde::Serialize;

/// Acceleration block of an implicit scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Acceleration {
    /// Method and numeric parameters.
    pub kind: AccelerationKind,
    /// Data of the first coupling quantity.
    pub primary: Vec<AcceleratedData>,
    /// Data of every later coupling quantity, in quantity order.
    pub secondary: Vec<AcceleratedData>,
}

impl Acceleration {
    /// Primary then secondary data.
    pub fn data(&self) -> impl Iterator<Item = &AcceleratedData> {
        self.primary.iter().chain(self.secondary.iter())
    }
}

/// A (data, mesh) pair taking part in the acceleration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceleratedData {
    /// Data name.
    pub name: String,
    /// Mesh the data is exchanged on.
    pub mesh: String,
}

/// Acceleration method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AccelerationKind {
    /// Constant under-relaxation.
    Constant {
        /// Relaxation factor.
        relaxation: f64,
    },
    /// Aitken adaptive under-relaxation.
    Aitken {
        /// Relaxation factor of the first iteration.
        initial_relaxation: f64,
    },
    /// Interface quasi-Newton.
    QuasiNewton(QuasiNewton),
}

impl AccelerationKind {
    /// Constant under-relaxation with the default factor.
    pub fn constant() -> Self {
        AccelerationKind::Constant { relaxation: 0.5 }
    }

    /// Aitken under-relaxation with the default initial factor.
    pub fn aitken() -> Self {
        AccelerationKind::Aitken {
            initial_relaxation: 0.1,
        }
    }

    /// Tag of the `acceleration:<kind>` element.
    pub fn tag(&self) -> &'static str {
        match self {
            AccelerationKind::Constant { .. } => "acceleration:constant",
            AccelerationKind::Aitken { .. } => "acceleration:aitken",
            AccelerationKind::QuasiNewton(qn) => match qn.variant {
                QuasiNewtonVariant::LeastSquares => "acceleration:IQN-ILS",
                QuasiNewtonVariant::MultiVectorJacobian => "acceleration:IQN-IMVJ",
            },
        }
    }
}

/// Quasi-Newton variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuasiNewtonVariant {
    /// Inverse least-squares (IQN-ILS).
    #[serde(rename = "IQN-ILS")]
    LeastSquares,
    /// Multi-vector Jacobian (IQN-IMVJ).
    #[serde(rename = "IQN-IMVJ")]
    MultiVectorJacobian,
}

/// Quasi-Newton parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuasiNewton {
    /// Least-squares or multi-vector variant.
    pub variant: QuasiNewtonVariant,
    /// Relaxation of the first iteration.
    pub initial_relaxation: f64,
    /// Columns retained in the iteration history.
    pub max_used_iterations: u32,
    /// Past time windows whose history is reused.
    pub time_windows_reused: u32,
    /// Filter removing nearly linearly dependent columns.
    pub filter: FilterKind,
    /// Filter threshold.
    pub filter_limit: f64,
    /// Scaling of the residuals of different data.
    pub preconditioner: Preconditioner,
}

impl QuasiNewton {
    /// Default parameters of a variant.
    pub fn with_defaults(variant: QuasiNewtonVariant) -> Self {
        match variant {
            QuasiNewtonVariant::LeastSquares => Self {
                variant,
                initial_relaxation: 0.1,
                max_used_iterations: 50,
                time_windows_reused: 8,
                filter: FilterKind::Qr2,
                filter_limit: 1e-3,
                preconditioner: Preconditioner::ResidualSum,
            },
            QuasiNewtonVariant::MultiVectorJacobian => Self {
                variant,
                initial_relaxation: 0.1,
                max_used_iterations: 100,
                time_windows_reused: 16,
                filter: FilterKind::Qr2,
                filter_limit: 1e-2,
                preconditioner: Preconditioner::ResidualSum,
            },
        }
    }

    /// Applies configured filter and preconditioner choices.
    pub fn with_overrides(
        mut self,
        filter: Option<FilterKind>,
        preconditioner: Option<Preconditioner>,
    ) -> Self {
        if let Some(filter) = filter {
            self.filter = filter;
        }
        if let Some(preconditioner) = preconditioner {
            self.preconditioner = preconditioner;
        }
        self
    }
}
