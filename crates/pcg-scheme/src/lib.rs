#![deny(missing_docs)]
#![doc = "Synthesizes the coupling scheme of a topology: explicit or implicit iteration, participant roles, one exchange (plus convergence measure) per coupling quantity and, for implicit schemes, the acceleration block."]

mod acceleration;
mod scheme;
mod synth;
mod warning;

pub use acceleration::{
    AcceleratedData, Acceleration, AccelerationKind, QuasiNewton, QuasiNewtonVariant,
};
pub use pcg_topo::{FilterKind, Preconditioner};
pub use scheme::{
    CoupledExchange, CouplingScheme, ConvergenceMeasure, Exchange, MappingDirection,
    ParticipantRoles, SchemeKind, UNRESOLVED_MESH, UNRESOLVED_PARTICIPANT,
};
pub use synth::synthesize;
pub use warning::SynthesisWarning;
