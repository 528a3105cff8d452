#![deny(missing_docs)]
#![doc = "Topology model for coupled simulations: participants, the meshes they provide, the data quantities flowing between them and the pairwise couplings, built once from a validated topology description."]

pub mod domain;
pub mod input;
mod model;

pub use domain::{
    AccelerationChoice, CouplingPhysics, CouplingStrength, DataKind, FilterKind, MappingKind,
    Preconditioner, SolverDomain,
};
pub use input::{ExchangeInput, ParticipantDetail, ParticipantInput, SimulationParams, TopologyInput};
pub use model::{build, Coupling, CouplingQuantity, Mesh, Participant, TopologyModel};
