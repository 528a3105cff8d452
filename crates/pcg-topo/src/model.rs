use pcg_core::{ErrorInfo, PcgError};
use serde::Serialize;
use tracing::debug;

use crate::domain::{CouplingPhysics, CouplingStrength, DataKind, SolverDomain};
use crate::input::{SimulationParams, TopologyInput};

/// A solver taking part in the coupled simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Unique participant name.
    pub name: String,
    /// Physical domain of the solver.
    pub domain: SolverDomain,
    /// Complexity rank used for ordering and role assignment.
    pub complexity: u32,
    /// Position in the participant declaration list.
    pub declaration_index: usize,
    /// Meshes provided by this participant, in registration order.
    pub meshes: Vec<String>,
    /// Participants this one exchanges data with, in first-seen order.
    pub partners: Vec<String>,
}

/// A coupling mesh provided by exactly one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mesh {
    /// Unique mesh name.
    pub name: String,
    /// Participant providing the mesh.
    pub provider: String,
    /// Spatial dimensionality.
    pub dimensions: u8,
}

/// A data field flowing from one participant's mesh to its partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouplingQuantity {
    /// Name of the exchanged data.
    pub name: String,
    /// Scalar or vector data.
    pub kind: DataKind,
    /// Participant writing the data.
    pub source_participant: String,
    /// Mesh the source participant writes the data on.
    pub source_mesh: String,
    /// Participants the quantity touches, source first.
    pub participants: Vec<String>,
    /// Receiving-side meshes named by the exchanges of this quantity.
    pub target_meshes: Vec<String>,
}

impl CouplingQuantity {
    /// Participants receiving the quantity, in first-seen order.
    pub fn receivers(&self) -> impl Iterator<Item = &str> + '_ {
        self.participants
            .iter()
            .map(String::as_str)
            .filter(move |name| *name != self.source_participant)
    }
}

/// A participant pair with its coupling classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coupling {
    /// Participant names in lexical order.
    pub participants: [String; 2],
    /// Strong when any exchange across the pair is strong.
    pub strength: CouplingStrength,
    /// Multi-physics classification of the pair.
    pub physics: CouplingPhysics,
    /// Data names exchanged across the pair, in first-seen order.
    pub data: Vec<String>,
}

impl Coupling {
    /// Returns whether the pair involves the named participant.
    pub fn involves(&self, participant: &str) -> bool {
        self.participants.iter().any(|name| name == participant)
    }
}

/// Immutable topology of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyModel {
    participants: Vec<Participant>,
    meshes: Vec<Mesh>,
    quantities: Vec<CouplingQuantity>,
    couplings: Vec<Coupling>,
    simulation: SimulationParams,
}

/// Builds a [`TopologyModel`] from a validated topology description.
pub fn build(input: &TopologyInput) -> Result<TopologyModel, PcgError> {
    TopologyModel::build(input)
}

impl TopologyModel {
    /// Builds the model: participants first, then meshes, then quantities and couplings.
    pub fn build(input: &TopologyInput) -> Result<Self, PcgError> {
        if input.exchanges.is_empty() {
            return Err(PcgError::Model(
                ErrorInfo::new("empty-topology", "topology declares no exchanges")
                    .with_hint("add at least one entry to `exchanges`"),
            ));
        }

        let mut model = TopologyModel {
            participants: input
                .participants
                .iter()
                .enumerate()
                .map(|(idx, (name, entry))| Participant {
                    name: name.clone(),
                    domain: entry.domain(),
                    complexity: entry.complexity(),
                    declaration_index: idx,
                    meshes: Vec::new(),
                    partners: Vec::new(),
                })
                .collect(),
            meshes: Vec::new(),
            quantities: Vec::new(),
            couplings: Vec::new(),
            simulation: input.simulation.clone(),
        };

        for (name, entry) in &input.participants {
            if let Some(overrides) = entry.mesh_overrides() {
                for mesh in overrides.values() {
                    model.register_mesh(mesh, name)?;
                }
            }
        }

        let mut endpoints = Vec::with_capacity(input.exchanges.len());
        for (idx, exchange) in input.exchanges.iter().enumerate() {
            model.require_participant(&exchange.from, idx, "from")?;
            model.require_participant(&exchange.to, idx, "to")?;
            let source_mesh = mesh_name(input, &exchange.from, &exchange.from_patch);
            let target_mesh = mesh_name(input, &exchange.to, &exchange.to_patch);
            model.register_mesh(&source_mesh, &exchange.from)?;
            model.register_mesh(&target_mesh, &exchange.to)?;
            endpoints.push((source_mesh, target_mesh));
        }

        for (exchange, (source_mesh, target_mesh)) in input.exchanges.iter().zip(endpoints) {
            model.record_quantity(
                &exchange.data,
                exchange.data_kind(),
                &exchange.from,
                &exchange.to,
                source_mesh,
                target_mesh,
            );
            if exchange.from != exchange.to {
                model.record_coupling(&exchange.from, &exchange.to, exchange.strength, &exchange.data);
            }
        }

        debug!(
            participants = model.participants.len(),
            meshes = model.meshes.len(),
            quantities = model.quantities.len(),
            couplings = model.couplings.len(),
            "topology model built"
        );
        Ok(model)
    }

    /// Participants in declaration order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Looks up a participant by name.
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Meshes in registration order.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Looks up a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Coupling quantities in exchange order.
    pub fn quantities(&self) -> &[CouplingQuantity] {
        &self.quantities
    }

    /// Participant pairs in first-seen order.
    pub fn couplings(&self) -> &[Coupling] {
        &self.couplings
    }

    /// Simulation parameters carried over from the input.
    pub fn simulation(&self) -> &SimulationParams {
        &self.simulation
    }

    fn require_participant(&self, name: &str, exchange: usize, role: &str) -> Result<(), PcgError> {
        if self.participant(name).is_some() {
            return Ok(());
        }
        Err(PcgError::Model(
            ErrorInfo::new(
                "unknown-participant-reference",
                "exchange references an undeclared participant",
            )
            .with_context("participant", name)
            .with_context("exchange", exchange.to_string())
            .with_context("role", role),
        ))
    }

    fn register_mesh(&mut self, name: &str, provider: &str) -> Result<(), PcgError> {
        if let Some(existing) = self.mesh(name) {
            if existing.provider == provider {
                return Ok(());
            }
            return Err(PcgError::Model(
                ErrorInfo::new(
                    "duplicate-mesh-declaration",
                    "two participants provide the same mesh",
                )
                .with_context("mesh", name)
                .with_context("provider", existing.provider.clone())
                .with_context("participant", provider)
                .with_hint("rename the patch or add a mesh override"),
            ));
        }
        self.meshes.push(Mesh {
            name: name.to_string(),
            provider: provider.to_string(),
            dimensions: self.simulation.dimensions,
        });
        if let Some(participant) = self.participants.iter_mut().find(|p| p.name == provider) {
            participant.meshes.push(name.to_string());
        }
        Ok(())
    }

    fn record_quantity(
        &mut self,
        data: &str,
        kind: DataKind,
        from: &str,
        to: &str,
        source_mesh: String,
        target_mesh: String,
    ) {
        let position = self.quantities.iter().position(|q| {
            q.name == data && q.source_participant == from && q.source_mesh == source_mesh
        });
        let quantity = match position {
            Some(idx) => &mut self.quantities[idx],
            None => {
                self.quantities.push(CouplingQuantity {
                    name: data.to_string(),
                    kind,
                    source_participant: from.to_string(),
                    source_mesh,
                    participants: vec![from.to_string()],
                    target_meshes: Vec::new(),
                });
                let last = self.quantities.len() - 1;
                &mut self.quantities[last]
            }
        };
        push_unique(&mut quantity.participants, to);
        if to != from {
            push_unique(&mut quantity.target_meshes, &target_mesh);
        }
    }

    fn record_coupling(&mut self, from: &str, to: &str, strength: CouplingStrength, data: &str) {
        let pair = ordered_pair(from, to);
        match self.couplings.iter_mut().find(|c| c.participants == pair) {
            Some(coupling) => {
                if strength.is_strong() {
                    coupling.strength = CouplingStrength::Strong;
                }
                push_unique(&mut coupling.data, data);
                coupling.physics = CouplingPhysics::classify(coupling.data.iter().map(String::as_str));
            }
            None => self.couplings.push(Coupling {
                participants: pair,
                strength,
                physics: CouplingPhysics::classify([data]),
                data: vec![data.to_string()],
            }),
        }
        for (name, partner) in [(from, to), (to, from)] {
            if let Some(participant) = self.participants.iter_mut().find(|p| p.name == name) {
                push_unique(&mut participant.partners, partner);
            }
        }
    }
}

/// Mesh name for a participant patch, honouring declared overrides.
fn mesh_name(input: &TopologyInput, participant: &str, patch: &str) -> String {
    input
        .participants
        .get(participant)
        .and_then(|entry| entry.mesh_overrides())
        .and_then(|overrides| overrides.get(patch))
        .cloned()
        .unwrap_or_else(|| format!("{participant}-{patch}-Mesh"))
}

fn ordered_pair(a: &str, b: &str) -> [String; 2] {
    if a <= b {
        [a.to_string(), b.to_string()]
    } else {
        [b.to_string(), a.to_string()]
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
