use pcg_topo::{
    AccelerationChoice, CouplingPhysics, CouplingQuantity, Participant, TopologyModel,
};
use tracing::{debug, warn};

use crate::acceleration::{
    AcceleratedData, Acceleration, AccelerationKind, QuasiNewton, QuasiNewtonVariant,
};
use crate::scheme::{
    CoupledExchange, ConvergenceMeasure, CouplingScheme, Exchange, ParticipantRoles, SchemeKind,
    UNRESOLVED_MESH, UNRESOLVED_PARTICIPANT,
};
use crate::warning::SynthesisWarning;

/// Synthesizes the coupling scheme of a topology model.
///
/// Never fails for a model that passed [`TopologyModel::build`]; anomalies
/// are recorded in [`CouplingScheme::warnings`] and a placeholder is used.
pub fn synthesize(model: &TopologyModel) -> CouplingScheme {
    Synthesizer::new(model).run()
}

struct Synthesizer<'a> {
    model: &'a TopologyModel,
    warnings: Vec<SynthesisWarning>,
}

impl<'a> Synthesizer<'a> {
    fn new(model: &'a TopologyModel) -> Self {
        Self {
            model,
            warnings: Vec::new(),
        }
    }

    fn run(mut self) -> CouplingScheme {
        let simulation = self.model.simulation();
        let implicit = self
            .model
            .couplings()
            .iter()
            .any(|coupling| coupling.strength.is_strong());
        let roles = self.assign_roles();
        let exchanges = self.build_exchanges(implicit);
        let kind = if implicit {
            SchemeKind::Implicit {
                max_iterations: simulation.max_iterations,
                acceleration: self.derive_acceleration(&exchanges),
            }
        } else {
            SchemeKind::Explicit
        };
        debug!(
            implicit,
            exchanges = exchanges.len(),
            warnings = self.warnings.len(),
            "coupling scheme synthesized"
        );
        CouplingScheme {
            kind,
            roles,
            max_time_windows: simulation.max_time_windows,
            time_window_size: simulation.time_window_size,
            exchanges,
            warnings: self.warnings,
        }
    }

    fn record(&mut self, warning: SynthesisWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn assign_roles(&mut self) -> ParticipantRoles {
        let model = self.model;
        let participants = model.participants();
        match participants {
            [first, second] => {
                // Higher complexity drives; ties keep declaration order.
                let (first, second) = if second.complexity > first.complexity {
                    (second, first)
                } else {
                    (first, second)
                };
                ParticipantRoles::Pair {
                    first: first.name.clone(),
                    second: second.name.clone(),
                }
            }
            [only] => {
                self.record(SynthesisWarning::MissingParticipant { declared: 1 });
                ParticipantRoles::Pair {
                    first: only.name.clone(),
                    second: UNRESOLVED_PARTICIPANT.to_string(),
                }
            }
            [] => {
                self.record(SynthesisWarning::MissingParticipant { declared: 0 });
                ParticipantRoles::Pair {
                    first: UNRESOLVED_PARTICIPANT.to_string(),
                    second: UNRESOLVED_PARTICIPANT.to_string(),
                }
            }
            _ => {
                let mut controller = &participants[0];
                for participant in &participants[1..] {
                    if participant.meshes.len() > controller.meshes.len() {
                        controller = participant;
                    }
                }
                ParticipantRoles::Multi {
                    controller: controller.name.clone(),
                    participants: participants.iter().map(|p| p.name.clone()).collect(),
                }
            }
        }
    }

    /// Lowest-complexity source participant among the coupling quantities,
    /// ties broken by name so the choice is independent of iteration order.
    fn simplest_participant(&self) -> Option<&'a Participant> {
        let model = self.model;
        model
            .quantities()
            .iter()
            .filter(|quantity| quantity.receivers().next().is_some())
            .filter_map(|quantity| model.participant(&quantity.source_participant))
            .min_by(|a, b| {
                a.complexity
                    .cmp(&b.complexity)
                    .then_with(|| a.name.cmp(&b.name))
            })
    }

    fn build_exchanges(&mut self, implicit: bool) -> Vec<CoupledExchange> {
        let model = self.model;
        let simplest = self.simplest_participant().map(|p| p.name.clone());
        let limit = model.simulation().relative_accuracy;
        let mut exchanges = Vec::with_capacity(model.quantities().len());

        for quantity in model.quantities() {
            let receivers: Vec<&str> = quantity.receivers().collect();
            match receivers.as_slice() {
                [] => {
                    self.record(SynthesisWarning::NonPairwiseQuantity {
                        data: quantity.name.clone(),
                        source: quantity.source_participant.clone(),
                        participants: quantity.participants.clone(),
                    });
                    continue;
                }
                [_] => {}
                _ => self.record(SynthesisWarning::FanOutQuantity {
                    data: quantity.name.clone(),
                    source: quantity.source_participant.clone(),
                    receivers: receivers.iter().map(|name| name.to_string()).collect(),
                }),
            }

            for receiver in receivers {
                let target_mesh = self.resolve_target_mesh(quantity, receiver);
                let source = quantity.source_participant.as_str();
                let simplest_name = simplest.as_deref();

                // The participant that is not the simplest one carries the mapping,
                // so data leaving it travels on the partner's mesh.
                let mesh = if Some(source) != simplest_name && Some(receiver) == simplest_name {
                    target_mesh.clone()
                } else {
                    quantity.source_mesh.clone()
                };

                // One measure per (data, mesh); fan-out receivers can share the source mesh.
                let measured = exchanges.iter().any(|coupled: &CoupledExchange| {
                    coupled.convergence.as_ref().is_some_and(|measure| {
                        measure.data == quantity.name && measure.mesh == mesh
                    })
                });
                let convergence = (implicit && !measured).then(|| ConvergenceMeasure {
                    data: quantity.name.clone(),
                    mesh: mesh.clone(),
                    limit,
                });
                exchanges.push(CoupledExchange {
                    exchange: Exchange {
                        data: quantity.name.clone(),
                        mesh,
                        from: source.to_string(),
                        to: receiver.to_string(),
                        source_mesh: quantity.source_mesh.clone(),
                        target_mesh,
                    },
                    convergence,
                });
            }
        }
        exchanges
    }

    /// Receiving-side mesh of `receiver` among the quantity's target meshes.
    fn resolve_target_mesh(&mut self, quantity: &CouplingQuantity, receiver: &str) -> String {
        let model = self.model;
        let candidates: Vec<&String> = quantity
            .target_meshes
            .iter()
            .filter(|name| model.mesh(name).is_some_and(|mesh| mesh.provider == receiver))
            .collect();
        match candidates.as_slice() {
            [single] => (*single).clone(),
            [] => {
                self.record(SynthesisWarning::UnresolvedPartnerMesh {
                    data: quantity.name.clone(),
                    participant: receiver.to_string(),
                });
                UNRESOLVED_MESH.to_string()
            }
            [first, ..] => {
                let chosen = (*first).clone();
                self.record(SynthesisWarning::AmbiguousPartnerMesh {
                    data: quantity.name.clone(),
                    participant: receiver.to_string(),
                    candidates: candidates.iter().map(|name| name.to_string()).collect(),
                    chosen: chosen.clone(),
                });
                chosen
            }
        }
    }

    fn derive_acceleration(&self, exchanges: &[CoupledExchange]) -> Option<Acceleration> {
        let mut data: Vec<AcceleratedData> = Vec::with_capacity(exchanges.len());
        for coupled in exchanges {
            let entry = AcceleratedData {
                name: coupled.exchange.data.clone(),
                mesh: coupled.exchange.mesh.clone(),
            };
            if !data.contains(&entry) {
                data.push(entry);
            }
        }
        if data.is_empty() {
            return None;
        }
        let secondary = data.split_off(1);
        let primary = data;

        // Escalation follows the coupling quantities of the model, fan-out
        // quantities counted once.
        let quantities = self
            .model
            .quantities()
            .iter()
            .filter(|quantity| quantity.receivers().next().is_some())
            .count();
        let simulation = self.model.simulation();
        let kind = match simulation.acceleration {
            Some(choice) => kind_for_choice(choice),
            None => self.automatic_kind(quantities),
        };
        let kind = match kind {
            AccelerationKind::QuasiNewton(qn) => AccelerationKind::QuasiNewton(
                qn.with_overrides(simulation.filter, simulation.preconditioner),
            ),
            other => other,
        };
        debug!(kind = kind.tag(), quantities, "acceleration selected");
        Some(Acceleration {
            kind,
            primary,
            secondary,
        })
    }

    fn automatic_kind(&self, quantities: usize) -> AccelerationKind {
        let beyond_fsi = self.model.couplings().iter().any(|coupling| {
            coupling.strength.is_strong()
                && coupling.physics == CouplingPhysics::ConjugateHeatTransfer
        });
        if quantities > 2 || beyond_fsi {
            AccelerationKind::QuasiNewton(QuasiNewton::with_defaults(
                QuasiNewtonVariant::MultiVectorJacobian,
            ))
        } else if quantities <= 1 {
            AccelerationKind::constant()
        } else {
            AccelerationKind::QuasiNewton(QuasiNewton::with_defaults(
                QuasiNewtonVariant::LeastSquares,
            ))
        }
    }
}

fn kind_for_choice(choice: AccelerationChoice) -> AccelerationKind {
    match choice {
        AccelerationChoice::Constant => AccelerationKind::constant(),
        AccelerationChoice::Aitken => AccelerationKind::aitken(),
        AccelerationChoice::QuasiNewtonLeastSquares => {
            AccelerationKind::QuasiNewton(QuasiNewton::with_defaults(QuasiNewtonVariant::LeastSquares))
        }
        AccelerationChoice::QuasiNewtonMultiVector => AccelerationKind::QuasiNewton(
            QuasiNewton::with_defaults(QuasiNewtonVariant::MultiVectorJacobian),
        ),
    }
}
