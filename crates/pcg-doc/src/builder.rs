//! Assembles the document tree from a topology model and its synthesized scheme.
//!
//! The builder decides what exists; display order is left to the printer.

use pcg_core::format_real;
use pcg_scheme::{
    Acceleration, AccelerationKind, CoupledExchange, CouplingScheme, MappingDirection,
    ParticipantRoles, SchemeKind,
};
use pcg_topo::{MappingKind, TopologyModel};
use tracing::debug;

use crate::tree::{Document, Element, ROOT_TAG};

/// Builds the configuration document for `model` coupled by `scheme`.
pub fn build(model: &TopologyModel, scheme: &CouplingScheme) -> Document {
    let mut root = Element::new(ROOT_TAG);

    for declaration in data_declarations(model) {
        root.push(declaration);
    }
    for mesh in mesh_declarations(model, scheme) {
        root.push(mesh);
    }
    for participant in participant_declarations(model, scheme) {
        root.push(participant);
    }
    for m2n in m2n_declarations(model) {
        root.push(m2n);
    }
    if let Some(profiling) = profiling(model) {
        root.push(profiling);
    }
    root.push(coupling_scheme(scheme));

    debug!(elements = root.children.len(), "document assembled");
    Document::new(root)
}

fn data_declarations(model: &TopologyModel) -> Vec<Element> {
    let mut seen: Vec<&str> = Vec::new();
    let mut declarations = Vec::new();
    for quantity in model.quantities() {
        if seen.contains(&quantity.name.as_str()) {
            continue;
        }
        seen.push(&quantity.name);
        declarations.push(
            Element::new(format!("data:{}", quantity.kind.tag())).attr("name", &quantity.name),
        );
    }
    declarations
}

fn mesh_declarations(model: &TopologyModel, scheme: &CouplingScheme) -> Vec<Element> {
    model
        .meshes()
        .iter()
        .map(|mesh| {
            let mut element = Element::new("mesh")
                .attr("name", &mesh.name)
                .attr("dimensions", mesh.dimensions.to_string());
            for coupled in &scheme.exchanges {
                let exchange = &coupled.exchange;
                if exchange.source_mesh == mesh.name || exchange.target_mesh == mesh.name {
                    element.push_unique(Element::new("use-data").attr("name", &exchange.data));
                }
            }
            element
        })
        .collect()
}

fn participant_declarations(model: &TopologyModel, scheme: &CouplingScheme) -> Vec<Element> {
    let mut participants: Vec<Element> = model
        .participants()
        .iter()
        .map(|participant| {
            let mut element = Element::new("participant").attr("name", &participant.name);
            for mesh in &participant.meshes {
                element.push(Element::new("provide-mesh").attr("name", mesh));
            }
            element
        })
        .collect();
    let position = |name: &str| {
        model
            .participants()
            .iter()
            .position(|participant| participant.name == name)
    };
    let mapping = model.simulation().mapping;

    for CoupledExchange { exchange, .. } in &scheme.exchanges {
        let sender = position(exchange.from.as_str());
        let receiver = position(exchange.to.as_str());
        let (Some(sender), Some(receiver)) = (sender, receiver) else {
            continue;
        };
        participants[sender].push_unique(
            Element::new("write-data")
                .attr("name", &exchange.data)
                .attr("mesh", &exchange.source_mesh),
        );
        participants[receiver].push_unique(
            Element::new("read-data")
                .attr("name", &exchange.data)
                .attr("mesh", &exchange.target_mesh),
        );

        // The side that does not own the exchange mesh receives it and maps.
        let (mapper, owner, received) = match exchange.mapping_direction() {
            MappingDirection::Read => (receiver, &exchange.from, &exchange.source_mesh),
            MappingDirection::Write => (sender, &exchange.to, &exchange.target_mesh),
        };
        participants[mapper].push_unique(
            Element::new("receive-mesh")
                .attr("name", received)
                .attr("from", owner),
        );
        participants[mapper].push_unique(mapping_element(
            mapping,
            exchange.mapping_direction(),
            &exchange.source_mesh,
            &exchange.target_mesh,
        ));
    }
    participants
}

fn mapping_element(
    kind: MappingKind,
    direction: MappingDirection,
    from: &str,
    to: &str,
) -> Element {
    let (direction, constraint) = match direction {
        MappingDirection::Read => ("read", "consistent"),
        MappingDirection::Write => ("write", "conservative"),
    };
    Element::new(format!("mapping:{}", kind.tag()))
        .attr("direction", direction)
        .attr("from", from)
        .attr("to", to)
        .attr("constraint", constraint)
}

/// One socket connection per coupled pair; the earlier-declared participant accepts.
fn m2n_declarations(model: &TopologyModel) -> Vec<Element> {
    let directory = &model.simulation().exchange_directory;
    model
        .couplings()
        .iter()
        .map(|coupling| {
            let [a, b] = &coupling.participants;
            let rank = |name: &str| {
                model
                    .participant(name)
                    .map_or(usize::MAX, |participant| participant.declaration_index)
            };
            let (acceptor, connector) = if rank(b.as_str()) < rank(a.as_str()) {
                (b, a)
            } else {
                (a, b)
            };
            Element::new("m2n:sockets")
                .attr("acceptor", acceptor)
                .attr("connector", connector)
                .attr("exchange-directory", directory)
        })
        .collect()
}

fn profiling(model: &TopologyModel) -> Option<Element> {
    let simulation = model.simulation();
    if simulation.mode.is_none() && simulation.sync_mode.is_none() {
        return None;
    }
    let mut element = Element::new("profiling");
    if let Some(mode) = &simulation.mode {
        element = element.attr("mode", mode);
    }
    if let Some(sync) = &simulation.sync_mode {
        element = element.attr("synchronize", sync);
    }
    Some(element)
}

fn value(tag: &str, value: impl Into<String>) -> Element {
    Element::new(tag).attr("value", value)
}

fn coupling_scheme(scheme: &CouplingScheme) -> Element {
    let mut element = Element::new(scheme.tag());

    match &scheme.roles {
        ParticipantRoles::Pair { first, second } => element.push(
            Element::new("participants")
                .attr("first", first)
                .attr("second", second),
        ),
        ParticipantRoles::Multi {
            controller,
            participants,
        } => {
            for name in participants {
                let mut participant = Element::new("participant").attr("name", name);
                if name == controller {
                    participant = participant.attr("control", "yes");
                }
                element.push(participant);
            }
        }
    }

    element.push(value("max-time-windows", scheme.max_time_windows.to_string()));
    element.push(value("time-window-size", format_real(scheme.time_window_size)));
    if let SchemeKind::Implicit { max_iterations, .. } = &scheme.kind {
        element.push(value("max-iterations", max_iterations.to_string()));
    }

    for coupled in &scheme.exchanges {
        let exchange = &coupled.exchange;
        element.push(
            Element::new("exchange")
                .attr("data", &exchange.data)
                .attr("mesh", &exchange.mesh)
                .attr("from", &exchange.from)
                .attr("to", &exchange.to),
        );
        if let Some(measure) = &coupled.convergence {
            element.push(
                Element::new(measure.tag())
                    .attr("data", &measure.data)
                    .attr("mesh", &measure.mesh)
                    .attr("limit", format_real(measure.limit)),
            );
        }
    }

    if let Some(acceleration) = scheme.acceleration() {
        element.push(acceleration_element(acceleration));
    }
    element
}

fn acceleration_element(acceleration: &Acceleration) -> Element {
    let mut element = Element::new(acceleration.kind.tag());
    let data = || {
        acceleration.data().map(|data| {
            Element::new("data")
                .attr("name", &data.name)
                .attr("mesh", &data.mesh)
        })
    };
    match &acceleration.kind {
        AccelerationKind::Constant { relaxation } => {
            element.push(value("relaxation", format_real(*relaxation)));
        }
        AccelerationKind::Aitken { initial_relaxation } => {
            element.children.extend(data());
            element.push(value("initial-relaxation", format_real(*initial_relaxation)));
        }
        AccelerationKind::QuasiNewton(qn) => {
            element.children.extend(data());
            element.push(Element::new("preconditioner").attr("type", qn.preconditioner.tag()));
            element.push(
                Element::new("filter")
                    .attr("type", qn.filter.tag())
                    .attr("limit", format_real(qn.filter_limit)),
            );
            element.push(value("initial-relaxation", format_real(qn.initial_relaxation)));
            element.push(value("max-used-iterations", qn.max_used_iterations.to_string()));
            element.push(value("time-windows-reused", qn.time_windows_reused.to_string()));
        }
    }
    element
}
