use pcg_scheme::{
    synthesize, AccelerationKind, CouplingScheme, FilterKind, MappingDirection, ParticipantRoles,
    Preconditioner, QuasiNewtonVariant, SchemeKind, SynthesisWarning, UNRESOLVED_MESH,
};
use pcg_topo::{build, TopologyInput, TopologyModel};

fn model(yaml: &str) -> TopologyModel {
    let input = TopologyInput::from_yaml(yaml).expect("parse topology");
    build(&input).expect("build model")
}

fn scheme(yaml: &str) -> CouplingScheme {
    synthesize(&model(yaml))
}

fn fsi(kind: &str) -> String {
    format!(
        r#"
participants:
  Fluid: fluid
  Structure: structure
exchanges:
  - {{from: Fluid, to: Structure, to-patch: surface, data: Force, type: {kind}}}
  - {{from: Structure, from-patch: surface, to: Fluid, data: Displacement, type: {kind}}}
"#
    )
}

#[test]
fn strong_exchange_forces_implicit_scheme() {
    let scheme = scheme(&fsi("strong"));
    assert!(scheme.is_implicit());
    assert_eq!(scheme.tag(), "coupling-scheme:parallel-implicit");
    match &scheme.kind {
        SchemeKind::Implicit {
            max_iterations,
            acceleration,
        } => {
            assert_eq!(*max_iterations, 100);
            assert!(acceleration.is_some());
        }
        SchemeKind::Explicit => panic!("expected implicit scheme"),
    }
    assert!(scheme.exchanges.iter().all(|e| e.convergence.is_some()));
}

#[test]
fn weak_exchanges_give_explicit_scheme_without_convergence() {
    let scheme = scheme(&fsi("weak"));
    assert_eq!(scheme.kind, SchemeKind::Explicit);
    assert_eq!(scheme.tag(), "coupling-scheme:parallel-explicit");
    assert!(scheme.acceleration().is_none());
    assert!(scheme.exchanges.iter().all(|e| e.convergence.is_none()));
}

#[test]
fn a_single_strong_exchange_makes_the_whole_scheme_implicit() {
    let scheme = scheme(
        r#"
participants:
  Fluid: fluid
  Structure: structure
exchanges:
  - {from: Fluid, to: Structure, data: Force, type: weak}
  - {from: Structure, to: Fluid, data: Displacement, type: strong}
"#,
    );
    assert!(scheme.is_implicit());
}

#[test]
fn higher_complexity_participant_is_first() {
    let scheme = scheme(&fsi("strong"));
    assert_eq!(
        scheme.roles,
        ParticipantRoles::Pair {
            first: "Structure".into(),
            second: "Fluid".into()
        }
    );
}

#[test]
fn complexity_tie_keeps_declaration_order() {
    let scheme = scheme(
        r#"
participants:
  Right: fluid
  Left: fluid
exchanges:
  - {from: Left, to: Right, data: Pressure}
"#,
    );
    assert_eq!(
        scheme.roles,
        ParticipantRoles::Pair {
            first: "Right".into(),
            second: "Left".into()
        }
    );
}

#[test]
fn simplest_participant_never_maps() {
    let scheme = scheme(&fsi("strong"));
    let force = &scheme.exchanges[0].exchange;
    assert_eq!(force.from, "Fluid");
    assert_eq!(force.to, "Structure");
    assert_eq!(force.mesh, "Fluid-interface-Mesh");
    assert_eq!(force.mapping_direction(), MappingDirection::Read);

    let displacement = &scheme.exchanges[1].exchange;
    assert_eq!(displacement.from, "Structure");
    assert_eq!(displacement.to, "Fluid");
    assert_eq!(displacement.source_mesh, "Structure-surface-Mesh");
    assert_eq!(displacement.mesh, "Fluid-interface-Mesh");
    assert_eq!(displacement.mapping_direction(), MappingDirection::Write);

    let measure = scheme.exchanges[1].convergence.as_ref().unwrap();
    assert_eq!(measure.mesh, "Fluid-interface-Mesh");
    assert_eq!(measure.limit, 1e-4);
}

#[test]
fn one_quantity_downgrades_to_constant_relaxation() {
    let scheme = scheme(
        r#"
participants:
  Fluid: fluid
  Structure: structure
exchanges:
  - {from: Fluid, to: Structure, data: Force}
"#,
    );
    let acceleration = scheme.acceleration().unwrap();
    assert_eq!(acceleration.kind, AccelerationKind::Constant { relaxation: 0.5 });
    assert_eq!(acceleration.primary.len(), 1);
    assert!(acceleration.secondary.is_empty());
}

#[test]
fn two_fsi_quantities_use_least_squares() {
    let scheme = scheme(&fsi("strong"));
    let acceleration = scheme.acceleration().unwrap();
    match &acceleration.kind {
        AccelerationKind::QuasiNewton(qn) => {
            assert_eq!(qn.variant, QuasiNewtonVariant::LeastSquares)
        }
        other => panic!("unexpected acceleration: {other:?}"),
    }
    assert_eq!(acceleration.primary[0].name, "Force");
    assert_eq!(acceleration.primary[0].mesh, "Fluid-interface-Mesh");
    assert_eq!(acceleration.secondary[0].name, "Displacement");
}

#[test]
fn three_quantities_escalate_to_multi_vector_jacobian() {
    let scheme = scheme(
        r#"
participants:
  Fluid: fluid
  Structure: structure
exchanges:
  - {from: Fluid, to: Structure, data: Force}
  - {from: Fluid, to: Structure, data: Pressure}
  - {from: Structure, to: Fluid, data: Displacement}
"#,
    );
    let acceleration = scheme.acceleration().unwrap();
    let AccelerationKind::QuasiNewton(qn) = &acceleration.kind else {
        panic!("expected quasi-Newton acceleration");
    };
    assert_eq!(qn.variant, QuasiNewtonVariant::MultiVectorJacobian);
    assert!(qn.time_windows_reused > 8);
    let names: Vec<_> = acceleration.data().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Force", "Pressure", "Displacement"]);
}

const FAN_OUT: &str = r#"
participants:
  Fluid: fluid
  SolidA: structure
  SolidB: structure
exchanges:
  - {from: Fluid, to: SolidA, data: Force}
  - {from: Fluid, to: SolidB, data: Force}
  - {from: SolidA, to: Fluid, data: Displacement}
  - {from: SolidB, to: Fluid, data: Displacement}
"#;

#[test]
fn escalation_counts_model_quantities_including_fan_out() {
    let model = model(FAN_OUT);
    assert_eq!(model.quantities().len(), 3);
    let scheme = synthesize(&model);
    let acceleration = scheme.acceleration().unwrap();
    assert_eq!(acceleration.kind.tag(), "acceleration:IQN-IMVJ");
    let AccelerationKind::QuasiNewton(qn) = &acceleration.kind else {
        panic!("expected quasi-Newton acceleration");
    };
    assert_eq!(qn.time_windows_reused, 16);
}

#[test]
fn fan_out_quantity_gets_one_exchange_per_receiver() {
    let scheme = scheme(FAN_OUT);
    let routes: Vec<_> = scheme
        .exchanges
        .iter()
        .map(|c| {
            let e = &c.exchange;
            (e.data.as_str(), e.from.as_str(), e.to.as_str(), e.target_mesh.as_str())
        })
        .collect();
    assert_eq!(
        routes,
        [
            ("Force", "Fluid", "SolidA", "SolidA-interface-Mesh"),
            ("Force", "Fluid", "SolidB", "SolidB-interface-Mesh"),
            ("Displacement", "SolidA", "Fluid", "Fluid-interface-Mesh"),
            ("Displacement", "SolidB", "Fluid", "Fluid-interface-Mesh"),
        ]
    );
    assert_eq!(
        scheme.warnings,
        vec![SynthesisWarning::FanOutQuantity {
            data: "Force".into(),
            source: "Fluid".into(),
            receivers: vec!["SolidA".into(), "SolidB".into()],
        }]
    );

    // Both Force exchanges travel on the fluid mesh: one measure, one accelerated entry.
    let measures: Vec<_> = scheme
        .exchanges
        .iter()
        .filter_map(|c| c.convergence.as_ref())
        .map(|m| (m.data.as_str(), m.mesh.as_str()))
        .collect();
    assert_eq!(
        measures,
        [
            ("Force", "Fluid-interface-Mesh"),
            ("Displacement", "Fluid-interface-Mesh"),
        ]
    );
    let accelerated: Vec<_> = scheme
        .acceleration()
        .unwrap()
        .data()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(accelerated, ["Force", "Displacement"]);
}

#[test]
fn quasi_newton_filter_and_preconditioner_can_be_configured() {
    let scheme = scheme(
        r#"
coupling-scheme:
  filter: QR1
  preconditioner: constant
participants:
  Fluid: fluid
  Structure: structure
exchanges:
  - {from: Fluid, to: Structure, data: Force}
  - {from: Structure, to: Fluid, data: Displacement}
"#,
    );
    let AccelerationKind::QuasiNewton(qn) = &scheme.acceleration().unwrap().kind else {
        panic!("expected quasi-Newton acceleration");
    };
    assert_eq!(qn.filter, FilterKind::Qr1);
    assert_eq!(qn.preconditioner, Preconditioner::Constant);
    assert_eq!(qn.variant, QuasiNewtonVariant::LeastSquares);
}

#[test]
fn conjugate_heat_transfer_escalates_with_two_quantities() {
    let scheme = scheme(
        r#"
participants:
  Fluid: fluid
  Solid: heat
exchanges:
  - {from: Fluid, to: Solid, data: Heat-Flux}
  - {from: Solid, to: Fluid, data: Temperature}
"#,
    );
    assert_eq!(
        scheme.acceleration().unwrap().kind.tag(),
        "acceleration:IQN-IMVJ"
    );
}

#[test]
fn configured_acceleration_wins() {
    let scheme = scheme(
        r#"
coupling-scheme:
  acceleration: aitken
participants:
  Fluid: fluid
  Structure: structure
exchanges:
  - {from: Fluid, to: Structure, data: Force}
  - {from: Structure, to: Fluid, data: Displacement}
"#,
    );
    assert_eq!(
        scheme.acceleration().unwrap().kind,
        AccelerationKind::Aitken {
            initial_relaxation: 0.1
        }
    );
}

#[test]
fn participant_with_most_meshes_controls_multi_scheme() {
    let scheme = scheme(
        r#"
participants:
  Solid: structure
  Fluid: fluid
  Heat: heat
exchanges:
  - {from: Fluid, from-patch: wall, to: Solid, data: Force}
  - {from: Fluid, from-patch: inlet, to: Heat, data: Temperature}
  - {from: Solid, to: Heat, data: Displacement}
"#,
    );
    assert_eq!(scheme.tag(), "coupling-scheme:multi");
    assert_eq!(
        scheme.roles,
        ParticipantRoles::Multi {
            controller: "Fluid".into(),
            participants: vec!["Solid".into(), "Fluid".into(), "Heat".into()],
        }
    );
}

#[test]
fn multi_controller_tie_goes_to_first_declared() {
    let scheme = scheme(
        r#"
participants:
  A: fluid
  B: structure
  C: heat
exchanges:
  - {from: A, to: B, data: Force}
  - {from: B, to: C, data: Temperature}
"#,
    );
    let ParticipantRoles::Multi { controller, .. } = &scheme.roles else {
        panic!("expected multi roles");
    };
    assert_eq!(controller, "A");
}

#[test]
fn ambiguous_partner_mesh_is_reported_and_first_candidate_used() {
    let scheme = scheme(
        r#"
participants:
  Fluid: fluid
  Solid: structure
exchanges:
  - {from: Solid, to: Fluid, to-patch: front, data: Displacement}
  - {from: Solid, to: Fluid, to-patch: back, data: Displacement}
"#,
    );
    assert_eq!(scheme.exchanges.len(), 1);
    let exchange = &scheme.exchanges[0].exchange;
    assert_eq!(exchange.target_mesh, "Fluid-front-Mesh");
    assert_eq!(exchange.mesh, "Solid-interface-Mesh");
    assert_eq!(
        scheme.warnings,
        vec![SynthesisWarning::AmbiguousPartnerMesh {
            data: "Displacement".into(),
            participant: "Fluid".into(),
            candidates: vec!["Fluid-front-Mesh".into(), "Fluid-back-Mesh".into()],
            chosen: "Fluid-front-Mesh".into(),
        }]
    );
}

#[test]
fn self_exchange_is_reported_not_fatal() {
    let scheme = scheme(
        r#"
participants:
  Fluid: fluid
  Solid: structure
exchanges:
  - {from: Fluid, to: Solid, data: Force}
  - {from: Solid, from-patch: a, to: Solid, to-patch: b, data: Strain}
"#,
    );
    assert_eq!(scheme.exchanges.len(), 1);
    assert!(matches!(
        scheme.warnings.as_slice(),
        [SynthesisWarning::NonPairwiseQuantity { data, .. }] if data == "Strain"
    ));
    assert!(!scheme.warnings[0].to_string().is_empty());
}

#[test]
fn single_participant_gets_placeholder_partner() {
    let scheme = scheme(
        r#"
participants:
  Solid: structure
exchanges:
  - {from: Solid, from-patch: a, to: Solid, to-patch: b, data: Strain}
"#,
    );
    assert!(scheme
        .warnings
        .contains(&SynthesisWarning::MissingParticipant { declared: 1 }));
    assert!(scheme.exchanges.is_empty());
    assert!(scheme.acceleration().is_none());
    assert_ne!(UNRESOLVED_MESH, "");
}

#[test]
fn synthesis_does_not_mutate_the_model() {
    let model = model(&fsi("strong"));
    let before = model.clone();
    let first = synthesize(&model);
    let second = synthesize(&model);
    assert_eq!(model, before);
    assert_eq!(first, second);
}

#[test]
fn scheme_serialises_to_json() {
    let scheme = scheme(&fsi("strong"));
    let json = serde_json::to_value(&scheme).unwrap();
    assert_eq!(json["kind"]["kind"], "implicit");
    assert_eq!(json["roles"]["layout"], "pair");
    assert_eq!(json["kind"]["acceleration"]["kind"]["type"], "quasi-newton");
    assert_eq!(
        json["kind"]["acceleration"]["kind"]["variant"],
        "IQN-ILS"
    );
}
