//! 通过公开入口驱动引擎：读取 JSON 描述，单步、冲突消解与分析。

use std::path::PathBuf;

use pn_engine::analysis::{self, AnalysisReport};
use pn_engine::config::EngineConfig;
use pn_engine::net::{self, Net, NetDescription, NetError};
use pn_engine::simulation::{
    FirstEnabled, RandomChooser, ScriptedChooser, Simulator, StepState, process, resolve_conflict,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> (NetDescription, Net) {
    let description: NetDescription = net::io::read_file(fixture(name)).unwrap();
    let net = Net::try_from(&description).unwrap();
    (description, net)
}

fn tokens(description: &NetDescription, id: &str) -> i64 {
    description
        .places
        .iter()
        .find(|place| place.id == id)
        .map(|place| place.tokens)
        .unwrap()
}

#[test]
fn chain_process_moves_token() {
    let (_, net) = load("chain.json");
    let step = process(&net, &mut FirstEnabled);
    assert_eq!(step.state, StepState::Fired("t1".into()));

    let out = NetDescription::from(&step.net);
    assert_eq!(tokens(&out, "p1"), 0);
    assert_eq!(tokens(&out, "p2"), 1);
    assert_eq!(out.deterministic_mode, Some(false));
    assert_eq!(out.transitions[0].arc_ids, vec!["a1", "a2"]);

    let idle = process(&step.net, &mut FirstEnabled);
    assert!(idle.state.is_terminal());
    let idle_out = NetDescription::from(&idle.net);
    assert!(!idle_out.transitions[0].enabled);
    assert_eq!(idle.net.marking(), step.net.marking());
}

#[test]
fn conflict_then_resolution_from_description() {
    let (description, net) = load("choice.json");
    let conflict = process(&net, &mut RandomChooser::seeded(3));
    assert!(conflict.state.is_conflict());
    assert_eq!(conflict.net.marking(), net.marking());

    let mut echoed = NetDescription::from(&conflict.net);
    assert!(echoed.transitions.iter().all(|t| t.enabled));
    echoed.selected_transition_id = description.selected_transition_id.clone();

    let resumed = Net::try_from(&echoed).unwrap();
    let resolved = resolve_conflict(&resumed, echoed.selection().unwrap()).unwrap();
    assert!(resolved.state.is_terminal());
    let out = NetDescription::from(&resolved.net);
    assert_eq!(tokens(&out, "p1"), 0);
    assert_eq!(tokens(&out, "p3"), 1);
}

#[test]
fn resolving_unknown_transition_fails() {
    let (_, net) = load("choice.json");
    assert_eq!(
        resolve_conflict(&net, "nope").unwrap_err(),
        NetError::UnknownTransition("nope".into())
    );
}

#[test]
fn nondeterministic_choice_is_reproducible() {
    let (_, mut net) = load("choice.json");
    net.set_deterministic(false);

    let first = process(&net, &mut ScriptedChooser::new(vec![0]));
    let second = process(&net, &mut ScriptedChooser::new(vec![1]));
    assert_eq!(first.state, StepState::Fired("t1".into()));
    assert_eq!(second.state, StepState::Fired("t2".into()));

    let a = process(&net, &mut RandomChooser::seeded(11));
    let b = process(&net, &mut RandomChooser::seeded(11));
    assert_eq!(a.state, b.state);
}

#[test]
fn unknown_arc_type_is_rejected_at_mapping() {
    let description: NetDescription = net::io::read_file(fixture("bad_arc.json")).unwrap();
    let err = Net::try_from(&description).unwrap_err();
    assert!(matches!(err, NetError::UnknownArcType { .. }));
}

#[test]
fn mutex_net_respects_capacity_and_inhibitor() {
    let (_, net) = load("mutex.json");
    let run = Simulator::new(FirstEnabled).simulate(&net, 50);
    // enter → (leave | watch) ... 每一步 critical 都不超过 1
    for place in run.net.places.values() {
        if let Some(capacity) = place.capacity() {
            assert!(place.tokens() <= capacity);
        }
    }

    let (report, graph) = analysis::explore(&net, &Default::default());
    assert_eq!(report.reachable_states_count, 4);
    assert!(!report.reached_max_limit);
    assert_eq!(
        report.reachable_states[0],
        "alarm:0,critical:0,idle:1,lock:1"
    );
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 5);
}

#[test]
fn mutex_incidence_and_structure() {
    let (_, net) = load("mutex.json");
    let incidence = analysis::compute_incidence_matrix(&net);
    assert_eq!(
        incidence.incidence_matrix,
        vec![
            vec![-1, 1, 0],
            vec![-1, 1, 0],
            vec![1, -1, 0],
            vec![0, 0, 1],
        ]
    );

    let structural = analysis::perform_structural_analysis(&net);
    assert_eq!(structural.regular_arcs_count, 7);
    assert_eq!(structural.inhibitor_arcs_count, 1);
    assert_eq!(structural.bidirectional_arcs_count, 1);
    assert!(structural.isolated_places.is_empty());

    let boundedness = analysis::analyze_boundedness(&net);
    assert_eq!(boundedness.bounded_places_count, 3);
    assert_eq!(boundedness.unbounded_places_count, 1);
}

#[test]
fn analyze_all_serializes_with_type_tags() {
    let (_, net) = load("chain.json");
    let reports = analysis::analyze_all(&net, &EngineConfig::default());
    let json = net::io::to_json_string(&reports).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["analysisType"], "Reachable States");
    assert_eq!(value[0]["reachableStatesCount"], 2);
    assert_eq!(value[3]["incidenceMatrix"], serde_json::json!([[-1], [1]]));

    match &reports[1] {
        AnalysisReport::Liveness(report) => assert!(!report.has_deadlock),
        other => panic!("unexpected report {:?}", other),
    }
}
