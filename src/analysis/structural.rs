//! 结构分析：按类型统计弧，找出孤立节点，并给出连通性警告。
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::net::{ArcKind, Net, PlaceId, TransitionId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralReport {
    pub regular_arcs_count: usize,
    pub inhibitor_arcs_count: usize,
    pub bidirectional_arcs_count: usize,
    pub isolated_places_count: usize,
    pub isolated_transitions_count: usize,
    /// 不作为任何弧端点的库所
    pub isolated_places: Vec<PlaceId>,
    /// 不作为任何弧端点的迁移
    pub isolated_transitions: Vec<TransitionId>,
    pub warnings: Vec<String>,
    pub details: String,
}

impl StructuralReport {
    pub fn has_issues(&self) -> bool {
        !self.isolated_places.is_empty()
            || !self.isolated_transitions.is_empty()
            || !self.warnings.is_empty()
    }
}

pub fn perform_structural_analysis(net: &Net) -> StructuralReport {
    let mut report = StructuralReport::default();
    let mut endpoints: HashSet<&str> = HashSet::new();

    for arc in net.arcs.values() {
        match arc.kind() {
            ArcKind::Regular => report.regular_arcs_count += 1,
            ArcKind::Inhibitor => report.inhibitor_arcs_count += 1,
            ArcKind::Bidirectional => report.bidirectional_arcs_count += 1,
        }
        endpoints.insert(arc.incoming());
        endpoints.insert(arc.outgoing());
    }

    for place in net.places.values() {
        if !endpoints.contains(place.id.as_str()) {
            report.isolated_places.push(place.id.clone());
            continue;
        }
        // 只有 t → p 的普通/双向弧能向库所补充 token
        let produced = net.arcs.values().any(|arc| {
            arc.kind() != ArcKind::Inhibitor && arc.outgoing() == place.id.as_str()
        });
        if !produced && place.tokens() == 0 {
            report.warnings.push(format!(
                "Place {} has no producing arc and no initial tokens",
                place.id
            ));
        }
    }

    for transition in &net.transitions {
        if !endpoints.contains(transition.id.as_str()) {
            report.isolated_transitions.push(transition.id.clone());
            continue;
        }
        let has_input = net.arcs.values().any(|arc| arc.enters(&transition.id));
        if !has_input {
            report.warnings.push(format!(
                "Transition {} has no input arc and is always a source",
                transition.id
            ));
        }
    }

    report.isolated_places_count = report.isolated_places.len();
    report.isolated_transitions_count = report.isolated_transitions.len();
    report.details = format!(
        "Structural analysis: {} regular, {} inhibitor, {} bidirectional arcs. {} isolated places, {} isolated transitions.",
        report.regular_arcs_count,
        report.inhibitor_arcs_count,
        report.bidirectional_arcs_count,
        report.isolated_places_count,
        report.isolated_transitions_count
    );

    if report.has_issues() {
        for warning in &report.warnings {
            log::warn!("{}", warning);
        }
        if !report.isolated_places.is_empty() {
            log::warn!("isolated places: {:?}", report.isolated_places);
        }
        if !report.isolated_transitions.is_empty() {
            log::warn!("isolated transitions: {:?}", report.isolated_transitions);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Arc, Place, Transition};

    #[test]
    fn counts_arcs_and_isolated_nodes() {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 1));
        net.add_place(Place::new("p2", 0));
        net.add_place(Place::new("lonely", 0));
        net.add_transition(Transition::new("t1"));
        net.add_transition(Transition::new("idle"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "p1", "t1"));
        net.add_arc(Arc::new(ArcKind::Regular, "a2", "t1", "p2"));
        net.add_arc(Arc::new(ArcKind::Inhibitor, "a3", "p2", "t1"));

        let report = perform_structural_analysis(&net);
        assert_eq!(report.regular_arcs_count, 2);
        assert_eq!(report.inhibitor_arcs_count, 1);
        assert_eq!(report.bidirectional_arcs_count, 0);
        assert_eq!(report.isolated_places, vec![PlaceId::from("lonely")]);
        assert_eq!(report.isolated_transitions, vec![TransitionId::from("idle")]);
        assert_eq!(
            report.details,
            "Structural analysis: 2 regular, 1 inhibitor, 0 bidirectional arcs. 1 isolated places, 1 isolated transitions."
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn warns_about_starved_places_and_source_transitions() {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 0));
        net.add_place(Place::new("p2", 0));
        net.add_transition(Transition::new("t1"));
        net.add_transition(Transition::new("gen"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "p1", "t1"));
        net.add_arc(Arc::new(ArcKind::Regular, "a2", "gen", "p2"));

        let report = perform_structural_analysis(&net);
        assert!(report.has_issues());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].starts_with("Place p1"));
        assert!(report.warnings[1].starts_with("Transition gen"));
    }

    #[test]
    fn empty_net() {
        let report = perform_structural_analysis(&Net::empty());
        assert!(!report.has_issues());
        assert_eq!(report.isolated_places_count, 0);
    }
}
