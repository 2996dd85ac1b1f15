use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::net::{Marking, Net, TransitionId};

pub const DEFAULT_STATE_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct ReachabilityConfig {
    /// 最多探索的状态数量.
    pub state_limit: usize,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            state_limit: DEFAULT_STATE_LIMIT,
        }
    }
}

/// 已探索的状态.
#[derive(Debug, Clone)]
pub struct StateNode {
    pub index: usize,
    pub marking: Marking,
    pub enabled: Vec<TransitionId>,
}

/// 只记录两端都已探索的发生.
#[derive(Debug)]
pub struct StateGraph {
    pub graph: StableGraph<StateNode, TransitionId>,
    pub nodes: HashMap<String, NodeIndex>,
}

impl StateGraph {
    pub fn dot(&self) -> String {
        fn escape(s: &str) -> String {
            s.replace('\\', "\\\\").replace('"', "\\\"")
        }

        format!(
            "{:?}",
            Dot::with_attr_getters(
                &self.graph,
                &[Config::EdgeNoLabel, Config::NodeNoLabel],
                &|_, edge| format!("label=\"{}\"", escape(edge.weight().as_str())),
                &|_, (_, node)| {
                    let mut label = format!("s{}\\n{}", node.index, escape(&node.marking.signature()));
                    if !node.enabled.is_empty() {
                        let enabled: Vec<&str> = node.enabled.iter().map(|id| id.as_str()).collect();
                        label.push_str(&format!("\\nenabled: {}", escape(&enabled.join(", "))));
                    }
                    format!("label=\"{}\"", label)
                },
            )
        )
    }

    pub fn write_dot<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.dot())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilityReport {
    pub reachable_states_count: usize,
    pub explored_states_count: usize,
    pub reached_max_limit: bool,
    /// 按发现顺序排列的状态签名.
    pub reachable_states: Vec<String>,
    pub details: String,
}

/// 有界广度优先探索.
///
/// 队列中的状态出队时才去重；每个可发生迁移都从前驱标识独立产生一个后继。
/// 探索 `state_limit` 个状态后即停止，因此对大规模或无界的可达图并不完整。
pub fn explore(net: &Net, config: &ReachabilityConfig) -> (ReachabilityReport, StateGraph) {
    let mut seen: IndexSet<String> = IndexSet::new();
    let mut queue: VecDeque<Net> = VecDeque::new();
    let mut graph = StableGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
    let mut pending_edges: Vec<(String, TransitionId, String)> = Vec::new();

    queue.push_back(net.clone());

    while seen.len() < config.state_limit {
        let Some(mut current) = queue.pop_front() else {
            break;
        };
        let signature = current.state_signature();
        if seen.contains(&signature) {
            continue;
        }
        seen.insert(signature.clone());

        let enabled = current.evaluate_all();
        let index = graph.add_node(StateNode {
            index: seen.len() - 1,
            marking: current.marking(),
            enabled: enabled.clone(),
        });
        nodes.insert(signature.clone(), index);

        for (position, transition) in current.transitions.iter().enumerate() {
            if !transition.enabled {
                continue;
            }
            let mut successor = current.clone();
            successor.fire(position);
            pending_edges.push((
                signature.clone(),
                transition.id.clone(),
                successor.state_signature(),
            ));
            queue.push_back(successor);
        }
    }

    for (from, transition, to) in pending_edges {
        if let (Some(&source), Some(&target)) = (nodes.get(&from), nodes.get(&to)) {
            graph.add_edge(source, target, transition);
        }
    }

    let explored = seen.len();
    let reached_max_limit = explored >= config.state_limit;
    let details = format!(
        "Found {} reachable states{}",
        explored,
        if reached_max_limit {
            " (limited by safety threshold)"
        } else {
            ""
        }
    );
    log::info!("{}", details);

    let report = ReachabilityReport {
        reachable_states_count: explored,
        explored_states_count: explored,
        reached_max_limit,
        reachable_states: seen.into_iter().collect(),
        details,
    };
    (report, StateGraph { graph, nodes })
}

pub fn analyze_reachable_states(net: &Net) -> ReachabilityReport {
    explore(net, &ReachabilityConfig::default()).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Arc, ArcKind, Place, Transition};

    fn build_simple_net() -> Net {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 1));
        net.add_place(Place::new("p2", 0));
        net.add_transition(Transition::new("t1"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "p1", "t1"));
        net.add_arc(Arc::new(ArcKind::Regular, "a2", "t1", "p2"));
        net
    }

    /// 无输入迁移不断向 p 产生 token，可达图无界.
    fn unbounded_net() -> Net {
        let mut net = Net::empty();
        net.add_place(Place::new("p", 0));
        net.add_transition(Transition::new("source"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "source", "p"));
        net
    }

    #[test]
    fn empty_net_has_single_state() {
        let report = analyze_reachable_states(&Net::empty());
        assert_eq!(report.reachable_states_count, 1);
        assert_eq!(report.explored_states_count, 1);
        assert!(!report.reached_max_limit);
        assert_eq!(report.reachable_states, vec![String::new()]);
    }

    #[test]
    fn chain_reaches_two_states() {
        let (report, graph) = explore(&build_simple_net(), &ReachabilityConfig::default());
        assert_eq!(report.reachable_states, vec!["p1:1,p2:0", "p1:0,p2:1"]);
        assert_eq!(report.details, "Found 2 reachable states");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.dot().contains("label=\"t1\""));
    }

    #[test]
    fn successors_branch_from_predecessor_marking() {
        let mut net = Net::empty();
        net.add_place(Place::new("p", 1));
        net.add_place(Place::new("left", 0));
        net.add_place(Place::new("right", 0));
        net.add_transition(Transition::new("tl"));
        net.add_transition(Transition::new("tr"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "p", "tl"));
        net.add_arc(Arc::new(ArcKind::Regular, "a2", "tl", "left"));
        net.add_arc(Arc::new(ArcKind::Regular, "a3", "p", "tr"));
        net.add_arc(Arc::new(ArcKind::Regular, "a4", "tr", "right"));

        let report = analyze_reachable_states(&net);
        assert_eq!(report.reachable_states_count, 3);
        assert!(report.reachable_states.contains(&"left:1,p:0,right:0".to_string()));
        assert!(report.reachable_states.contains(&"left:0,p:0,right:1".to_string()));
    }

    #[test]
    fn state_limit_truncates_exploration() {
        let config = ReachabilityConfig { state_limit: 5 };
        let (report, graph) = explore(&unbounded_net(), &config);
        assert!(report.reached_max_limit);
        assert_eq!(report.explored_states_count, 5);
        assert!(report.details.ends_with("(limited by safety threshold)"));
        assert_eq!(graph.edge_count(), 4);

        let default = analyze_reachable_states(&unbounded_net());
        assert_eq!(default.explored_states_count, DEFAULT_STATE_LIMIT);
    }
}
