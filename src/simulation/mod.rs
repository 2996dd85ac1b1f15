//! 仿真：单步执行、冲突消解与连续运行。
pub mod choice;
pub mod step;

use serde::{Deserialize, Serialize};

use crate::net::{Net, TransitionId};

pub use choice::{FirstEnabled, RandomChooser, ScriptedChooser, TransitionChooser};
pub use step::{Step, StepState, process, resolve_conflict};

/// 绑定一个选择器的仿真器。
#[derive(Debug, Clone)]
pub struct Simulator<C> {
    chooser: C,
}

/// 连续运行的结果：发生序列与停止时的状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub fired: Vec<TransitionId>,
    pub state: StepState,
    pub step_limit_reached: bool,
    #[serde(skip)]
    pub net: Net,
}

impl<C: TransitionChooser> Simulator<C> {
    pub fn new(chooser: C) -> Self {
        Self { chooser }
    }

    pub fn process(&mut self, net: &Net) -> Step {
        process(net, &mut self.chooser)
    }

    /// 反复单步，直到冲突、终止或达到 `max_steps`。
    ///
    /// `max_steps` 为 0 时不执行任何一步，返回 `Ready([])` 且 `step_limit_reached` 为真。
    pub fn simulate(&mut self, net: &Net, max_steps: usize) -> Run {
        let mut current = net.clone();
        let mut fired = Vec::new();
        let mut state = StepState::Ready(Vec::new());
        let mut step_limit_reached = true;

        while fired.len() < max_steps {
            let step = self.process(&current);
            current = step.net;
            state = step.state;
            match &state {
                StepState::Fired(id) => fired.push(id.clone()),
                _ => {
                    step_limit_reached = false;
                    break;
                }
            }
        }

        log::info!(
            "simulation stopped after {} firings: {:?}",
            fired.len(),
            state
        );
        Run {
            fired,
            state,
            step_limit_reached,
            net: current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Arc, ArcKind, Place, Transition};

    #[test]
    fn simulate_runs_chain_to_completion() {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 1));
        net.add_place(Place::new("p2", 0));
        net.add_place(Place::new("p3", 0));
        net.add_transition(Transition::new("t1"));
        net.add_transition(Transition::new("t2"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "p1", "t1"));
        net.add_arc(Arc::new(ArcKind::Regular, "a2", "t1", "p2"));
        net.add_arc(Arc::new(ArcKind::Regular, "a3", "p2", "t2"));
        net.add_arc(Arc::new(ArcKind::Regular, "a4", "t2", "p3"));

        let run = Simulator::new(FirstEnabled).simulate(&net, 10);
        assert_eq!(run.fired, vec![TransitionId::from("t1"), TransitionId::from("t2")]);
        assert!(run.state.is_terminal());
        assert!(!run.step_limit_reached);
        assert_eq!(run.net.state_signature(), "p1:0,p2:0,p3:1");
    }

    #[test]
    fn simulate_stops_at_step_cap() {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 0));
        net.add_transition(Transition::new("source"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "source", "p1"));

        let run = Simulator::new(RandomChooser::seeded(7)).simulate(&net, 5);
        assert_eq!(run.fired.len(), 5);
        assert!(run.step_limit_reached);
        assert_eq!(run.net.total_tokens(), 5);
    }

    #[test]
    fn zero_step_cap_stops_before_any_firing() {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 1));
        net.add_transition(Transition::new("t1"));
        net.add_arc(Arc::new(ArcKind::Regular, "a1", "p1", "t1"));

        let run = Simulator::new(FirstEnabled).simulate(&net, 0);
        assert!(run.fired.is_empty());
        assert!(run.step_limit_reached);
        assert_eq!(run.state, StepState::Ready(Vec::new()));
        assert_eq!(run.net.marking(), net.marking());
    }
}
