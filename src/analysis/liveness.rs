//! 单标识下的活性近似：只检查当前可发生集，不遍历可达图。
use serde::{Deserialize, Serialize};

use crate::net::{Net, TransitionId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessReport {
    pub has_deadlock: bool,
    pub enabled_transitions_count: usize,
    pub enabled_transitions: Vec<TransitionId>,
    pub details: String,
}

/// 当前标识下无可发生迁移（且网中存在迁移）即报告死锁。
///
/// 这不是对整个可达图的活性证明：当前可发生的迁移在后续标识中仍可能死锁。
pub fn analyze_liveness(net: &Net) -> LivenessReport {
    let mut scratch = net.clone();
    let enabled = scratch.evaluate_all();

    if enabled.is_empty() && !net.transitions.is_empty() {
        log::warn!("deadlock at {}", net.state_signature());
        return LivenessReport {
            has_deadlock: true,
            enabled_transitions_count: 0,
            enabled_transitions: enabled,
            details: "DEADLOCK DETECTED: No transitions are currently enabled.".to_string(),
        };
    }

    LivenessReport {
        has_deadlock: false,
        enabled_transitions_count: enabled.len(),
        details: format!(
            "Currently {} transitions are enabled. Full liveness analysis requires reachability graph exploration.",
            enabled.len()
        ),
        enabled_transitions: enabled,
    }
}
