//! 单步执行与冲突消解。
//!
//! 调用方每次提交完整的网并取回新的网，构成一个可恢复的协议：
//! `process → Conflict(ids) → resolve_conflict(choice) → Conflict(ids') | Ready | Terminal`。
use serde::{Deserialize, Serialize};

use crate::net::{Net, NetError, TransitionId};
use crate::simulation::choice::TransitionChooser;

/// 一步之后网所处的状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "transitions", rename_all = "camelCase")]
pub enum StepState {
    /// 恰好一个迁移发生。
    Fired(TransitionId),
    /// 确定模式下多个迁移同时可发生，未修改 token，需外部选择。
    Conflict(Vec<TransitionId>),
    /// 冲突消解后仍有可发生迁移，但无需选择。
    Ready(Vec<TransitionId>),
    /// 没有可发生的迁移。
    Terminal,
}

impl StepState {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StepState::Conflict(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StepState::Terminal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub net: Net,
    pub state: StepState,
}

/// 单步：基于未修改的标识求值全部迁移，然后按模式决定是否发生。
///
/// * 确定模式且可发生集大于 1：返回冲突，不修改 token；
/// * 恰好一个：发生之；
/// * 非确定模式且多于一个：由 `chooser` 选择一个发生；
/// * 没有：原样返回，全部迁移不可发生。
pub fn process<C>(net: &Net, chooser: &mut C) -> Step
where
    C: TransitionChooser + ?Sized,
{
    let mut next = net.clone();
    let enabled = next.evaluate_all();

    if next.is_deterministic() && enabled.len() > 1 {
        log::debug!("conflict between {:?}", enabled);
        next.mark_enabled(&enabled);
        return Step {
            net: next,
            state: StepState::Conflict(enabled),
        };
    }

    let selected = match enabled.len() {
        0 => {
            next.disable_all();
            return Step {
                net: next,
                state: StepState::Terminal,
            };
        }
        1 => enabled[0].clone(),
        n => enabled[chooser.choose(n).min(n - 1)].clone(),
    };

    if let Some(index) = next.position_of(selected.as_str()) {
        next.fire(index);
    }
    next.mark_enabled(std::slice::from_ref(&selected));
    Step {
        net: next,
        state: StepState::Fired(selected),
    }
}

/// 发生外部选定的迁移（不检查其可发生性），再基于新标识重新求值。
///
/// 每次调用恰好发生一次，不会自动继续发生后续迁移。
pub fn resolve_conflict(net: &Net, selected: &str) -> Result<Step, NetError> {
    let index = net
        .position_of(selected)
        .ok_or_else(|| NetError::UnknownTransition(selected.to_owned()))?;

    let mut next = net.clone();
    next.disable_all();
    next.fire(index);
    let enabled = next.evaluate_all();

    let state = if enabled.is_empty() {
        StepState::Terminal
    } else if next.is_deterministic() && enabled.len() > 1 {
        StepState::Conflict(enabled)
    } else {
        StepState::Ready(enabled)
    };
    log::debug!("resolved with {}: {:?}", selected, state);
    Ok(Step { net: next, state })
}
