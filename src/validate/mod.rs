//! 校验：在确定模式下从给定输入反复单步执行，判断网能否无冲突、无循环地
//! 停在期望的输出标识上。
//!
//! 所有失败都以 [`ValidationReport`] 的形式返回，而不是错误。
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::net::{Net, NetDescription, PlaceTokens, TransitionId, ValidationRequest};
use crate::simulation::{FirstEnabled, Simulator, StepState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationVerdict {
    Success,
    NoInitialTokens,
    Conflict,
    InfiniteLoop,
    IterationLimit,
    OutputMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub verdict: ValidationVerdict,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicting_transitions: Option<Vec<TransitionId>>,
    pub final_state: NetDescription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_matches: Option<IndexMap<String, bool>>,
}

impl ValidationReport {
    fn failure(verdict: ValidationVerdict, message: String, final_state: &Net) -> Self {
        log::warn!("{}", message);
        Self {
            valid: false,
            verdict,
            message,
            conflicting_transitions: None,
            final_state: final_state.into(),
            output_matches: None,
        }
    }
}

/// 使用默认迭代上限校验。
pub fn validate(net: &Net, inputs: &[PlaceTokens], expected: &[PlaceTokens]) -> ValidationReport {
    validate_with(net, inputs, expected, &EngineConfig::default())
}

pub fn validate_request(
    request: &ValidationRequest,
    config: &EngineConfig,
) -> Result<ValidationReport, crate::net::NetError> {
    let net = Net::try_from(&request.net)?;
    Ok(validate_with(
        &net,
        &request.input_configs,
        &request.expected_outputs,
        config,
    ))
}

pub fn validate_with(
    net: &Net,
    inputs: &[PlaceTokens],
    expected: &[PlaceTokens],
    config: &EngineConfig,
) -> ValidationReport {
    let mut current = net.clone();
    current.set_deterministic(true);
    apply_inputs(&mut current, inputs);

    if current.total_tokens() == 0 {
        return ValidationReport::failure(
            ValidationVerdict::NoInitialTokens,
            "Validation failed: No initial tokens provided in the input configuration. The simulation requires at least one token to start.".to_string(),
            &current,
        );
    }

    let max_iterations = config.max_validation_iterations;
    let mut simulator = Simulator::new(FirstEnabled);
    let mut seen: HashSet<String> = HashSet::new();
    let mut iterations = 0usize;

    loop {
        let signature = current.state_signature();
        if !seen.insert(signature.clone()) {
            return ValidationReport::failure(
                ValidationVerdict::InfiniteLoop,
                format!(
                    "Validation failed: Infinite loop detected. The simulation encountered the same token distribution multiple times. Repeated state signature: [{}]",
                    signature
                ),
                &current,
            );
        }

        iterations += 1;
        if iterations > max_iterations {
            return ValidationReport::failure(
                ValidationVerdict::IterationLimit,
                format!(
                    "Validation failed: Simulation exceeded the maximum allowed number of iterations ({}). This often indicates a potential infinite loop or an unexpectedly long execution.",
                    max_iterations
                ),
                &current,
            );
        }

        let step = simulator.process(&current);
        match step.state {
            StepState::Fired(id) => {
                log::debug!("iteration {}: fired {}", iterations, id);
                current = step.net;
            }
            StepState::Conflict(ids) => {
                let mut report = ValidationReport::failure(
                    ValidationVerdict::Conflict,
                    "Validation failed: conflict detected with multiple enabled transitions. There can only be one enabled transition at a time.".to_string(),
                    &step.net,
                );
                report.conflicting_transitions = Some(ids);
                return report;
            }
            StepState::Ready(_) | StepState::Terminal => {
                return compare_outputs(&step.net, expected);
            }
        }
    }
}

/// 清零全部库所后写入输入 token；未知库所跳过，超出容量的部分被截断。
fn apply_inputs(net: &mut Net, inputs: &[PlaceTokens]) {
    for place in net.places.values_mut() {
        place.set_tokens(0);
    }
    for input in inputs {
        match net.get_place_mut(&input.id) {
            Some(place) => place.set_tokens(input.tokens.max(0) as u64),
            None => log::warn!("input place {} not found, skipped", input.id),
        }
    }
}

fn compare_outputs(net: &Net, expected: &[PlaceTokens]) -> ValidationReport {
    let mut matches = IndexMap::new();
    let mut detail = String::new();

    for output in expected {
        let matched = match net.get_place(&output.id) {
            None => {
                detail.push_str(&format!("Place {} not found. ", output.id));
                false
            }
            Some(place) if place.tokens() as i64 != output.tokens => {
                detail.push_str(&format!(
                    "Place {} has {} tokens, expected {}. ",
                    output.id,
                    place.tokens(),
                    output.tokens
                ));
                false
            }
            Some(_) => true,
        };
        matches.insert(output.id.clone(), matched);
    }

    let valid = matches.values().all(|&matched| matched);
    let (verdict, message) = if valid {
        (
            ValidationVerdict::Success,
            "Validation successful: all output places match expected token counts".to_string(),
        )
    } else {
        (
            ValidationVerdict::OutputMismatch,
            format!("Validation failed: {}", detail),
        )
    };
    if valid {
        log::info!("{}", message);
    } else {
        log::warn!("{}", message);
    }

    ValidationReport {
        valid,
        verdict,
        message,
        conflicting_transitions: None,
        final_state: net.into(),
        output_matches: Some(matches),
    }
}
