//! 基于网结构与当前标识的分析。
//!
//! 除可达性外，各分析均为无状态的一次性计算，结果以带 `analysisType` 标签的
//! [`AnalysisReport`] 输出。
pub mod boundness;
pub mod liveness;
pub mod reachability;
pub mod structural;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::net::{Incidence, Net, PlaceId, TransitionId};

pub use boundness::{BoundednessReport, analyze_boundedness};
pub use liveness::{LivenessReport, analyze_liveness};
pub use reachability::{
    ReachabilityConfig, ReachabilityReport, StateGraph, analyze_reachable_states, explore,
};
pub use structural::{StructuralReport, perform_structural_analysis};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidenceReport {
    pub place_ids: Vec<PlaceId>,
    pub transition_ids: Vec<TransitionId>,
    /// 行对应库所，列对应迁移
    pub incidence_matrix: Vec<Vec<i64>>,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "analysisType")]
pub enum AnalysisReport {
    #[serde(rename = "Reachable States")]
    Reachability(ReachabilityReport),
    #[serde(rename = "Liveness Analysis")]
    Liveness(LivenessReport),
    #[serde(rename = "Boundedness Analysis")]
    Boundedness(BoundednessReport),
    #[serde(rename = "Incidence Matrix")]
    Incidence(IncidenceReport),
    #[serde(rename = "Structural Analysis")]
    Structural(StructuralReport),
}

impl AnalysisReport {
    pub fn analysis_type(&self) -> &'static str {
        match self {
            AnalysisReport::Reachability(_) => "Reachable States",
            AnalysisReport::Liveness(_) => "Liveness Analysis",
            AnalysisReport::Boundedness(_) => "Boundedness Analysis",
            AnalysisReport::Incidence(_) => "Incidence Matrix",
            AnalysisReport::Structural(_) => "Structural Analysis",
        }
    }

    pub fn details(&self) -> &str {
        match self {
            AnalysisReport::Reachability(report) => &report.details,
            AnalysisReport::Liveness(report) => &report.details,
            AnalysisReport::Boundedness(report) => &report.details,
            AnalysisReport::Incidence(report) => &report.details,
            AnalysisReport::Structural(report) => &report.details,
        }
    }
}

pub fn compute_incidence_matrix(net: &Net) -> IncidenceReport {
    let incidence = Incidence::from_net(net);
    IncidenceReport {
        details: format!(
            "Incidence matrix computed: {} places × {} transitions",
            incidence.places().len(),
            incidence.transitions().len()
        ),
        place_ids: incidence.places().to_vec(),
        transition_ids: incidence.transitions().to_vec(),
        incidence_matrix: incidence.to_vecs(),
    }
}

/// 依次执行五种分析，可达性探索使用配置中的状态上限。
pub fn analyze_all(net: &Net, config: &EngineConfig) -> Vec<AnalysisReport> {
    let reachability = ReachabilityConfig {
        state_limit: config.max_reachable_states,
    };
    vec![
        AnalysisReport::Reachability(explore(net, &reachability).0),
        AnalysisReport::Liveness(analyze_liveness(net)),
        AnalysisReport::Boundedness(analyze_boundedness(net)),
        AnalysisReport::Incidence(compute_incidence_matrix(net)),
        AnalysisReport::Structural(perform_structural_analysis(net)),
    ]
}
