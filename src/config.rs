use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 引擎上限与随机种子，可由 `pn.toml` 覆盖。
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default = "default_max_reachable_states")]
    pub max_reachable_states: usize,
    #[serde(default = "default_max_validation_iterations")]
    pub max_validation_iterations: usize,
    #[serde(default = "default_max_simulation_steps")]
    pub max_simulation_steps: usize,
    /// 非确定模式下随机选择的种子，缺省时取自操作系统
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_reachable_states: default_max_reachable_states(),
            max_validation_iterations: default_max_validation_iterations(),
            max_simulation_steps: default_max_simulation_steps(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

fn default_max_reachable_states() -> usize {
    1000
}

fn default_max_validation_iterations() -> usize {
    1000
}

fn default_max_simulation_steps() -> usize {
    1000
}
