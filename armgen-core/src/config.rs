use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration for a collection run. Every field has a default so a
/// partial file (or none of a section at all) still loads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default = "default_num_joints")]
    pub num_joints: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_goal_tolerance")]
    pub goal_tolerance: f32,
    #[serde(default = "default_step_size")]
    pub step_size: f32,
    #[serde(default = "default_joint_limit")]
    pub joint_limit: f32,
    /// When set, the engine only hands out start/goal pairs that a straight
    /// joint-space line cannot connect. Forced off for random-step collection.
    #[serde(default = "default_challenging_goals_only")]
    pub challenging_goals_only: bool,
    #[serde(default = "default_engine_socket")]
    pub engine_socket: String,
    /// Command line used to launch one engine process per worker. When absent
    /// the engines are expected to connect on their own.
    #[serde(default)]
    pub engine_cmd: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    #[serde(default = "default_total_samples")]
    pub total_samples: usize,
    #[serde(default = "default_samples_per_file")]
    pub samples_per_file: usize,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
}

fn default_num_joints() -> usize {
    5
}

fn default_max_steps() -> usize {
    100
}

fn default_goal_tolerance() -> f32 {
    0.05
}

fn default_step_size() -> f32 {
    0.05
}

fn default_joint_limit() -> f32 {
    std::f32::consts::PI
}

fn default_challenging_goals_only() -> bool {
    true
}

fn default_engine_socket() -> String {
    "armgen-engine".to_string()
}

fn default_total_samples() -> usize {
    1000
}

fn default_samples_per_file() -> usize {
    100
}

fn default_workers() -> usize {
    2
}

fn default_results_dir() -> String {
    "supervised_data".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            num_joints: default_num_joints(),
            max_steps: default_max_steps(),
            goal_tolerance: default_goal_tolerance(),
            step_size: default_step_size(),
            joint_limit: default_joint_limit(),
            challenging_goals_only: default_challenging_goals_only(),
            engine_socket: default_engine_socket(),
            engine_cmd: None,
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            total_samples: default_total_samples(),
            samples_per_file: default_samples_per_file(),
            workers: default_workers(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            collection: CollectionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl CollectConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: CollectConfig = serde_yaml::from_str(
            "collection:\n  total_samples: 1000000\n  samples_per_file: 5000\n  workers: 10\n",
        )
        .unwrap();
        assert_eq!(config.collection.total_samples, 1_000_000);
        assert_eq!(config.collection.samples_per_file, 5000);
        assert_eq!(config.collection.workers, 10);
        assert_eq!(config.planner.num_joints, 5);
        assert!(config.planner.challenging_goals_only);
        assert_eq!(config.output.results_dir, "supervised_data");
    }

    #[test]
    fn dump_round_trips() {
        let config = CollectConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: CollectConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.collection.total_samples, config.collection.total_samples);
        assert_eq!(parsed.planner.engine_socket, config.planner.engine_socket);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CollectConfig::load("does/not/exist.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
