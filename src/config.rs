use crate::region::BoundingBox;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: Target,
    #[serde(default)]
    pub run: Run,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    /// Extra or overriding bounding boxes, keyed by country name.
    #[serde(default)]
    pub regions: BTreeMap<String, BoundingBox>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, bbox) in &self.regions {
            bbox.validate()
                .with_context(|| format!("regions.{name}"))?;
        }
        if self.run.dim == 0 {
            anyhow::bail!("run.dim must be at least 1");
        }
        match self.target.scheme.as_str() {
            "http" | "https" => Ok(()),
            other => anyhow::bail!("unsupported target.scheme: {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub endpoint: String,
}
impl Default for Target {
    fn default() -> Self {
        Self {
            scheme: "http".into(),
            host: "localhost".into(),
            port: 80,
            endpoint: "/spp/".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub requests: u32,
    pub dim: usize,
    pub timeout_seconds: u64,
    pub grace_period_ms: u64,
    pub poll_interval_ms: u64,
    /// 0 disables the overall polling deadline.
    pub poll_deadline_seconds: u64,
    pub constant: bool,
    #[serde(default)]
    pub seed: Option<u64>,
}
impl Default for Run {
    fn default() -> Self {
        Self {
            requests: 1,
            dim: 100,
            timeout_seconds: 60,
            grace_period_ms: 1000,
            poll_interval_ms: 1000,
            poll_deadline_seconds: 0,
            constant: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub silent: bool,
    pub verbose: bool,
    pub show_matrix: bool,
    pub print_result: bool,
    pub color: bool,
    pub report_json: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            silent: false,
            verbose: false,
            show_matrix: false,
            print_result: false,
            color: true,
            report_json: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
            write_to_file: false,
            file_path: "spp-loadtest.log".into(),
        }
    }
}
