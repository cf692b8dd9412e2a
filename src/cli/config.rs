use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{
    client::backend::DEFAULT_BASE_URL,
    progress::progress_model::ProgressConfig,
    workflow::workflow_model::WorkflowConfig,
};

pub const DEFAULT_CONFIG_FILE: &str = "produce-analyzer.yaml";
pub const BASE_URL_ENV: &str = "BASE_URL";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "produce-analyzer",
    version,
    about = "Quality reports for fruit and vegetable photos"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Analysis service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to config file (default: produce-analyzer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one image from disk or from the web
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,

        /// Append workflow trace events (JSON lines) to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Look up the current market price of a product
    Price {
        /// Product name, e.g. "apple"
        #[arg(long)]
        name: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Local image file
    #[arg(long)]
    pub file: Option<String>,

    /// Direct link to an image (jpg, jpeg, png, webp, bmp, gif)
    #[arg(long)]
    pub url: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `produce-analyzer.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub workflow: WorkflowFileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,

    #[serde(default = "default_true")]
    pub enrich_prices: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            enrich_prices: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowFileConfig {
    #[serde(default = "default_min_visible_ms")]
    pub min_visible_ms: u64,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for WorkflowFileConfig {
    fn default() -> Self {
        Self {
            min_visible_ms: default_min_visible_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl WorkflowFileConfig {
    pub fn to_workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            min_visible: Duration::from_millis(self.min_visible_ms),
            progress: ProgressConfig {
                // a zero period would make tokio's interval panic
                tick_interval: Duration::from_millis(self.tick_ms.max(1)),
                ..ProgressConfig::default()
            },
        }
    }
}

// Serde default helpers
fn default_true() -> bool { true }
fn default_min_visible_ms() -> u64 { 1500 }
fn default_tick_ms() -> u64 { 200 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Resolve the service base URL: CLI > config > env > default.
pub fn resolve_base_url(cli: Option<&str>, config: &AppConfig, env: Option<&str>) -> String {
    cli.or(config.service.base_url.as_deref())
        .or(env)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}
