use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::http::ApiSettings;

pub const DEFAULT_CONFIG_PATH: &str = "migration-wizard.yaml";

pub const ENV_API_BASE_URL: &str = "MIGRATION_API_BASE_URL";
pub const ENV_API_VERSION_PATH: &str = "MIGRATION_API_VERSION_PATH";
pub const ENV_APIM_SUB_KEY: &str = "MIGRATION_APIM_SUB_KEY";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "migration-wizard",
    version,
    about = "Schema-driven migration wizard engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: migration-wizard.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Page schema file (.json, .yaml or .yml); the built-in schema if absent
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Append a JSONL session trace to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List page ids and titles
    Pages,

    /// Load and validate a schema, then print its fingerprint
    Validate,

    /// Render one page as JSON using fixture data
    Render {
        #[arg(long)]
        page: String,
    },

    /// Run walkthrough scripts from a YAML file or a directory of them
    Run {
        #[arg(long)]
        script: String,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `migration-wizard.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SchemaConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub version_path: Option<String>,
    pub subscription_key: Option<String>,
    pub customer_id: Option<String>,
    pub group_keys: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config file; using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config file > environment > defaults)
// ============================================================================

pub fn resolve_schema_path(cli: &Cli, config: &AppConfig) -> Option<String> {
    cli.schema.clone().or_else(|| config.schema.path.clone())
}

pub fn resolve_trace_path(cli: &Cli, config: &AppConfig) -> Option<String> {
    cli.trace.clone().or_else(|| config.trace.path.clone())
}

/// Build API settings from the config file, falling back to the environment
/// through `env` and then to built-in defaults.
pub fn resolve_api_settings(
    config: &ApiConfig,
    env: impl Fn(&str) -> Option<String>,
) -> ApiSettings {
    let defaults = ApiSettings::default();
    ApiSettings {
        base_url: config
            .base_url
            .clone()
            .or_else(|| env(ENV_API_BASE_URL))
            .unwrap_or(defaults.base_url),
        version_path: config
            .version_path
            .clone()
            .or_else(|| env(ENV_API_VERSION_PATH))
            .unwrap_or(defaults.version_path),
        subscription_key: config
            .subscription_key
            .clone()
            .or_else(|| env(ENV_APIM_SUB_KEY)),
        customer_id: config
            .customer_id
            .clone()
            .unwrap_or(defaults.customer_id),
        group_keys: config.group_keys.clone().unwrap_or(defaults.group_keys),
    }
}

/// Environment lookup that treats empty values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
