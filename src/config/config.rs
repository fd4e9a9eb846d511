use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StorageConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend API, storage, session policy, logging.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionSettings,
    pub logging: LoggingConfig,
}

/// Load config from a YAML file named "config.yaml" in the current directory,
/// with `KOII_`-prefixed environment overrides.
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("KOII_").split("__"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

/// Where the backend API lives and how long we wait for it.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. "https://api.treasurekoii.com".
    pub base_url: String,
    pub timeout_in_ms: Option<u64>,
}

/// Session lifecycle policy.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct SessionSettings {
    /// Period of the unconditional background refresh, in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

// 23 hours, just inside the backend's 24h refresh-token window.
fn default_refresh_interval_secs() -> u64 {
    23 * 60 * 60
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}
