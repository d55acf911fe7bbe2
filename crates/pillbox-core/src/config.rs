use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8320;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Top-level config (pillbox.toml + PILLBOX_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PillboxConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// MQTT broker settings for the device relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_host")]
    pub host: String,
    #[serde(default = "default_broker_port")]
    pub port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Topic schedule snapshots are published to (write path and sync replies).
    #[serde(default = "default_outbound_topic")]
    pub outbound_topic: String,
    /// Topic the relay subscribes to for {name, day} sync requests.
    #[serde(default = "default_inbound_topic")]
    pub inbound_topic: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_broker_host(),
            port: DEFAULT_BROKER_PORT,
            client_id: default_client_id(),
            outbound_topic: default_outbound_topic(),
            inbound_topic: default_inbound_topic(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.pillbox/pillbox.db", home)
}
fn default_broker_host() -> String {
    "localhost".to_string()
}
fn default_broker_port() -> u16 {
    DEFAULT_BROKER_PORT
}
fn default_client_id() -> String {
    "pillbox-backend".to_string()
}
fn default_outbound_topic() -> String {
    "pillbox/schedule".to_string()
}
fn default_inbound_topic() -> String {
    "pillbox/sync".to_string()
}

impl PillboxConfig {
    /// Load config from a TOML file with PILLBOX_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.pillbox/pillbox.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: PillboxConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("PILLBOX_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.pillbox/pillbox.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = PillboxConfig::default();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert_eq!(cfg.broker.port, DEFAULT_BROKER_PORT);
        assert_eq!(cfg.broker.outbound_topic, "pillbox/schedule");
        assert_eq!(cfg.broker.inbound_topic, "pillbox/sync");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = PillboxConfig::load(Some("/nonexistent/pillbox.toml")).unwrap();
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
    }
}
