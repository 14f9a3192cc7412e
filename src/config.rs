// src/config.rs
use std::env;
use thiserror::Error;

use crate::domain::article::WorkflowSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
    database_max_connections: u32,
    workflow: WorkflowSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_max_connections() -> u32 {
    16
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

fn flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(value) => parse_flag(key, &value),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Build configuration from environment variables, reading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| default_listen_addr());

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| {
                    ConfigError::Invalid(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer".into(),
                    )
                })?,
            Err(_) => default_max_connections(),
        };

        let defaults = WorkflowSettings::default();
        let workflow = WorkflowSettings {
            draft_mode: flag("DRAFT_MODE", defaults.draft_mode)?,
            auto_release_after_approved: flag(
                "AUTO_RELEASE_AFTER_APPROVED",
                defaults.auto_release_after_approved,
            )?,
        };

        Ok(Self {
            database_url,
            listen_addr,
            database_max_connections,
            workflow,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn database_max_connections(&self) -> u32 {
        self.database_max_connections
    }

    pub fn workflow(&self) -> WorkflowSettings {
        self.workflow
    }
}
