//! Configuration file management for waypoint.
//!
//! Provides a TOML-based config file at `~/.config/waypoint/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use waypoint_core::genai::{GeminiClient, GeminiConfig, OfflineModel, RoadmapModel};
use waypoint_core::roadmap::PlanGenerator;
use waypoint_db::config::DbConfig;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GENAI_MODEL";
pub const BASE_URL_ENV: &str = "GENAI_BASE_URL";
pub const TIMEOUT_ENV: &str = "GENAI_TIMEOUT_SECS";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub genai: GenaiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenaiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the waypoint config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/waypoint` or `~/.config/waypoint`,
/// never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("waypoint");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("waypoint")
}

/// Return the path to the waypoint config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix, since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct WaypointConfig {
    pub db_config: DbConfig,
    /// `None` when no API key is configured; plans then come from templates.
    pub gemini: Option<GeminiConfig>,
    pub request_timeout: Duration,
}

impl WaypointConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `WAYPOINT_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - API key: `GEMINI_API_KEY` > `genai.api_key` > none
    /// - Model, base URL, timeout: `GENAI_*` env > `[genai]` section > client defaults
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();
        let genai = file_config.as_ref().map(|c| &c.genai);

        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var(DbConfig::ENV_VAR) {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };
        let db_config = DbConfig::new(db_url);

        let timeout_secs = match non_empty_env(TIMEOUT_ENV) {
            Some(raw) => {
                let secs: u64 = raw.parse().with_context(|| {
                    format!("{TIMEOUT_ENV} is not a whole number of seconds: {raw:?}")
                })?;
                if secs == 0 {
                    bail!("{TIMEOUT_ENV} must be at least 1 second");
                }
                Some(secs)
            }
            None => match genai.and_then(|g| g.timeout_secs) {
                Some(0) => bail!("genai.timeout_secs must be at least 1 second"),
                secs => secs,
            },
        };
        let request_timeout = timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(GeminiConfig::DEFAULT_TIMEOUT);

        let api_key =
            non_empty_env(API_KEY_ENV).or_else(|| genai.and_then(|g| g.api_key.clone()));
        let gemini = api_key.map(|key| {
            let mut cfg = GeminiConfig::new(key);
            if let Some(model) =
                non_empty_env(MODEL_ENV).or_else(|| genai.and_then(|g| g.model.clone()))
            {
                cfg.model = model;
            }
            if let Some(base) =
                non_empty_env(BASE_URL_ENV).or_else(|| genai.and_then(|g| g.base_url.clone()))
            {
                cfg.base_url = base;
            }
            cfg.timeout = request_timeout;
            cfg
        });

        Ok(Self {
            db_config,
            gemini,
            request_timeout,
        })
    }

    /// Build the plan generator for this process.
    ///
    /// Without an API key the offline model is used, so every plan is a
    /// template fallback.
    pub fn plan_generator(&self) -> Result<PlanGenerator> {
        let model: Arc<dyn RoadmapModel> = match &self.gemini {
            Some(cfg) => Arc::new(
                GeminiClient::new(cfg.clone()).context("failed to build Gemini HTTP client")?,
            ),
            None => Arc::new(OfflineModel),
        };
        info!(model = model.name(), "plan generator ready");
        Ok(PlanGenerator::new(model, self.request_timeout))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
