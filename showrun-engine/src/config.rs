//! Configuration for the showrun engine
//!
//! Loaded once at startup from a TOML file (see
//! [`showrun_common::config`] for file lookup). Every field has a built-in
//! default so an empty or missing file still yields a working engine.
//!
//! ```toml
//! port = 4001
//! tick_interval_ms = 1000
//!
//! [osc]
//! enabled = true
//! host = "127.0.0.1"
//! port = 8000
//!
//! [http.on_finish]
//! enabled = true
//! url = "http://video.local/next?title=$next-title"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use showrun_common::config::{load_or_default, resolve_config_path, CONFIG_ENV_VAR};
use showrun_common::events::CyclePhase;
use tracing::warn;

use crate::error::Result;

/// Tick interval bounds in milliseconds
pub const MIN_TICK_MS: u64 = 50;
pub const MAX_TICK_MS: u64 = 10_000;

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// HTTP server port
    pub port: u16,

    /// Re-evaluation interval of the playback cycle
    pub tick_interval_ms: u64,

    /// Rundown file loaded at startup (optional)
    pub rundown: Option<PathBuf>,

    pub logging: LoggingConfig,

    pub osc: OscConfig,

    /// Per-phase HTTP triggers
    pub http: HttpTriggers,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            tick_interval_ms: default_tick_interval_ms(),
            rundown: None,
            logging: LoggingConfig::default(),
            osc: OscConfig::default(),
            http: HttpTriggers::default(),
        }
    }
}

impl EngineConfig {
    /// Resolve and load the config file, falling back to defaults
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(cli_path, CONFIG_ENV_VAR);
        Ok(load_or_default(path.as_deref())?)
    }

    /// Parse config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(showrun_common::Error::from)?)
    }

    /// Tick interval, clamped to the supported range
    pub fn tick_interval(&self) -> Duration {
        let clamped = self.tick_interval_ms.clamp(MIN_TICK_MS, MAX_TICK_MS);
        if clamped != self.tick_interval_ms {
            warn!(
                "tick_interval_ms {} out of range, using {}",
                self.tick_interval_ms, clamped
            );
        }
        Duration::from_millis(clamped)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// OSC destination
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Address prefix, e.g. `/showrun` gives `/showrun/play`
    pub prefix: String,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 8000,
            prefix: default_osc_prefix(),
        }
    }
}

/// One HTTP trigger entry
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpTrigger {
    pub enabled: bool,
    /// URL template with `$placeholders`
    pub url: String,
}

/// HTTP trigger per lifecycle phase
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpTriggers {
    pub on_load: Option<HttpTrigger>,
    pub on_start: Option<HttpTrigger>,
    pub on_update: Option<HttpTrigger>,
    pub on_pause: Option<HttpTrigger>,
    pub on_stop: Option<HttpTrigger>,
    pub on_finish: Option<HttpTrigger>,
}

impl HttpTriggers {
    /// The enabled trigger for `phase`, if any
    pub fn for_phase(&self, phase: CyclePhase) -> Option<&HttpTrigger> {
        let entry = match phase {
            CyclePhase::OnLoad => self.on_load.as_ref(),
            CyclePhase::OnStart => self.on_start.as_ref(),
            CyclePhase::OnUpdate => self.on_update.as_ref(),
            CyclePhase::OnPause => self.on_pause.as_ref(),
            CyclePhase::OnStop => self.on_stop.as_ref(),
            CyclePhase::OnFinish => self.on_finish.as_ref(),
            CyclePhase::Idle | CyclePhase::Armed => None,
        };
        entry.filter(|t| t.enabled && !t.url.trim().is_empty())
    }
}

fn default_port() -> u16 {
    4001
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_osc_prefix() -> String {
    "/showrun".to_string()
}
