use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration, read from `<config dir>/almanac/config.toml`.
/// Every field has a default; a missing file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Calendar file location. When unset the store falls back to
    /// `./almanac.ics` or the per-user data directory.
    #[serde(default)]
    pub calendar: Option<PathBuf>,
    /// Minimum gap enforced by auto-spacing when a request names none.
    #[serde(default = "default_gap_minutes")]
    pub default_gap_minutes: i64,
    /// Earliest slot considered when rebalancing places an event, `HH:MM`.
    #[serde(default = "default_day_start")]
    pub day_start: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar: None,
            default_gap_minutes: default_gap_minutes(),
            day_start: default_day_start(),
        }
    }
}

impl Config {
    /// The configured day start as a time of day; falls back to 10:00 when
    /// the configured string does not parse.
    #[must_use]
    pub fn day_start_time(&self) -> chrono::NaiveTime {
        chrono::NaiveTime::parse_from_str(&self.day_start, "%H:%M")
            .unwrap_or_else(|_| chrono::NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"))
    }
}

/// Load the user config, or defaults when no file exists.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_config() -> Result<Config> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    let path = config_dir.join("almanac/config.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_gap_minutes() -> i64 {
    60
}

fn default_day_start() -> String {
    "10:00".to_string()
}
