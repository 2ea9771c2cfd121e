use crate::error::{Result, SubfixError};
use crate::subtitle::Millis;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a single check participates in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    Off,
    #[default]
    Check,
    Fix,
}

impl CheckMode {
    pub fn enabled(self) -> bool {
        self != CheckMode::Off
    }

    pub fn fixes(self) -> bool {
        self == CheckMode::Fix
    }
}

impl std::fmt::Display for CheckMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMode::Off => write!(f, "off"),
            CheckMode::Check => write!(f, "check"),
            CheckMode::Fix => write!(f, "fix"),
        }
    }
}

impl std::str::FromStr for CheckMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "disabled" => Ok(CheckMode::Off),
            "check" => Ok(CheckMode::Check),
            "fix" => Ok(CheckMode::Fix),
            _ => Err(format!(
                "Unknown check mode: {}. Use 'off', 'check', or 'fix'",
                s
            )),
        }
    }
}

/// A warning/error threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits<T> {
    pub warn: T,
    pub error: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gap reserved before the next subtitle by the timing fix.
    pub min_gap_ms: Millis,
    /// Floors for the standalone gap check. `error` must not exceed `warn`.
    pub gap: Limits<Millis>,
    pub min_duration_ms: Millis,
    pub max_duration_ms: Millis,
    pub max_chars_per_sec: f64,
    /// Text length limits. `warn` must be below `error`.
    pub line_length: Limits<usize>,
    pub split_interval_ms: Millis,
    pub split_gap_ms: Millis,
    pub gap_check: CheckMode,
    pub timing_check: CheckMode,
    pub length_check: CheckMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_gap_ms: 150,
            gap: Limits {
                warn: 150,
                error: 100,
            },
            min_duration_ms: 1500,
            max_duration_ms: 7000,
            max_chars_per_sec: 20.0,
            line_length: Limits { warn: 70, error: 80 },
            split_interval_ms: 5 * 60 * 1000,
            split_gap_ms: 2000,
            gap_check: CheckMode::Fix,
            timing_check: CheckMode::Fix,
            length_check: CheckMode::Check,
        }
    }
}

impl Config {
    /// Defaults, then the user config file, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Ignoring malformed config {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_parse("SUBFIX_MIN_GAP") {
            self.min_gap_ms = v;
        }
        if let Some(v) = env_parse("SUBFIX_MIN_DURATION") {
            self.min_duration_ms = v;
        }
        if let Some(v) = env_parse("SUBFIX_MAX_DURATION") {
            self.max_duration_ms = v;
        }
        if let Some(v) = env_parse("SUBFIX_MAX_CPS") {
            self.max_chars_per_sec = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_gap_ms < 0 || self.gap.error < 0 {
            return Err(SubfixError::Config("Gaps must not be negative".to_string()));
        }
        if self.gap.error > self.gap.warn {
            return Err(SubfixError::Config(format!(
                "Gap error floor ({}ms) must not exceed warning floor ({}ms)",
                self.gap.error, self.gap.warn
            )));
        }
        if self.max_duration_ms <= 0 || self.min_duration_ms < 0 {
            return Err(SubfixError::Config(
                "Durations must be positive".to_string(),
            ));
        }
        if self.min_duration_ms > self.max_duration_ms {
            return Err(SubfixError::Config(format!(
                "Minimum duration ({}ms) exceeds maximum duration ({}ms)",
                self.min_duration_ms, self.max_duration_ms
            )));
        }
        if !self.max_chars_per_sec.is_finite() || self.max_chars_per_sec <= 0.0 {
            return Err(SubfixError::Config(
                "Reading speed limit must be greater than 0".to_string(),
            ));
        }
        if self.line_length.warn >= self.line_length.error {
            return Err(SubfixError::Config(format!(
                "Line length warning limit ({}) must be below error limit ({})",
                self.line_length.warn, self.line_length.error
            )));
        }
        if self.split_interval_ms <= 0 {
            return Err(SubfixError::Config(
                "Split interval must be greater than 0".to_string(),
            ));
        }
        if self.split_gap_ms < 0 {
            return Err(SubfixError::Config(
                "Split gap must not be negative".to_string(),
            ));
        }
        if self.length_check.fixes() {
            return Err(SubfixError::Config(
                "Line length issues cannot be fixed automatically; use 'check'".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subfix").join("config.toml"))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}: cannot parse '{}'", key, value);
            None
        }
    }
}
