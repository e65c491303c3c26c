//! Engine settings.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file) gives a working engine.
//!
//! ```toml
//! ranker_timeout_ms = 10000
//! panel_label_prefix = "Panel"
//! date_label_format = "%b %d, %Y"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scheduler::{InvalidDateFormat, SlotLabels};

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    InvalidDateFormat(#[from] InvalidDateFormat),
}

/// Tunables for [`SchedulingEngine`](crate::engine::SchedulingEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Upper bound on a single ranker call.
    pub ranker_timeout_ms: u64,
    /// Prefix of panel labels (`"{prefix} {n}"`).
    pub panel_label_prefix: String,
    /// `chrono` format string for date labels.
    pub date_label_format: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let labels = SlotLabels::default();
        Self {
            ranker_timeout_ms: 10_000,
            panel_label_prefix: labels.panel_prefix,
            date_label_format: labels.date_format,
        }
    }
}

impl EngineSettings {
    /// Parses settings from a TOML string.
    ///
    /// Rejects a `date_label_format` that cannot render a date.
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the label formats.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.labels().validate()?;
        Ok(())
    }

    /// Reads settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn with_ranker_timeout(mut self, timeout: Duration) -> Self {
        self.ranker_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[inline]
    pub fn ranker_timeout(&self) -> Duration {
        Duration::from_millis(self.ranker_timeout_ms)
    }

    /// Label formats for the allocator.
    pub fn labels(&self) -> SlotLabels {
        SlotLabels {
            panel_prefix: self.panel_label_prefix.clone(),
            date_format: self.date_label_format.clone(),
        }
    }
}
