//! Viewer configuration.
//!
//! Handles loading, validating, and merging `lightbox.toml`. Stock defaults
//! are the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [assets]
//! base_url = "photos/"      # Prefix joined with each photo's filename
//!
//! [gestures]
//! swipe_threshold = 50.0    # Minimum horizontal travel for a swipe
//!
//! [prefetch]
//! enabled = true            # Warm neighbouring photos after each navigation
//! neighbors = 1             # How many photos on each side
//!
//! [share]
//! message = "Link copied to clipboard"
//! duration_ms = 2000        # How long the toast stays up
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [gestures]
//! swipe_threshold = 80.0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Viewer configuration loaded from `lightbox.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Where photo assets live.
    pub assets: AssetsConfig,
    /// Touch gesture tuning.
    pub gestures: GesturesConfig,
    /// Neighbour prefetching.
    pub prefetch: PrefetchConfig,
    /// "Copy link" toast.
    pub share: ShareConfig,
}

impl ViewerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gestures.swipe_threshold.is_finite() && self.gestures.swipe_threshold > 0.0) {
            return Err(ConfigError::Validation(
                "gestures.swipe_threshold must be a positive number".into(),
            ));
        }
        if self.prefetch.neighbors == 0 {
            return Err(ConfigError::Validation(
                "prefetch.neighbors must be at least 1 (use enabled = false to turn prefetching off)"
                    .into(),
            ));
        }
        if self.share.message.trim().is_empty() {
            return Err(ConfigError::Validation(
                "share.message must not be empty".into(),
            ));
        }
        if self.share.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "share.duration_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// URL prefix for photo files. A trailing slash is optional.
    pub base_url: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: "photos/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GesturesConfig {
    /// Horizontal travel (CSS pixels) a touch must exceed to count as a swipe.
    pub swipe_threshold: f64,
}

impl Default for GesturesConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrefetchConfig {
    pub enabled: bool,
    /// Photos to warm on each side of the current one.
    pub neighbors: usize,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            neighbors: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Toast text shown after the link is copied.
    pub message: String,
    /// Toast lifetime in milliseconds.
    pub duration_ms: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            message: "Link copied to clipboard".to_string(),
            duration_ms: 2000,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ViewerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse TOML text, merge it over stock defaults, deserialize and validate.
pub fn parse_config(content: &str) -> Result<ViewerConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults; a present but invalid one is an error.
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if !path.exists() {
        return Ok(ViewerConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `lightbox.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lightbox Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# URL prefix joined with each photo's filename to form its image URL.
base_url = "photos/"

# ---------------------------------------------------------------------------
# Touch gestures
# ---------------------------------------------------------------------------
[gestures]
# Horizontal travel (CSS pixels) a touch must exceed to count as a swipe.
# The horizontal travel must also exceed the vertical travel.
swipe_threshold = 50.0

# ---------------------------------------------------------------------------
# Prefetching
# ---------------------------------------------------------------------------
[prefetch]
# Warm the photos next to the current one so navigation feels instant.
enabled = true

# Number of photos to warm on each side of the current one.
neighbors = 1

# ---------------------------------------------------------------------------
# Share ("copy link")
# ---------------------------------------------------------------------------
[share]
# Toast text shown after the deep link is copied.
message = "Link copied to clipboard"

# How long the toast stays visible, in milliseconds.
duration_ms = 2000
"##
}
