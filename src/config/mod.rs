//! Configuration management for revsieve.
//!
//! Configuration is read from `~/.config/revsieve/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::scraper::{BrowserSettings, ExhaustionConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
    pub exhaustion: ExhaustionConfig,
    pub status: StatusConfig,
    pub output: OutputConfig,
}

/// Where status messages are shown besides the terminal
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Show a toast inside the scraped page (default: true)
    pub page_toast: bool,

    /// How long a toast stays up, in milliseconds (default: 5000)
    pub toast_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            page_toast: true,
            toast_ms: 5000,
        }
    }
}

impl StatusConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }
}

/// Default CSV file names per mode
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub listing_file: PathBuf,
    pub carousel_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            listing_file: PathBuf::from("judgeme_reviews.csv"),
            carousel_file: PathBuf::from("judgeme_carousel_reviews.csv"),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/revsieve/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("revsieve").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# revsieve configuration

[browser]
# Run browser in headless mode (no visible window)
headless = true

# Page load timeout in seconds
timeout_secs = 30

# Wait time after page load for the review widget to render (milliseconds)
wait_after_load_ms = 1000

[exhaustion]
# Wait after clicking "next page" before reading reviews (milliseconds)
page_settle_ms = 1500

# Wait after scrolling before measuring the page height (milliseconds)
scroll_settle_ms = 1000

# Optional safety limits. Leave unset to follow the widget to its end.
# max_pages = 200
# max_scrolls = 200

# Widget markup
pagination_selector = ".jdgm-paginate"
next_page_selector = ".jdgm-paginate__next-page"
disabled_class = "jdgm-disabled"

[status]
# Show progress toasts inside the scraped page
page_toast = true
toast_ms = 5000

[output]
listing_file = "judgeme_reviews.csv"
carousel_file = "judgeme_carousel_reviews.csv"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
