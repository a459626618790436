use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the Chrome instance that hosts the review page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Page load timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait time after navigation for the widget to render, in milliseconds (default: 1000)
    pub wait_after_load_ms: u64,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
            wait_after_load_ms: 1000,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl BrowserSettings {
    /// Get the page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }
}

/// Controls how the review list is driven to its end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhaustionConfig {
    /// Delay after clicking "next page" before reading the DOM (default: 1500)
    pub page_settle_ms: u64,

    /// Delay after scrolling to the bottom before measuring height (default: 1000)
    pub scroll_settle_ms: u64,

    /// Stop after this many pages. Unset means follow the widget until it
    /// disables its next button.
    pub max_pages: Option<u32>,

    /// Stop after this many scrolls. Unset means scroll until the height
    /// stops changing.
    pub max_scrolls: Option<u32>,

    /// Presence of this element selects the paginated strategy
    pub pagination_selector: String,

    /// The "next page" control
    pub next_page_selector: String,

    /// Class the widget puts on the next control once there are no more pages
    pub disabled_class: String,
}

impl Default for ExhaustionConfig {
    fn default() -> Self {
        Self {
            page_settle_ms: 1500,
            scroll_settle_ms: 1000,
            max_pages: None,
            max_scrolls: None,
            pagination_selector: ".jdgm-paginate".to_string(),
            next_page_selector: ".jdgm-paginate__next-page".to_string(),
            disabled_class: "jdgm-disabled".to_string(),
        }
    }
}

impl ExhaustionConfig {
    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    /// Same selectors and bounds with both settle delays removed
    pub fn immediate() -> Self {
        Self {
            page_settle_ms: 0,
            scroll_settle_ms: 0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_browser_settings() {
        let settings = BrowserSettings::default();
        assert!(settings.headless);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.wait_after_load(), Duration::from_millis(1000));
        assert!(settings.user_agent.is_some());
    }

    #[test]
    fn test_default_exhaustion_values() {
        let config = ExhaustionConfig::default();
        assert_eq!(config.page_settle(), Duration::from_millis(1500));
        assert_eq!(config.scroll_settle(), Duration::from_millis(1000));
        assert_eq!(config.max_pages, None);
        assert_eq!(config.max_scrolls, None);
        assert_eq!(config.pagination_selector, ".jdgm-paginate");
        assert_eq!(config.next_page_selector, ".jdgm-paginate__next-page");
        assert_eq!(config.disabled_class, "jdgm-disabled");
    }

    #[test]
    fn test_immediate_keeps_selectors() {
        let config = ExhaustionConfig::immediate();
        assert_eq!(config.page_settle(), Duration::ZERO);
        assert_eq!(config.scroll_settle(), Duration::ZERO);
        assert_eq!(config.next_page_selector, ".jdgm-paginate__next-page");
    }
}
