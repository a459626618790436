use std::path::Path;

use crate::app::error::{Result, RevsieveError};
use crate::config::Config;
use crate::navigator::HttpProbe;
use crate::scraper::{ChromeBrowser, ChromePage, PageToast};
use crate::status::{FanoutSink, LogSink};

pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load config from `path`, or from the default location when `None`
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Config::load_from(p),
            None => Config::load(),
        }
        .map_err(|e| RevsieveError::Config(e.to_string()))?;

        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub async fn launch_browser(&self) -> Result<ChromeBrowser> {
        ChromeBrowser::launch(self.config.browser.clone()).await
    }

    /// Terminal log plus, when enabled, a toast in `page`
    pub fn status_sink(&self, page: &ChromePage) -> FanoutSink {
        let sink = FanoutSink::new().with(LogSink::stdout());
        if self.config.status.page_toast {
            sink.with(PageToast::new(
                page.clone(),
                self.config.status.toast_duration(),
            ))
        } else {
            sink
        }
    }

    pub fn probe(&self) -> Result<HttpProbe> {
        HttpProbe::new(
            self.config.browser.user_agent.as_deref(),
            self.config.browser.timeout(),
        )
    }
}
