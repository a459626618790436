use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::app::{Result, RevsieveError};
use crate::domain::ReviewRecord;
use crate::scraper::config::BrowserSettings;
use crate::scraper::extractor::{js_literal as js, ReviewExtractor};
use crate::scraper::page::ReviewPage;
use crate::status::{Status, StatusSink};

/// Headless Chrome instance driven over CDP
pub struct ChromeBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
    settings: BrowserSettings,
}

impl ChromeBrowser {
    /// Launch a browser with the given settings
    pub async fn launch(settings: BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !settings.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| RevsieveError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            RevsieveError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            settings,
        })
    }

    /// Open `url` in a new tab and wait for the widget to render
    pub async fn open(&self, url: &str) -> Result<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RevsieveError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.settings.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| RevsieveError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        tokio::time::timeout(self.settings.timeout(), async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await
        .map_err(|_| {
            RevsieveError::Browser(format!(
                "Timed out after {}s loading {}",
                self.settings.timeout_secs, url
            ))
        })?
        .map_err(|e| RevsieveError::Browser(format!("Navigation failed: {}", e)))?;

        tokio::time::sleep(self.settings.wait_after_load()).await;

        Ok(ChromePage { page })
    }

    /// Close the browser and stop its event handler
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| RevsieveError::Browser(format!("Failed to close browser: {}", e)))?;
        let _ = self.browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

/// A Chrome tab seen through the [`ReviewPage`] boundary.
///
/// Every query runs as a small script so that selector semantics match
/// `document.querySelector` exactly. Review extraction runs in the page as
/// well, so text fields are the browser's own `innerText`.
#[derive(Clone)]
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| RevsieveError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| RevsieveError::Browser(format!("Failed to parse result: {:?}", e)))
    }
}

#[async_trait]
impl ReviewPage for ChromePage {
    async fn url(&self) -> Result<Option<Url>> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| RevsieveError::Browser(format!("Failed to read page URL: {}", e)))?;
        Ok(url.and_then(|u| Url::parse(&u).ok()))
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        self.eval(format!("document.querySelector({}) !== null", js(selector)))
            .await
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        self.eval(format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.getAttribute({}) : null; }})()",
            js(selector),
            js(name)
        ))
        .await
    }

    async fn has_class(&self, selector: &str, class: &str) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = document.querySelector({}); return !!el && el.classList.contains({}); }})()",
            js(selector),
            js(class)
        ))
        .await
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
            js(selector)
        ))
        .await
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let _: bool = self
            .eval("(() => { window.scrollTo(0, document.body.scrollHeight); return true; })()".to_string())
            .await?;
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64> {
        self.eval("document.body.scrollHeight".to_string()).await
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| RevsieveError::Browser(format!("Failed to read page content: {}", e)))
    }

    async fn extract(&self, extractor: &ReviewExtractor) -> Result<Vec<ReviewRecord>> {
        let rows: Vec<Vec<String>> = self.eval(extractor.extraction_script()).await?;
        Ok(extractor.records_from_rows(rows))
    }
}

/// Shows status messages as a toast in the scraped page itself.
///
/// Any previous toast is replaced; each one removes itself after
/// `duration`.
pub struct PageToast {
    page: ChromePage,
    duration: Duration,
}

impl PageToast {
    pub fn new(page: ChromePage, duration: Duration) -> Self {
        Self { page, duration }
    }

    fn script(&self, message: &str) -> String {
        format!(
            r#"
            (() => {{
                const existing = document.getElementById('jdgm-status');
                if (existing) existing.remove();
                const bar = document.createElement('div');
                bar.id = 'jdgm-status';
                Object.assign(bar.style, {{
                    position: 'fixed',
                    bottom: '20px',
                    left: '20px',
                    padding: '10px 14px',
                    background: '#111',
                    color: '#fff',
                    borderRadius: '6px',
                    fontSize: '13px',
                    zIndex: '9999',
                    boxShadow: '0 2px 6px rgba(0,0,0,0.2)'
                }});
                bar.textContent = {message};
                document.body.appendChild(bar);
                setTimeout(() => bar.remove(), {millis});
                return true;
            }})()
            "#,
            message = js(message),
            millis = self.duration.as_millis()
        )
    }
}

#[async_trait]
impl StatusSink for PageToast {
    async fn notify(&self, status: &Status) {
        let script = self.script(&status.to_string());
        if let Err(e) = self.page.eval::<bool>(script).await {
            warn!("Failed to show status toast: {}", e);
        }
    }
}
