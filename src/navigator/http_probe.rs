use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::Result;
use crate::navigator::{ProbeResult, UrlProbe};

/// Checks guessed URLs with a plain GET
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(user_agent: Option<&str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent.unwrap_or(concat!("revsieve/", env!("CARGO_PKG_VERSION"))))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn probe(&self, url: &Url) -> ProbeResult {
        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    ProbeResult::Found {
                        status: status.as_u16(),
                    }
                } else {
                    ProbeResult::Missing {
                        status: status.as_u16(),
                    }
                }
            }
            Err(e) => ProbeResult::Unreachable(e.to_string()),
        }
    }
}
