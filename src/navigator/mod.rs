//! Best-effort discovery of a shop's "all reviews" page.
//!
//! The widget usually lives on one of a few well-known paths under the
//! shop's origin; we guess those and optionally check which ones answer.

mod http_probe;

pub use http_probe::HttpProbe;

use async_trait::async_trait;
use url::Url;

use crate::app::{Result, RevsieveError};

/// Paths tried, in order, relative to the site origin
pub const REVIEW_PATHS: [&str; 3] = ["/pages/reviews", "/pages/all-reviews", "/apps/judgeme"];

/// Candidate review-page URLs for the site hosting `page_url`
pub fn guess_review_urls(page_url: &str) -> Result<Vec<Url>> {
    let url = Url::parse(page_url)?;
    if !url.has_host() {
        return Err(RevsieveError::Other(format!(
            "{} has no host to guess review pages for",
            page_url
        )));
    }

    let origin = url.origin().ascii_serialization();
    REVIEW_PATHS
        .iter()
        .map(|path| Url::parse(&format!("{}{}", origin, path)).map_err(RevsieveError::from))
        .collect()
}

/// Result of checking one guessed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Found { status: u16 },
    Missing { status: u16 },
    Unreachable(String),
}

impl ProbeResult {
    pub fn is_found(&self) -> bool {
        matches!(self, ProbeResult::Found { .. })
    }
}

#[async_trait]
pub trait UrlProbe {
    async fn probe(&self, url: &Url) -> ProbeResult;
}

/// Probe every guess in order
pub async fn check_guesses<P>(probe: &P, guesses: &[Url]) -> Vec<(Url, ProbeResult)>
where
    P: UrlProbe + Sync + ?Sized,
{
    let mut results = Vec::with_capacity(guesses.len());
    for url in guesses {
        let result = probe.probe(url).await;
        tracing::debug!("Probed {}: {:?}", url, result);
        results.push((url.clone(), result));
    }
    results
}
