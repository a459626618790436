//! In-memory [`ReviewPage`] for driver and harvest tests.

use std::sync::Mutex;

use async_trait::async_trait;
use ::scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::Result;
use crate::scraper::page::ReviewPage;

#[derive(Default)]
struct Inner {
    snapshots: Vec<String>,
    current: usize,
    heights: Vec<u64>,
    height_reads: usize,
    clicks: usize,
    events: Vec<&'static str>,
}

/// Replays a fixed sequence of DOM snapshots and document heights.
///
/// Clicking a matching element advances to the next snapshot; queries are
/// answered by parsing the current one.
pub(crate) struct ScriptedPage {
    url: Url,
    inner: Mutex<Inner>,
}

impl ScriptedPage {
    pub(crate) fn paged(snapshots: Vec<String>) -> Self {
        Self::with(Inner {
            snapshots,
            ..Default::default()
        })
    }

    pub(crate) fn scrolling(html: String, heights: Vec<u64>) -> Self {
        Self::with(Inner {
            snapshots: vec![html],
            heights,
            ..Default::default()
        })
    }

    fn with(inner: Inner) -> Self {
        Self {
            url: Url::parse("https://shop.example.com/pages/reviews").unwrap(),
            inner: Mutex::new(inner),
        }
    }

    pub(crate) fn clicks(&self) -> usize {
        self.inner.lock().unwrap().clicks
    }

    pub(crate) fn scrolls(&self) -> usize {
        self.events().iter().filter(|e| **e == "scroll").count()
    }

    pub(crate) fn content_reads(&self) -> usize {
        self.events().iter().filter(|e| **e == "content").count()
    }

    pub(crate) fn events(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().events.clone()
    }

    fn first_match<T>(&self, selector: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let inner = self.inner.lock().unwrap();
        let html = inner.snapshots.get(inner.current)?;
        let document = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        let found = document.select(&selector).next().map(f);
        found
    }
}

#[async_trait]
impl ReviewPage for ScriptedPage {
    async fn url(&self) -> Result<Option<Url>> {
        Ok(Some(self.url.clone()))
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.first_match(selector, |_| ()).is_some())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .first_match(selector, |el| el.value().attr(name).map(String::from))
            .flatten())
    }

    async fn has_class(&self, selector: &str, class: &str) -> Result<bool> {
        Ok(self
            .first_match(selector, |el| el.value().classes().any(|c| c == class))
            .unwrap_or(false))
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        if self.first_match(selector, |_| ()).is_none() {
            return Ok(false);
        }
        let mut inner = self.inner.lock().unwrap();
        inner.clicks += 1;
        inner.events.push("click");
        if inner.current + 1 < inner.snapshots.len() {
            inner.current += 1;
        }
        Ok(true)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.inner.lock().unwrap().events.push("scroll");
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.push("height");
        let idx = inner.height_reads.min(inner.heights.len().saturating_sub(1));
        inner.height_reads += 1;
        Ok(inner.heights.get(idx).copied().unwrap_or(0))
    }

    async fn content(&self) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.push("content");
        Ok(inner.snapshots[inner.current].clone())
    }
}

/// Listing markup for one review whose title is `Review <id>`
pub(crate) fn review_html(id: &str) -> String {
    format!(
        r#"<div class="jdgm-rev" data-review-id="{id}">
             <span class="jdgm-rev__rating" data-score="4"></span>
             <span class="jdgm-rev__author">Reviewer {id}</span>
             <b class="jdgm-rev__title">Review {id}</b>
             <div class="jdgm-rev__body">Body of {id}</div>
           </div>"#
    )
}
