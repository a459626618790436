use async_trait::async_trait;
use url::Url;

use crate::app::Result;
use crate::domain::ReviewRecord;
use crate::scraper::extractor::ReviewExtractor;

/// A live, navigable document the harvest runs against.
///
/// Reads are side-effect free. `click` and `scroll_to_bottom` mutate the
/// host page and cannot be undone.
#[async_trait]
pub trait ReviewPage: Send + Sync {
    /// Current page URL, used to resolve relative image links
    async fn url(&self) -> Result<Option<Url>>;

    /// Whether any element matches `selector`
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Attribute of the first element matching `selector`
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Whether the first element matching `selector` carries `class`
    async fn has_class(&self, selector: &str, class: &str) -> Result<bool>;

    /// Synthetic click on the first element matching `selector`.
    ///
    /// Returns false if nothing matched.
    async fn click(&self, selector: &str) -> Result<bool>;

    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Full scrollable height of the document body
    async fn scroll_height(&self) -> Result<u64>;

    /// Serialized HTML of the current DOM
    async fn content(&self) -> Result<String>;

    /// Every review the extractor finds in the current DOM, in document order.
    ///
    /// The default parses a [`content`](Self::content) snapshot. Live
    /// backends override it to evaluate the extractor inside the page.
    async fn extract(&self, extractor: &ReviewExtractor) -> Result<Vec<ReviewRecord>> {
        let html = self.content().await?;
        let base = self.url().await?;
        Ok(extractor.extract(&html, base.as_ref()))
    }
}
