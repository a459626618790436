//! Browser-side review harvesting.
//!
//! The review list is driven to its end by the [`ExhaustionDriver`], which
//! hands each settled DOM snapshot to the [`ReviewExtractor`].
//!
//! # Architecture
//!
//! ```text
//! ReviewPage → ExhaustionDriver → ReviewExtractor(FieldMap) → ReviewCollection
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use revsieve::scraper::{ChromeBrowser, ExhaustionDriver, FieldMap, ReviewExtractor};
//!
//! let browser = ChromeBrowser::launch(settings).await?;
//! let page = browser.open("https://shop.example.com/pages/reviews").await?;
//!
//! let extractor = ReviewExtractor::new(&FieldMap::listing())?;
//! let driver = ExhaustionDriver::new(config, extractor);
//! let mut collection = ReviewCollection::new();
//! driver.run(&page, &LogSink::stdout(), &mut collection).await?;
//! ```

mod chrome;
mod config;
mod driver;
mod extractor;
mod fieldmap;
mod page;

#[cfg(test)]
pub(crate) mod scripted;

pub use chrome::{ChromeBrowser, ChromePage, PageToast};
pub use config::{BrowserSettings, ExhaustionConfig};
pub use driver::{ExhaustionDriver, ExhaustionOutcome, Strategy};
pub use extractor::ReviewExtractor;
pub use fieldmap::{FieldMap, FieldRule, FieldSpec, Transform};
pub use page::ReviewPage;

pub(crate) use extractor::collapse_newlines;
