//! # revsieve
//!
//! Exports customer reviews from an embedded Judge.me review widget to CSV.
//!
//! ## Architecture
//!
//! A headless Chrome tab is driven to the end of the review list, and each
//! settled DOM state is mapped to records and deduplicated:
//!
//! ```text
//! ChromePage → ExhaustionDriver → ReviewExtractor → ReviewCollection → CSV
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Full listing, paginated or infinite scroll
//! revsieve listing https://shop.example.com/pages/reviews
//!
//! # Carousel on a product page
//! revsieve carousel https://shop.example.com/products/socks
//!
//! # Find the review page
//! revsieve guess https://shop.example.com --check --open
//! ```

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
///
/// - `listing <url>` - Exhaust and export a full review listing
/// - `carousel <url>` - Export a carousel widget
/// - `guess <url>` - Guess the shop's review page
pub mod cli;

/// Configuration loaded from `~/.config/revsieve/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`ReviewRecord`](domain::ReviewRecord): one review, all fields as text
/// - [`ReviewCollection`](domain::ReviewCollection): first-seen-wins accumulator
pub mod domain;

/// CSV serialization of harvested reviews.
pub mod export;

/// One harvest run: exhaustion, extraction, export and status.
pub mod harvest;

/// Review-page URL guessing.
pub mod navigator;

/// Browser-driven exhaustion and extraction.
///
/// - [`ChromeBrowser`](scraper::ChromeBrowser): chromiumoxide launcher
/// - [`ReviewPage`](scraper::ReviewPage): async trait over a live page
/// - [`ExhaustionDriver`](scraper::ExhaustionDriver): pagination / infinite scroll
/// - [`ReviewExtractor`](scraper::ReviewExtractor): field-map driven extraction
pub mod scraper;

/// Progress and outcome notifications.
pub mod status;
