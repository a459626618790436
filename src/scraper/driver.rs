use std::fmt;

use tracing::{debug, info, warn};

use crate::app::Result;
use crate::domain::ReviewCollection;
use crate::scraper::config::ExhaustionConfig;
use crate::scraper::extractor::ReviewExtractor;
use crate::scraper::page::ReviewPage;
use crate::status::{Status, StatusSink};

/// How the review list loads more content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A "next page" control swaps the visible reviews
    Paginated,
    /// Scrolling to the bottom appends more reviews
    InfiniteScroll,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Paginated => write!(f, "paginated"),
            Strategy::InfiniteScroll => write!(f, "infinite-scroll"),
        }
    }
}

/// Summary of one exhaustion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustionOutcome {
    pub strategy: Strategy,
    /// Pages scanned, or scrolls that grew the document
    pub steps: u32,
    /// Number of extraction passes
    pub extractions: u32,
    /// Stopped by `max_pages`/`max_scrolls` rather than by the page
    pub bounded: bool,
}

impl fmt::Display for ExhaustionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.strategy {
            Strategy::Paginated => "pages",
            Strategy::InfiniteScroll => "growing scrolls",
        };
        write!(f, "{} strategy, {} {}", self.strategy, self.steps, unit)?;
        if self.bounded {
            write!(f, ", stopped at the configured limit (results may be incomplete)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaginationState {
    Scanning { page: u32 },
    Advancing { page: u32 },
    Done { pages: u32, bounded: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollState {
    /// `grown` counts the scrolls that made the document taller; the first
    /// one that did not ends the loop.
    Measuring { last_height: u64, grown: u32 },
    Done {
        grown: u32,
        bounded: bool,
    },
}

/// Drives a review list to its end and feeds every stable DOM state to
/// the extractor.
pub struct ExhaustionDriver {
    config: ExhaustionConfig,
    extractor: ReviewExtractor,
}

impl ExhaustionDriver {
    pub fn new(config: ExhaustionConfig, extractor: ReviewExtractor) -> Self {
        Self { config, extractor }
    }

    /// Probe once for the pagination container
    pub async fn detect_strategy<P>(&self, page: &P) -> Result<Strategy>
    where
        P: ReviewPage + ?Sized,
    {
        if page.exists(&self.config.pagination_selector).await? {
            Ok(Strategy::Paginated)
        } else {
            Ok(Strategy::InfiniteScroll)
        }
    }

    /// Exhaust the page, merging every extraction into `collection`.
    pub async fn run<P, S>(
        &self,
        page: &P,
        status: &S,
        collection: &mut ReviewCollection,
    ) -> Result<ExhaustionOutcome>
    where
        P: ReviewPage + ?Sized,
        S: StatusSink + ?Sized,
    {
        let strategy = self.detect_strategy(page).await?;
        info!("Using {} strategy", strategy);
        status.notify(&Status::StrategyDetected(strategy)).await;

        let outcome = match strategy {
            Strategy::Paginated => self.paginate(page, collection).await?,
            Strategy::InfiniteScroll => self.scroll(page, collection).await?,
        };

        info!(
            steps = outcome.steps,
            extractions = outcome.extractions,
            bounded = outcome.bounded,
            "Exhausted review list with {} unique reviews",
            collection.len()
        );
        Ok(outcome)
    }

    /// One extraction pass against the current DOM
    pub async fn extract<P>(&self, page: &P, collection: &mut ReviewCollection) -> Result<usize>
    where
        P: ReviewPage + ?Sized,
    {
        let records = page.extract(&self.extractor).await?;
        let found = records.len();
        let added = collection.extend(records);
        debug!("Extracted {} review elements, {} new", found, added);
        Ok(added)
    }

    async fn paginate<P>(
        &self,
        page: &P,
        collection: &mut ReviewCollection,
    ) -> Result<ExhaustionOutcome>
    where
        P: ReviewPage + ?Sized,
    {
        let next = &self.config.next_page_selector;
        let mut extractions = 0;
        let mut state = PaginationState::Scanning { page: 1 };

        loop {
            state = match state {
                PaginationState::Scanning { page: n } => {
                    let added = self.extract(page, collection).await?;
                    extractions += 1;
                    debug!("Page {}: {} new reviews", n, added);

                    if self.next_page_disabled(page).await? {
                        PaginationState::Done {
                            pages: n,
                            bounded: false,
                        }
                    } else if self.config.max_pages.is_some_and(|max| n >= max) {
                        warn!("Stopping at page limit of {}", n);
                        PaginationState::Done {
                            pages: n,
                            bounded: true,
                        }
                    } else {
                        PaginationState::Advancing { page: n }
                    }
                }
                PaginationState::Advancing { page: n } => {
                    if !page.click(next).await? {
                        // Control vanished between the probe and the click
                        PaginationState::Done {
                            pages: n,
                            bounded: false,
                        }
                    } else {
                        tokio::time::sleep(self.config.page_settle()).await;
                        PaginationState::Scanning { page: n + 1 }
                    }
                }
                PaginationState::Done { pages, bounded } => {
                    return Ok(ExhaustionOutcome {
                        strategy: Strategy::Paginated,
                        steps: pages,
                        extractions,
                        bounded,
                    });
                }
            };
        }
    }

    /// The next control is finished when absent, when it carries the
    /// disabled class, or when `aria-disabled="true"`.
    async fn next_page_disabled<P>(&self, page: &P) -> Result<bool>
    where
        P: ReviewPage + ?Sized,
    {
        let next = &self.config.next_page_selector;
        if !page.exists(next).await? {
            return Ok(true);
        }
        if page.has_class(next, &self.config.disabled_class).await? {
            return Ok(true);
        }
        let aria = page.attribute(next, "aria-disabled").await?;
        Ok(aria.as_deref() == Some("true"))
    }

    async fn scroll<P>(
        &self,
        page: &P,
        collection: &mut ReviewCollection,
    ) -> Result<ExhaustionOutcome>
    where
        P: ReviewPage + ?Sized,
    {
        let mut state = ScrollState::Measuring {
            last_height: 0,
            grown: 0,
        };

        let (grown, bounded) = loop {
            state = match state {
                ScrollState::Measuring { grown, .. }
                    if self.config.max_scrolls.is_some_and(|max| grown >= max) =>
                {
                    warn!("Stopping at scroll limit of {}", grown);
                    ScrollState::Done {
                        grown,
                        bounded: true,
                    }
                }
                ScrollState::Measuring { last_height, grown } => {
                    page.scroll_to_bottom().await?;
                    tokio::time::sleep(self.config.scroll_settle()).await;
                    let height = page.scroll_height().await?;
                    debug!("Scroll {}: height {} -> {}", grown + 1, last_height, height);

                    if height == last_height {
                        ScrollState::Done {
                            grown,
                            bounded: false,
                        }
                    } else {
                        ScrollState::Measuring {
                            last_height: height,
                            grown: grown + 1,
                        }
                    }
                }
                ScrollState::Done { grown, bounded } => break (grown, bounded),
            };
        };

        let added = self.extract(page, collection).await?;
        debug!("Final extraction: {} new reviews", added);

        Ok(ExhaustionOutcome {
            strategy: Strategy::InfiniteScroll,
            steps: grown,
            extractions: 1,
            bounded,
        })
    }
}
