use std::fmt;
use std::path::Path;

use tracing::info;

use crate::app::Result;
use crate::domain::{ReviewCollection, ReviewRecord};
use crate::export::write_csv;
use crate::scraper::{
    ExhaustionConfig, ExhaustionDriver, ExhaustionOutcome, FieldMap, ReviewExtractor, ReviewPage,
};
use crate::status::{Status, StatusSink};

/// Which widget markup is being harvested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full review listing, exhausted by pagination or scrolling
    Listing,
    /// Product-page carousel, read once as rendered
    Carousel,
}

impl Mode {
    pub fn field_map(self) -> FieldMap {
        match self {
            Mode::Listing => FieldMap::listing(),
            Mode::Carousel => FieldMap::carousel(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Listing => write!(f, "listing"),
            Mode::Carousel => write!(f, "carousel"),
        }
    }
}

/// Deduplicated records from one run
#[derive(Debug)]
pub struct Harvest {
    pub records: Vec<ReviewRecord>,
    /// Present for listing runs
    pub outcome: Option<ExhaustionOutcome>,
}

impl Harvest {
    /// Rows exported, or `None` when nothing was found
    pub fn written(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(self.records.len())
    }
}

/// Collect every review the page offers in the given mode.
///
/// Reports [`Status::NoDataFound`] when nothing was extracted.
pub async fn harvest<P, S>(
    page: &P,
    mode: Mode,
    config: &ExhaustionConfig,
    status: &S,
) -> Result<Harvest>
where
    P: ReviewPage + ?Sized,
    S: StatusSink + ?Sized,
{
    let extractor = ReviewExtractor::new(&mode.field_map())?;
    let driver = ExhaustionDriver::new(config.clone(), extractor);
    let mut collection = ReviewCollection::new();

    let outcome = match mode {
        Mode::Listing => Some(driver.run(page, status, &mut collection).await?),
        Mode::Carousel => {
            driver.extract(page, &mut collection).await?;
            None
        }
    };

    if collection.is_empty() {
        status.notify(&Status::NoDataFound(mode)).await;
    }

    Ok(Harvest {
        records: collection.into_records(),
        outcome,
    })
}

/// Harvest and write the CSV to `path`.
///
/// No file is produced when nothing was found.
pub async fn harvest_to_file<P, S>(
    page: &P,
    mode: Mode,
    config: &ExhaustionConfig,
    status: &S,
    path: &Path,
) -> Result<Harvest>
where
    P: ReviewPage + ?Sized,
    S: StatusSink + ?Sized,
{
    let harvest = harvest(page, mode, config, status).await?;
    let Some(count) = harvest.written() else {
        info!("No {} reviews found, nothing written", mode);
        return Ok(harvest);
    };

    write_csv(path, &harvest.records)?;
    status.notify(&Status::Completed { mode, count }).await;
    Ok(harvest)
}
