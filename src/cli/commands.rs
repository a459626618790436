use std::path::{Path, PathBuf};

use tracing::warn;
use url::Url;

use crate::app::{AppContext, Result, RevsieveError};
use crate::harvest::{harvest_to_file, Mode};
use crate::navigator::{check_guesses, guess_review_urls, ProbeResult};
use crate::status::{LogSink, Status, StatusSink};

fn default_output(ctx: &AppContext, mode: Mode) -> PathBuf {
    match mode {
        Mode::Listing => ctx.config.output.listing_file.clone(),
        Mode::Carousel => ctx.config.output.carousel_file.clone(),
    }
}

/// Open `url` in Chrome, harvest it in `mode` and write the CSV.
///
/// Returns the number of reviews written; `None` means nothing was found.
pub async fn scrape(
    ctx: &AppContext,
    mode: Mode,
    url: &str,
    output: Option<&Path>,
) -> Result<Option<usize>> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(ctx, mode));

    let browser = ctx.launch_browser().await?;

    let result = async {
        let page = browser.open(url).await?;
        let status = ctx.status_sink(&page);
        let harvest =
            harvest_to_file(&page, mode, &ctx.config.exhaustion, &status, &path).await?;

        // Leave the final toast on screen long enough to read
        if !ctx.config.browser.headless && ctx.config.status.page_toast {
            tokio::time::sleep(ctx.config.status.toast_duration()).await;
        }
        Ok::<_, RevsieveError>(harvest)
    }
    .await;

    if let Err(e) = browser.close().await {
        warn!("Failed to close browser: {}", e);
    }

    let harvest = result?;
    if let Some(outcome) = &harvest.outcome {
        println!("{}", outcome);
    }
    if let Some(count) = harvest.written() {
        println!("Saved {} reviews to {}", count, path.display());
    }
    Ok(harvest.written())
}

/// Print likely review-page URLs, optionally checking and opening them
pub async fn guess(ctx: &AppContext, url: &str, open: bool, check: bool) -> Result<()> {
    let guesses = guess_review_urls(url)?;

    let targets: Vec<Url> = if check {
        let probe = ctx.probe()?;
        let results = check_guesses(&probe, &guesses).await;
        for (guess, result) in &results {
            match result {
                ProbeResult::Found { status } => println!("  ✓ {} ({})", guess, status),
                ProbeResult::Missing { status } => println!("  ✗ {} ({})", guess, status),
                ProbeResult::Unreachable(e) => println!("  ! {} ({})", guess, e),
            }
        }
        results
            .into_iter()
            .filter(|(_, r)| r.is_found())
            .map(|(u, _)| u)
            .collect()
    } else {
        for guess in &guesses {
            println!("  {}", guess);
        }
        guesses
    };

    if open {
        let mut opened = 0;
        for target in &targets {
            match open::that(target.as_str()) {
                Ok(()) => opened += 1,
                Err(e) => warn!("Failed to open {}: {}", target, e),
            }
        }
        LogSink::stdout().notify(&Status::GuessesOpened(opened)).await;
    }

    Ok(())
}
