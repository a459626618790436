use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use revsieve::app::AppContext;
use revsieve::cli::{commands, Cli, Commands};
use revsieve::harvest::Mode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut ctx = AppContext::new(cli.config.as_deref())?;
    if cli.headed {
        ctx.config.browser.headless = false;
    }

    match cli.command {
        Commands::Listing {
            url,
            output,
            max_pages,
            max_scrolls,
        } => {
            if max_pages.is_some() {
                ctx.config.exhaustion.max_pages = max_pages;
            }
            if max_scrolls.is_some() {
                ctx.config.exhaustion.max_scrolls = max_scrolls;
            }
            commands::scrape(&ctx, Mode::Listing, &url, output.as_deref()).await?;
        }
        Commands::Carousel { url, output } => {
            commands::scrape(&ctx, Mode::Carousel, &url, output.as_deref()).await?;
        }
        Commands::Guess { url, open, check } => {
            commands::guess(&ctx, &url, open, check).await?;
        }
    }

    Ok(())
}
