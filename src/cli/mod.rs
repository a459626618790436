pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "revsieve")]
#[command(about = "Export Judge.me widget reviews from a shop page to CSV", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/revsieve/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, global = true)]
    pub headed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a full review listing, following pagination or infinite scroll
    Listing {
        /// Page carrying the review listing
        url: String,

        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Stop after this many scrolls
        #[arg(long)]
        max_scrolls: Option<u32>,
    },
    /// Scrape the reviews shown in a product-page carousel
    Carousel {
        /// Page carrying the carousel widget
        url: String,

        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Guess where the shop's review page lives
    Guess {
        /// Any page on the shop
        url: String,

        /// Open each guess in the system browser
        #[arg(long)]
        open: bool,

        /// Check which guesses respond
        #[arg(long)]
        check: bool,
    },
}
