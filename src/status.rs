use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::harvest::Mode;
use crate::scraper::Strategy;

/// Progress and outcome messages shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    StrategyDetected(Strategy),
    Completed { mode: Mode, count: usize },
    NoDataFound(Mode),
    GuessesOpened(usize),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::StrategyDetected(Strategy::Paginated) => {
                write!(f, "Detected pagination. Scraping all review pages...")
            }
            Status::StrategyDetected(Strategy::InfiniteScroll) => {
                write!(f, "No pagination detected. Scrolling to load all reviews...")
            }
            Status::Completed {
                mode: Mode::Listing,
                count,
            } => write!(f, "✅ Downloaded {} reviews.", count),
            Status::Completed {
                mode: Mode::Carousel,
                count,
            } => write!(f, "✅ Downloaded {} carousel reviews.", count),
            Status::NoDataFound(Mode::Listing) => write!(
                f,
                "❌ No reviews found. Try navigating to a valid review page."
            ),
            Status::NoDataFound(Mode::Carousel) => {
                write!(f, "❌ No carousel reviews found on this page.")
            }
            Status::GuessesOpened(n) => write!(f, "Opened {} possible review pages.", n),
        }
    }
}

/// Fire-and-forget notification surface.
///
/// Implementations swallow their own failures; a status message never
/// aborts a harvest.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn notify(&self, status: &Status);
}

/// Writes one line per status to a terminal stream.
///
/// The tracing event is only emitted at debug level so that an `info`
/// filter does not print each status twice.
pub struct LogSink<W = io::Stdout> {
    out: Mutex<W>,
}

impl LogSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LogSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> StatusSink for LogSink<W> {
    async fn notify(&self, status: &Status) {
        debug!(status = ?status, "{}", status);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{}", status) {
            warn!("Failed to write status: {}", e);
        }
    }
}

/// Forwards each status to every inner sink, in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn StatusSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl StatusSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

#[async_trait]
impl StatusSink for FanoutSink {
    async fn notify(&self, status: &Status) {
        for sink in &self.sinks {
            sink.notify(status).await;
        }
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingSink;

#[cfg(test)]
mod recording {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Keeps every status it receives
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        seen: Arc<Mutex<Vec<Status>>>,
    }

    impl RecordingSink {
        pub(crate) fn statuses(&self) -> Vec<Status> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StatusSink for RecordingSink {
        async fn notify(&self, status: &Status) {
            self.seen.lock().unwrap().push(status.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(
            Status::StrategyDetected(Strategy::Paginated).to_string(),
            "Detected pagination. Scraping all review pages..."
        );
        assert_eq!(
            Status::StrategyDetected(Strategy::InfiniteScroll).to_string(),
            "No pagination detected. Scrolling to load all reviews..."
        );
        assert_eq!(
            Status::Completed {
                mode: Mode::Listing,
                count: 15
            }
            .to_string(),
            "✅ Downloaded 15 reviews."
        );
        assert_eq!(
            Status::Completed {
                mode: Mode::Carousel,
                count: 3
            }
            .to_string(),
            "✅ Downloaded 3 carousel reviews."
        );
        assert_eq!(
            Status::NoDataFound(Mode::Carousel).to_string(),
            "❌ No carousel reviews found on this page."
        );
    }

    #[tokio::test]
    async fn test_log_sink_writes_each_status_once() {
        let sink = LogSink::new(Vec::new());
        sink.notify(&Status::StrategyDetected(Strategy::Paginated)).await;
        sink.notify(&Status::GuessesOpened(2)).await;

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            written,
            "Detected pagination. Scraping all review pages...\nOpened 2 possible review pages.\n"
        );
    }

    #[tokio::test]
    async fn test_fanout_reaches_every_sink() {
        let a = RecordingSink::default();
        let b = RecordingSink::default();
        let fanout = FanoutSink::new().with(a.clone()).with(b.clone());

        fanout.notify(&Status::GuessesOpened(3)).await;
        fanout.notify(&Status::NoDataFound(Mode::Listing)).await;

        assert_eq!(a.statuses().len(), 2);
        assert_eq!(a.statuses(), b.statuses());
    }
}
