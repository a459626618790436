use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevsieveError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RevsieveError>;
