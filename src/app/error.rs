use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Selector `{selector}` matched nothing")]
    Selection { selector: String },

    #[error("Fragment selected by `{selector}` contains no link")]
    MissingAnchor { selector: String },

    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Response from {url} is not valid UTF-8")]
    Decode { url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} feeds failed to sync")]
    PartialFailure { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, FeedwatchError>;
