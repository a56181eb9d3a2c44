use std::io;

/// Feed related errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(String),

    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("generic error: {0}")]
    Generic(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

/// Why a media element refused to start playing.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PlayError {
    /// Autoplay policy rejected playback, usually because audio was
    /// unmuted without a prior user gesture.
    #[error("playback not allowed")]
    NotAllowed,

    /// The play request was interrupted by a pause before it started.
    #[error("playback aborted")]
    Aborted,

    #[error("playback failed: {0}")]
    Other(String),
}
