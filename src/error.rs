use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("browser step `{step}` failed: {message}")]
    Step { step: &'static str, message: String },

    #[error("playwright bridge exited unexpectedly")]
    Disconnected,

    #[error("playwright bridge replied to request {got} while waiting for {expected}")]
    OutOfSync { expected: u64, got: u64 },

    #[error("playwright bridge i/o failed")]
    Io(#[from] io::Error),

    #[error("malformed playwright bridge message")]
    Protocol(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to read guest report {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid newsletter API base URL")]
    BaseUrl(#[from] url::ParseError),

    #[error("newsletter API base URL cannot carry a path")]
    CannotBeABase,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
