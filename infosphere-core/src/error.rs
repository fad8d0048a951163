use std::{error, fmt, io, sync::Arc};

/// Failure of a single catalog read.  Stores never retry, the caller decides
/// what to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    NetworkUnavailable,
    PermissionDenied,
    NotFound,
    Unknown(String),
}

impl error::Error for FetchError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnavailable => write!(f, "Network unavailable"),
            Self::PermissionDenied => write!(f, "Permission denied"),
            Self::NotFound => write!(f, "Collection not found"),
            Self::Unknown(msg) => write!(f, "Unknown failure: {msg}"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Fetch(FetchError),
    Busy,
    NotInitialized,
    AlreadyInitialized,
    DepthExceeded,
    NothingToRetry,
    UnknownNode(Arc<str>),
    NoVideo(Arc<str>),
    InvalidPath(String),
    InvalidFixture(String),
    InvalidConfig(String),
    WorkerDisconnected,
    JsonError(Box<dyn error::Error + Send>),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => err.fmt(f),
            Self::Busy => write!(f, "Still loading"),
            Self::NotInitialized => write!(f, "Navigator has not loaded its first list"),
            Self::AlreadyInitialized => write!(f, "Navigator is already initialized"),
            Self::DepthExceeded => write!(f, "Already at the deepest level"),
            Self::NothingToRetry => write!(f, "No failed fetch to retry"),
            Self::UnknownNode(id) => write!(f, "No entry with id {id:?} in this list"),
            Self::NoVideo(id) => write!(f, "Entry {id:?} has no video"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::InvalidFixture(msg) => write!(f, "Invalid fixture: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid config: {msg}"),
            Self::WorkerDisconnected => write!(f, "Fetch worker disconnected"),
            Self::JsonError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Error {
        Error::Fetch(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}
