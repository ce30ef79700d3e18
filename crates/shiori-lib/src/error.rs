use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("series identifier not found in url")]
    NotFound,
    #[error("failed to fetch chapter feed: {0}")]
    FetchFailed(String),
}
