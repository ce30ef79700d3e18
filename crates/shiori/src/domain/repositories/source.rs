use async_trait::async_trait;
use shiori_lib::prelude::{ChapterRecord, SeriesId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceRepositoryError {
    #[error("source {0} not available")]
    NoSource(String),
    #[error("series identifier not found in url")]
    NotFound,
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

impl From<shiori_lib::error::Error> for SourceRepositoryError {
    fn from(e: shiori_lib::error::Error) -> Self {
        match e {
            shiori_lib::error::Error::NotFound => Self::NotFound,
            shiori_lib::error::Error::FetchFailed(reason) => Self::FetchFailed(reason),
        }
    }
}

#[async_trait]
pub trait SourceRepository: Send + Sync {
    fn has_source(&self, source: &str) -> bool;

    fn resolve_series_id(
        &self,
        source: &str,
        url: &str,
    ) -> Result<SeriesId, SourceRepositoryError>;

    fn series_url(
        &self,
        source: &str,
        series_id: &SeriesId,
    ) -> Result<String, SourceRepositoryError>;

    fn chapter_url(&self, source: &str, chapter_id: &str) -> Result<String, SourceRepositoryError>;

    async fn fetch_chapters(
        &self,
        source: &str,
        series_id: &SeriesId,
    ) -> Result<Vec<ChapterRecord>, SourceRepositoryError>;
}
