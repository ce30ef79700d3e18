use shiori_lib::prelude::{ChapterList, ChapterRecord, SeriesId};
use thiserror::Error;

use crate::domain::repositories::source::{SourceRepository, SourceRepositoryError};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("source {0} has no chapter feed")]
    UnsupportedSource(String),
    #[error("series identifier not found in url")]
    NotFound,
    #[error("could not fetch chapter feed: {0}")]
    FetchFailed(String),
}

impl From<SourceRepositoryError> for ReconcileError {
    fn from(e: SourceRepositoryError) -> Self {
        match e {
            SourceRepositoryError::NoSource(source) => Self::UnsupportedSource(source),
            SourceRepositoryError::NotFound => Self::NotFound,
            SourceRepositoryError::FetchFailed(reason) => Self::FetchFailed(reason),
        }
    }
}

/// Earliest chapter the user has not read yet.
///
/// `records` is in feed order, newest first. Scans from the oldest record and
/// returns the first one whose number is strictly greater than `progress`.
/// Records without a numeric label are skipped.
pub fn find_next_unread(records: &[ChapterRecord], progress: f64) -> Option<&ChapterRecord> {
    records
        .iter()
        .rev()
        .find(|record| record.number().is_some_and(|number| number > progress))
}

pub struct ReconcileService<R>
where
    R: SourceRepository,
{
    repo: R,
}

impl<R> ReconcileService<R>
where
    R: SourceRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.repo.has_source(source)
    }

    pub fn resolve_series_id(&self, source: &str, url: &str) -> Result<SeriesId, ReconcileError> {
        let series_id = self.repo.resolve_series_id(source, url)?;

        Ok(series_id)
    }

    pub async fn fetch_chapter_list(
        &self,
        source: &str,
        series_id: &SeriesId,
    ) -> Result<ChapterList, ReconcileError> {
        let records = self.repo.fetch_chapters(source, series_id).await?;

        Ok(ChapterList::from_records(&records))
    }

    /// Latest chapter label of a series, `None` when the feed has no usable chapter
    pub async fn get_latest_chapter(
        &self,
        source: &str,
        series_id: &SeriesId,
    ) -> Result<Option<String>, ReconcileError> {
        let chapters = self.fetch_chapter_list(source, series_id).await?;

        Ok(chapters.latest_label())
    }

    /// Url of the next unread chapter, `None` when the user is caught up
    pub async fn find_next_unread_chapter_url(
        &self,
        source: &str,
        series_id: &SeriesId,
        progress: f64,
    ) -> Result<Option<String>, ReconcileError> {
        let records = self.repo.fetch_chapters(source, series_id).await?;

        match find_next_unread(&records, progress) {
            Some(record) => {
                debug!(
                    "next unread chapter of {series_id} after {progress} is {:?} ({})",
                    record.chapter, record.id
                );
                Ok(Some(self.repo.chapter_url(source, &record.id)?))
            }
            None => Ok(None),
        }
    }

    /// Url of the next unread chapter, or the series page when the user is caught up
    pub async fn find_next_unread_url(
        &self,
        source: &str,
        series_id: &SeriesId,
        progress: f64,
    ) -> Result<String, ReconcileError> {
        match self
            .find_next_unread_chapter_url(source, series_id, progress)
            .await?
        {
            Some(url) => Ok(url),
            None => Ok(self.repo.series_url(source, series_id)?),
        }
    }
}
