use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::library::{LibraryEntry, SourceLink};

#[derive(Debug, Error)]
pub enum LibraryRepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Storage of user lists and linked sources, provided by the host application
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    async fn get_source_link(&self, link_id: &str) -> Result<SourceLink, LibraryRepositoryError>;

    async fn get_library_entry(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<LibraryEntry, LibraryRepositoryError>;

    async fn update_latest_chapter(
        &self,
        link_id: &str,
        latest_chapter: &str,
    ) -> Result<(), LibraryRepositoryError>;
}
