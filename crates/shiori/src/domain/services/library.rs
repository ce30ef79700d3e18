use shiori_lib::NO_CHAPTER;
use thiserror::Error;

use crate::domain::{
    entities::library::SourceLink,
    repositories::{
        library::{LibraryRepository, LibraryRepositoryError},
        source::SourceRepository,
    },
    services::reconcile::{ReconcileError, ReconcileService},
};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("source link not found")]
    SourceNotFound,
    #[error("library entry not found")]
    EntryNotFound,
    #[error("source {0} has no chapter feed")]
    UnsupportedSource(String),
    #[error("no chapter feed source linked")]
    NoLinkedSource,
    #[error("invalid {0} url")]
    InvalidUrl(String),
    #[error("could not fetch chapters from {source_name}: {reason}")]
    FetchFailed { source_name: String, reason: String },
    #[error("repository error: {0}")]
    RepositoryError(#[from] LibraryRepositoryError),
}

impl LibraryError {
    fn from_reconcile(source: &str, e: ReconcileError) -> Self {
        match e {
            ReconcileError::UnsupportedSource(source) => Self::UnsupportedSource(source),
            ReconcileError::NotFound => Self::InvalidUrl(source.to_string()),
            ReconcileError::FetchFailed(reason) => Self::FetchFailed {
                source_name: source.to_string(),
                reason,
            },
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            LibraryError::SourceNotFound => "Source not found.".to_string(),
            LibraryError::EntryNotFound => "Manga entry not found.".to_string(),
            LibraryError::UnsupportedSource(source) => {
                format!("Source {source} does not provide a chapter feed.")
            }
            LibraryError::NoLinkedSource => "No chapter feed source linked.".to_string(),
            LibraryError::InvalidUrl(source) => format!("Invalid {source} URL format."),
            LibraryError::FetchFailed { source_name, .. } => {
                format!("Could not fetch chapters from {source_name}.")
            }
            LibraryError::RepositoryError(_) => "An error occurred.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub link_id: String,
    pub latest_chapter: String,
}

impl RefreshOutcome {
    pub fn message(&self) -> String {
        format!("Found latest chapter: {}", self.latest_chapter)
    }
}

pub struct LibraryService<L, R>
where
    L: LibraryRepository,
    R: SourceRepository,
{
    repo: L,
    reconcile: ReconcileService<R>,
}

impl<L, R> LibraryService<L, R>
where
    L: LibraryRepository,
    R: SourceRepository,
{
    pub fn new(repo: L, reconcile: ReconcileService<R>) -> Self {
        Self { repo, reconcile }
    }

    async fn get_source_link(&self, link_id: &str) -> Result<SourceLink, LibraryError> {
        self.repo
            .get_source_link(link_id)
            .await
            .map_err(|e| match e {
                LibraryRepositoryError::NotFound => LibraryError::SourceNotFound,
                e => e.into(),
            })
    }

    /// Fetch the feed of a linked source and store its latest chapter on the link.
    ///
    /// Nothing is stored when the feed can't be fetched.
    pub async fn refresh_source(&self, link_id: &str) -> Result<RefreshOutcome, LibraryError> {
        let link = self.get_source_link(link_id).await?;
        let source = link.source_name.as_str();
        if !self.reconcile.has_source(source) {
            return Err(LibraryError::UnsupportedSource(link.source_name.clone()));
        }

        let series_id = self
            .reconcile
            .resolve_series_id(source, &link.url)
            .map_err(|e| LibraryError::from_reconcile(source, e))?;

        let latest_chapter = self
            .reconcile
            .get_latest_chapter(source, &series_id)
            .await
            .map_err(|e| {
                error!("{source} refresh of {link_id} failed: {e}");
                LibraryError::from_reconcile(source, e)
            })?
            .unwrap_or_else(|| NO_CHAPTER.to_string());

        self.repo
            .update_latest_chapter(link_id, &latest_chapter)
            .await?;

        info!("link {link_id} latest chapter is {latest_chapter}");

        Ok(RefreshOutcome {
            link_id: link.id,
            latest_chapter,
        })
    }

    /// Url to continue reading an entry from its first linked chapter feed
    /// source. Falls back to the linked url when the user is caught up.
    pub async fn next_chapter_url(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<String, LibraryError> {
        let entry = self
            .repo
            .get_library_entry(user_id, entry_id)
            .await
            .map_err(|e| match e {
                LibraryRepositoryError::NotFound => LibraryError::EntryNotFound,
                e => e.into(),
            })?;

        let link = entry
            .sources
            .iter()
            .find(|link| self.reconcile.has_source(&link.source_name))
            .ok_or(LibraryError::NoLinkedSource)?;
        let source = link.source_name.as_str();

        let series_id = self
            .reconcile
            .resolve_series_id(source, &link.url)
            .map_err(|e| LibraryError::from_reconcile(source, e))?;

        let chapter_url = self
            .reconcile
            .find_next_unread_chapter_url(source, &series_id, entry.progress)
            .await
            .map_err(|e| {
                error!("failed to find next chapter of {entry_id}: {e}");
                LibraryError::from_reconcile(source, e)
            })?;

        Ok(chapter_url.unwrap_or_else(|| link.url.clone()))
    }

    /// Chapter labels of a linked source, newest first. Failures are logged
    /// and give an empty list.
    pub async fn chapters_for_source(&self, link_id: &str) -> Vec<String> {
        let link = match self.get_source_link(link_id).await {
            Ok(link) => link,
            Err(e) => {
                error!("failed to fetch chapters of {link_id}: {e}");
                return vec![];
            }
        };

        let source = link.source_name.as_str();
        let chapters = match self.reconcile.resolve_series_id(source, &link.url) {
            Ok(series_id) => self.reconcile.fetch_chapter_list(source, &series_id).await,
            Err(e) => Err(e),
        };

        match chapters {
            Ok(chapters) => chapters.labels(),
            Err(e) => {
                error!("failed to fetch chapters of {link_id}: {e}");
                vec![]
            }
        }
    }
}
