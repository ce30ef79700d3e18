#[macro_use]
extern crate log;

pub mod mangadex;
pub use mangadex::MangaDex;

use async_trait::async_trait;
use shiori_lib::prelude::{ChapterRecord, Error, SeriesId};

/// A site that publishes a chapter feed for the series it hosts
#[async_trait]
pub trait ChapterSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Extract the series identifier from a user supplied link, `None` when
    /// the link does not point at a series on this source
    fn resolve_series_id(&self, url: &str) -> Option<SeriesId>;

    fn series_url(&self, series_id: &SeriesId) -> String;

    fn chapter_url(&self, chapter_id: &str) -> String;

    /// Fetch the chapter feed of a series, newest chapter first
    async fn fetch_feed(&self, series_id: &SeriesId) -> Result<Vec<ChapterRecord>, Error>;
}
