use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use shiori_lib::prelude::{ChapterRecord, SeriesId};
use shiori_source::{ChapterSource, MangaDex, mangadex};

use crate::{
    domain::repositories::source::{SourceRepository, SourceRepositoryError},
    infrastructure::config::{Config, MangaDexConfig},
};

pub struct SourceRepositoryImpl {
    sources: HashMap<&'static str, Box<dyn ChapterSource>>,
}

impl SourceRepositoryImpl {
    pub fn new(mangadex: Option<MangaDex>) -> Self {
        let mut sources = HashMap::new();
        if let Some(mangadex) = mangadex {
            sources.insert(mangadex::NAME, Box::new(mangadex) as Box<dyn ChapterSource>);
        }

        Self { sources }
    }

    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let mangadex = build_mangadex(&config.mangadex)?;

        Ok(Self::new(Some(mangadex)))
    }

    pub fn insert(&mut self, source: Box<dyn ChapterSource>) {
        self.sources.insert(source.name(), source);
    }

    fn get(&self, source: &str) -> Result<&dyn ChapterSource, SourceRepositoryError> {
        self.sources
            .get(source)
            .map(|source| &**source)
            .ok_or_else(|| SourceRepositoryError::NoSource(source.to_string()))
    }
}

fn build_mangadex(cfg: &MangaDexConfig) -> Result<MangaDex, anyhow::Error> {
    let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
    if let Some(timeout) = cfg.request_timeout {
        builder = builder.timeout(Duration::from_secs(timeout));
    }

    let mangadex = MangaDex::new(&cfg.api_url, &cfg.site_url)?
        .with_client(builder.build()?)
        .with_language(cfg.language.clone())
        .with_feed_limit(cfg.feed_limit);

    Ok(mangadex)
}

#[async_trait]
impl SourceRepository for SourceRepositoryImpl {
    fn has_source(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }

    fn resolve_series_id(
        &self,
        source: &str,
        url: &str,
    ) -> Result<SeriesId, SourceRepositoryError> {
        self.get(source)?.resolve_series_id(url).ok_or_else(|| {
            warn!("no {source} series in {url:?}");
            SourceRepositoryError::NotFound
        })
    }

    fn series_url(
        &self,
        source: &str,
        series_id: &SeriesId,
    ) -> Result<String, SourceRepositoryError> {
        Ok(self.get(source)?.series_url(series_id))
    }

    fn chapter_url(&self, source: &str, chapter_id: &str) -> Result<String, SourceRepositoryError> {
        Ok(self.get(source)?.chapter_url(chapter_id))
    }

    async fn fetch_chapters(
        &self,
        source: &str,
        series_id: &SeriesId,
    ) -> Result<Vec<ChapterRecord>, SourceRepositoryError> {
        let records = self.get(source)?.fetch_feed(series_id).await?;

        Ok(records)
    }
}
