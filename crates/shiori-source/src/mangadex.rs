use anyhow::anyhow;
use async_trait::async_trait;
use fancy_regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use shiori_lib::prelude::{ChapterRecord, Error, SeriesId};

use crate::ChapterSource;

pub const NAME: &str = "MangaDex";

pub const API_URL: &str = "https://api.mangadex.org";
pub const SITE_URL: &str = "https://mangadex.org";

/// Largest page the feed endpoint serves
pub const MAX_FEED_LIMIT: u32 = 500;

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    data: Option<Vec<FeedEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedEntry {
    Chapter(ChapterData),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct ChapterData {
    id: String,
    #[serde(default)]
    attributes: Option<ChapterAttributes>,
}

#[derive(Debug, Deserialize)]
struct ChapterAttributes {
    #[serde(default)]
    chapter: Option<Label>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Label {
    Text(String),
    Other(serde_json::Value),
}

impl From<ChapterData> for ChapterRecord {
    fn from(data: ChapterData) -> Self {
        let chapter = match data.attributes.and_then(|attributes| attributes.chapter) {
            Some(Label::Text(label)) => Some(label),
            Some(Label::Other(value)) => {
                debug!("chapter {} has non-text label {value}", data.id);
                None
            }
            None => None,
        };

        ChapterRecord {
            id: data.id,
            chapter,
        }
    }
}

impl FeedResponse {
    fn into_records(self) -> Vec<ChapterRecord> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match entry {
                FeedEntry::Chapter(data) => Some(data.into()),
                FeedEntry::Other(value) => {
                    warn!("skip malformed feed entry: {value}");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MangaDex {
    client: reqwest::Client,
    api_url: String,
    site_url: String,
    language: String,
    feed_limit: u32,
    title_pattern: Regex,
}

impl MangaDex {
    pub fn new(api_url: &str, site_url: &str) -> Result<Self, anyhow::Error> {
        let site = Url::parse(site_url)?;
        let host = site
            .host_str()
            .ok_or_else(|| anyhow!("site url {site_url} has no host"))?;
        let host = match site.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let title_pattern = Regex::new(&format!(
            r"{}/title/([a-f0-9-]+)",
            fancy_regex::escape(&host)
        ))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            language: "en".to_string(),
            feed_limit: MAX_FEED_LIMIT,
            title_pattern,
        })
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_feed_limit(mut self, feed_limit: u32) -> Self {
        self.feed_limit = feed_limit.clamp(1, MAX_FEED_LIMIT);
        self
    }

    async fn get_feed(&self, series_id: &SeriesId) -> Result<FeedResponse, Error> {
        let url = format!("{}/manga/{}/feed", self.api_url, series_id);
        debug!("fetch chapter feed {url}");

        let res = self
            .client
            .get(&url)
            .query(&[
                ("order[chapter]", "desc".to_string()),
                ("translatedLanguage[]", self.language.clone()),
                ("limit", format!("{}", self.feed_limit)),
            ])
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("{e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::FetchFailed(format!("{url} returned {status}")));
        }

        res.json()
            .await
            .map_err(|e| Error::FetchFailed(format!("malformed feed from {url}: {e}")))
    }
}

#[async_trait]
impl ChapterSource for MangaDex {
    fn name(&self) -> &'static str {
        NAME
    }

    fn resolve_series_id(&self, url: &str) -> Option<SeriesId> {
        let captures = self.title_pattern.captures(url).ok().flatten()?;
        captures.get(1).map(|id| SeriesId::new(id.as_str()))
    }

    fn series_url(&self, series_id: &SeriesId) -> String {
        format!("{}/title/{series_id}", self.site_url)
    }

    fn chapter_url(&self, chapter_id: &str) -> String {
        format!("{}/chapter/{chapter_id}", self.site_url)
    }

    async fn fetch_feed(&self, series_id: &SeriesId) -> Result<Vec<ChapterRecord>, Error> {
        let records = self.get_feed(series_id).await?.into_records();
        debug!("feed of {series_id} has {} records", records.len());

        Ok(records)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
    };
    use serde_json::json;

    use super::*;

    async fn serve(router: Router) -> String {
        let _ = env_logger::builder().is_test(true).try_init();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn mangadex(api_url: &str) -> MangaDex {
        MangaDex::new(api_url, SITE_URL).unwrap()
    }

    #[test]
    fn test_resolve_series_id() {
        let source = mangadex(API_URL);

        let id = source.resolve_series_id(
            "https://mangadex.org/title/a96676e5-8ae2-425e-b549-7f15dd34a6d8/komi-san",
        );
        assert_eq!(
            id,
            Some(SeriesId::new("a96676e5-8ae2-425e-b549-7f15dd34a6d8"))
        );

        let id = source.resolve_series_id("mangadex.org/title/abc-123");
        assert_eq!(id, Some(SeriesId::new("abc-123")));
    }

    #[test]
    fn test_resolve_series_id_custom_domain() {
        let source = MangaDex::new(API_URL, "https://provider.example").unwrap();

        assert_eq!(
            source.resolve_series_id("https://provider.example/title/abc-123"),
            Some(SeriesId::new("abc-123"))
        );
        assert_eq!(
            source.resolve_series_id("https://mangadex.org/title/abc-123"),
            None
        );
    }

    #[test]
    fn test_resolve_series_id_not_found() {
        let source = mangadex(API_URL);

        assert_eq!(source.resolve_series_id(""), None);
        assert_eq!(source.resolve_series_id("not-a-url"), None);
        assert_eq!(
            source.resolve_series_id("https://mangadex.org/chapter/abc-123"),
            None
        );
        assert_eq!(source.resolve_series_id("https://mangadex.org/title/"), None);
        assert_eq!(
            source.resolve_series_id("https://mangadexXorg/title/abc-123"),
            None
        );
    }

    #[test]
    fn test_urls() {
        let source = MangaDex::new(API_URL, "https://mangadex.org/").unwrap();
        let id = SeriesId::new("abc-123");

        assert_eq!(source.series_url(&id), "https://mangadex.org/title/abc-123");
        assert_eq!(
            source.chapter_url("f00d"),
            "https://mangadex.org/chapter/f00d"
        );
    }

    #[tokio::test]
    async fn test_fetch_feed() {
        async fn feed(
            Path(id): Path<String>,
            Query(query): Query<HashMap<String, String>>,
        ) -> impl IntoResponse {
            assert_eq!(id, "abc-123");
            assert_eq!(query.get("order[chapter]").map(String::as_str), Some("desc"));
            assert_eq!(
                query.get("translatedLanguage[]").map(String::as_str),
                Some("en")
            );
            assert_eq!(query.get("limit").map(String::as_str), Some("500"));

            Json(json!({
                "result": "ok",
                "data": [
                    { "id": "c3", "attributes": { "chapter": "3", "title": "Three" } },
                    { "id": "c2", "attributes": { "chapter": null } },
                    { "id": "c1", "attributes": { "chapter": 1 } },
                    { "id": "c0" },
                    { "attributes": { "chapter": "0" } },
                    "garbage"
                ]
            }))
        }

        let url = serve(Router::new().route("/manga/{id}/feed", get(feed))).await;
        let records = mangadex(&url)
            .fetch_feed(&SeriesId::new("abc-123"))
            .await
            .unwrap();

        assert_eq!(
            records,
            vec![
                ChapterRecord::new("c3", Some("3")),
                ChapterRecord::new("c2", None),
                ChapterRecord::new("c1", None),
                ChapterRecord::new("c0", None),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_feed_language_and_limit() {
        async fn feed(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
            assert_eq!(
                query.get("translatedLanguage[]").map(String::as_str),
                Some("id")
            );
            assert_eq!(query.get("limit").map(String::as_str), Some("100"));

            Json(json!({ "data": [] }))
        }

        let url = serve(Router::new().route("/manga/{id}/feed", get(feed))).await;
        let records = mangadex(&url)
            .with_language("id")
            .with_feed_limit(100)
            .fetch_feed(&SeriesId::new("abc-123"))
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_feed_without_data() {
        let url = serve(Router::new().route(
            "/manga/{id}/feed",
            get(|| async { Json(json!({ "result": "ok" })) }),
        ))
        .await;

        let records = mangadex(&url)
            .fetch_feed(&SeriesId::new("abc-123"))
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_feed_server_error() {
        let url = serve(Router::new().route(
            "/manga/{id}/feed",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        let res = mangadex(&url).fetch_feed(&SeriesId::new("abc-123")).await;

        assert!(matches!(res, Err(Error::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_feed_malformed_body() {
        let url = serve(Router::new().route(
            "/manga/{id}/feed",
            get(|| async { "<html>maintenance</html>" }),
        ))
        .await;

        let res = mangadex(&url).fetch_feed(&SeriesId::new("abc-123")).await;

        assert!(matches!(res, Err(Error::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_feed_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let res = mangadex(&format!("http://{addr}"))
            .fetch_feed(&SeriesId::new("abc-123"))
            .await;

        assert!(matches!(res, Err(Error::FetchFailed(_))));
    }
}
