use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use shiori_source::mangadex;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MangaDexConfig {
    #[serde(default = "default_mangadex_api_url")]
    pub api_url: String,
    #[serde(default = "default_mangadex_site_url")]
    pub site_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds, the http client default applies when unset
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

impl Default for MangaDexConfig {
    fn default() -> Self {
        Self {
            api_url: default_mangadex_api_url(),
            site_url: default_mangadex_site_url(),
            language: default_language(),
            feed_limit: default_feed_limit(),
            user_agent: default_user_agent(),
            request_timeout: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    pub mangadex: MangaDexConfig,
}

fn shiori_home() -> PathBuf {
    match std::env::var("SHIORI_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shiori"),
    }
}

fn default_mangadex_api_url() -> String {
    mangadex::API_URL.to_string()
}

fn default_mangadex_site_url() -> String {
    mangadex::SITE_URL.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_feed_limit() -> u32 {
    mangadex::MAX_FEED_LIMIT
}

fn default_user_agent() -> String {
    format!("shiori/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => shiori_home().join("config.yml"),
        };

        match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
