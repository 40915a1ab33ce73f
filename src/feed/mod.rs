use anyhow::Result;
use async_trait::async_trait;

use crate::state::Config;

mod dir;
mod http;
pub mod loader;

pub use dir::DirSource;
pub use http::HttpSource;

/// Outcome of reading one resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Found(String),
    /// Expected steady state for a day that has not been published yet.
    NotFound,
}

/// Where daily CSV exports come from.
#[async_trait]
pub trait Source: Send + Sync {
    async fn read(&self, path: &str) -> Result<Fetched>;
    fn describe(&self) -> String;
}

#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    Http(String),
    Dir(String),
}

impl SourceKind {
    pub fn from_config(cfg: &Config) -> Self {
        match &cfg.base_url {
            Some(url) => SourceKind::Http(url.clone()),
            None => SourceKind::Dir(cfg.data_dir.clone()),
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn Source>> {
        match self {
            SourceKind::Http(base) => Ok(Box::new(HttpSource::new(&base, cfg.http_timeout_secs)?)),
            SourceKind::Dir(root) => Ok(Box::new(DirSource::new(root))),
        }
    }
}
