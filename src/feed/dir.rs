use anyhow::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::feed::{Fetched, Source};

/// Reads exports from a local directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Source for DirSource {
    async fn read(&self, path: &str) -> Result<Fetched> {
        let full = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(Fetched::Found(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Fetched::NotFound),
            Err(err) => Err(anyhow::anyhow!("read {}: {}", full.display(), err)),
        }
    }

    fn describe(&self) -> String {
        format!("dir:{}", self.root.display())
    }
}
