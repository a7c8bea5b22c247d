use crate::{
    error::{BoardError, Result},
    seed::{SeedCard, SeedSource},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Seed rows read from a JSON array on disk
pub struct JsonFileSeed {
    path: PathBuf,
}

impl JsonFileSeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SeedSource for JsonFileSeed {
    async fn load(&self) -> Result<Vec<SeedCard>> {
        if !self.path.exists() {
            return Err(BoardError::Seed(format!(
                "seed file not found: {}",
                self.path.display()
            )));
        }

        let contents = fs::read_to_string(&self.path).await?;
        let seeds: Vec<SeedCard> = serde_json::from_str(&contents)?;

        tracing::debug!(path = %self.path.display(), cards = seeds.len(), "loaded seed file");
        Ok(seeds)
    }
}
