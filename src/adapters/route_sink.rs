//! Route sinks: where a finished imposter ends up.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Imposter, RouteSink};

/// Keeps every published imposter in memory
#[derive(Clone, Default)]
pub struct MemoryRouteSink {
    published: Arc<RwLock<Vec<Imposter>>>,
}

impl MemoryRouteSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self) -> Option<Imposter> {
        let published = self.published.read().await;
        published.last().cloned()
    }

    pub async fn publish_count(&self) -> usize {
        self.published.read().await.len()
    }
}

#[async_trait]
impl RouteSink for MemoryRouteSink {
    async fn publish(&self, imposter: &Imposter) -> anyhow::Result<()> {
        let mut published = self.published.write().await;
        published.push(imposter.clone());
        Ok(())
    }
}

/// Writes the imposter as pretty JSON to a file, or to stdout for `-`.
pub struct FileRouteSink {
    path: PathBuf,
}

impl FileRouteSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stdout(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

#[async_trait]
impl RouteSink for FileRouteSink {
    async fn publish(&self, imposter: &Imposter) -> anyhow::Result<()> {
        let mut content = serde_json::to_string_pretty(imposter)?;
        content.push('\n');

        if self.is_stdout() {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            stdout.flush().await?;
            return Ok(());
        }

        fs::write(&self.path, content).await.map_err(|e| {
            anyhow::anyhow!("Failed to write imposter to {}: {}", self.path.display(), e)
        })?;

        info!(
            path = %self.path.display(),
            stubs = imposter.stubs.len(),
            "Wrote imposter definition"
        );
        Ok(())
    }
}
