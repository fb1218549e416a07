use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::domain::{InterfaceDocument, MockError, MockResult};

/// Reads interface documents from disk.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load a JSON or YAML document. `.json` files are parsed as JSON,
    /// everything else as YAML (which also accepts JSON).
    pub async fn load(path: impl AsRef<Path>) -> MockResult<InterfaceDocument> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            MockError::Document(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let document = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .map_err(|e| match e {
            MockError::Document(reason) => {
                MockError::Document(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })?;

        info!(
            path = %path.display(),
            paths = document.paths.len(),
            "Loaded interface document"
        );
        Ok(document)
    }

    pub fn from_json_str(content: &str) -> MockResult<InterfaceDocument> {
        serde_json::from_str(content)
            .map_err(|e| MockError::Document(format!("JSON parse error: {}", e)))
    }

    pub fn from_yaml_str(content: &str) -> MockResult<InterfaceDocument> {
        debug!(bytes = content.len(), "Parsing YAML document");
        serde_yaml::from_str(content)
            .map_err(|e| MockError::Document(format!("YAML parse error: {}", e)))
    }
}
