//! Material download event types and payloads

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MaterialStatus {
    #[serde(rename = "downloading")]
    Downloading,
    #[serde(rename = "persisting")]
    Persisting,
    #[serde(rename = "saved")]
    Saved,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialStatus::Downloading => write!(f, "downloading"),
            MaterialStatus::Persisting => write!(f, "persisting"),
            MaterialStatus::Saved => write!(f, "saved"),
            MaterialStatus::Failed => write!(f, "failed"),
            MaterialStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Progress event payload for material downloads
#[derive(Debug, Clone, Serialize)]
pub struct MaterialProgress {
    pub task_id: String,
    pub percent: u32,
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
}

/// Status change event payload
#[derive(Debug, Clone, Serialize)]
pub struct MaterialStatusChanged {
    pub task_id: String,
    pub status: String,
    pub error: Option<String>,
}

/// Opaque reference to a persisted material: either a plain filesystem
/// path or a provider-scoped URI. Callers route it back through the
/// opener rather than touching the filesystem directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LocalFileRef {
    Path { path: String },
    Provider { uri: String },
}

impl LocalFileRef {
    pub fn location(&self) -> &str {
        match self {
            LocalFileRef::Path { path } => path,
            LocalFileRef::Provider { uri } => uri,
        }
    }

    pub fn is_provider_scoped(&self) -> bool {
        matches!(self, LocalFileRef::Provider { .. })
    }

    pub fn from_location(location: &str, provider_scoped: bool) -> Self {
        if provider_scoped {
            LocalFileRef::Provider {
                uri: location.to_string(),
            }
        } else {
            LocalFileRef::Path {
                path: location.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LocalFileRef, MaterialStatus};

    #[test]
    fn material_status_display_matches_expected_strings() {
        assert_eq!(MaterialStatus::Downloading.to_string(), "downloading");
        assert_eq!(MaterialStatus::Persisting.to_string(), "persisting");
        assert_eq!(MaterialStatus::Saved.to_string(), "saved");
        assert_eq!(MaterialStatus::Failed.to_string(), "failed");
        assert_eq!(MaterialStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn file_ref_round_trips_through_location() {
        let provider = LocalFileRef::Provider {
            uri: "tree/doc%20name.pdf".to_string(),
        };
        let rebuilt =
            LocalFileRef::from_location(provider.location(), provider.is_provider_scoped());
        assert_eq!(rebuilt, provider);

        let plain = LocalFileRef::Path {
            path: "/home/user/doc.pdf".to_string(),
        };
        assert!(!plain.is_provider_scoped());
    }
}
