//! File stores referenced by manifests, config files, and settings

use serde::{Deserialize, Serialize};

/// Where a manifest, config file, or settings file lives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    Git,
    Http,
    S3,
    Inline,
}

/// A pointer into a file store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub kind: StoreKind,
    /// Connector used to reach the store; absent for inline content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl StoreConfig {
    pub fn git(connector_ref: impl Into<String>, paths: Vec<String>) -> Self {
        Self {
            kind: StoreKind::Git,
            connector_ref: Some(connector_ref.into()),
            paths,
        }
    }

    pub fn inline(paths: Vec<String>) -> Self {
        Self {
            kind: StoreKind::Inline,
            connector_ref: None,
            paths,
        }
    }
}
