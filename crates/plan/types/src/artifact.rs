//! Artifact configuration
//!
//! A service declares at most one primary artifact and any number of
//! sidecars. The fork assembler groups sidecars into an inner fork and
//! combines it with the primary into the artifacts fork.

use serde::{Deserialize, Serialize};

/// Registry flavor an artifact is pulled from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactSourceKind {
    DockerRegistry,
    Gcr,
    Ecr,
    ArtifactoryRegistry,
    Nexus3Registry,
}

/// Where an artifact comes from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSource {
    #[serde(rename = "type")]
    pub kind: ArtifactSourceKind,
    pub connector_ref: String,
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ArtifactSource {
    pub fn docker(connector_ref: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            kind: ArtifactSourceKind::DockerRegistry,
            connector_ref: connector_ref.into(),
            image_path: image_path.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// The primary artifact of a service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryArtifact {
    pub source: ArtifactSource,
}

/// A sidecar artifact, identified so overrides can address it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidecarArtifact {
    pub identifier: String,
    pub source: ArtifactSource,
}

/// The full artifact declaration of a service definition or stage override
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactListConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<PrimaryArtifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<SidecarArtifact>,
}

impl ArtifactListConfig {
    /// Whether this declaration yields any artifact leaf node at all
    pub fn has_artifacts(&self) -> bool {
        self.primary.is_some() || !self.sidecars.is_empty()
    }
}
