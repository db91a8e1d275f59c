//! The serializer seam
//!
//! Dependency metadata crosses to the execution engine as opaque bytes.
//! The plan assembler never inspects or decodes what it gets back; callers
//! inject whichever wire format their engine speaks. [`JsonSerializer`] is
//! the default used in tests and standalone deployments.

use crate::artifact::ArtifactListConfig;
use crate::config_file::ConfigFile;
use crate::deployment::DeploymentType;
use crate::manifest::Manifest;
use crate::service::{ServiceConfig, ServiceEntityConfig};
use crate::settings::{ApplicationSettings, ConnectionStrings};
use serde::Serialize;

/// Everything that crosses the serializer seam
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum MetadataValue {
    Uuid(String),
    ServiceConfig(ServiceConfig),
    ServiceEntity(ServiceEntityConfig),
    ManifestList(Vec<Manifest>),
    ConfigFileList(Vec<ConfigFile>),
    ArtifactList(ArtifactListConfig),
    ApplicationSettings(ApplicationSettings),
    ConnectionStrings(ConnectionStrings),
    DeploymentType(DeploymentType),
}

/// Errors raised by a serializer implementation
#[derive(Debug, thiserror::Error)]
#[error("Serialization failed: {0}")]
pub struct SerializeError(pub String);

/// The single capability the plan assembler needs from its wire format
pub trait PlanSerializer: Send + Sync {
    fn serialize(&self, value: &MetadataValue) -> Result<Vec<u8>, SerializeError>;
}

/// Default serializer: compact JSON
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl PlanSerializer for JsonSerializer {
    fn serialize(&self, value: &MetadataValue) -> Result<Vec<u8>, SerializeError> {
        serde_json::to_vec(value).map_err(|e| SerializeError(e.to_string()))
    }
}
