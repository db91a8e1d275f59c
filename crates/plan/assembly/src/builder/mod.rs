//! Per-concern node builders
//!
//! Each builder registers one dependency entry for its concern: the yaml
//! path the execution engine resolves, a metadata map of serialized blobs
//! (always at least `uuid`), and a yaml patch when the effective value was
//! synthesized rather than read verbatim from the tree.
//!
//! The dependency entry is keyed by the concern's yaml subtree identifier
//! when the subtree exists; otherwise a fresh identifier is generated and
//! a patch materialises the effective value at the subtree's path.

pub mod artifacts;
pub mod config_files;
pub mod manifests;
pub mod settings;

use plan_types::serializer::SerializeError;
use plan_types::{
    metadata_keys, DependencyMetadata, MetadataValue, NodeId, PlanResult, PlanSerializer,
    ServiceConfig, ServiceEntityConfig,
};
use plan_yaml::YamlNode;

/// Where a concern's dependency entry is anchored in the yaml tree
pub(crate) struct ConcernAnchor {
    pub node_id: NodeId,
    /// Set when the subtree does not exist and a patch must create it:
    /// the fully-qualified path the patch applies to
    pub patch_path: Option<String>,
}

/// Resolve the anchor for a concern at `relative_path` under the service
/// node. Existing subtrees are addressed by their injected identifier.
pub(crate) fn resolve_anchor(service_node: &YamlNode, relative_path: &str) -> ConcernAnchor {
    match service_node.at(relative_path) {
        Some(node) => ConcernAnchor {
            node_id: NodeId::new(node.uuid()),
            patch_path: None,
        },
        None => ConcernAnchor {
            node_id: NodeId::generate(),
            patch_path: Some(qualified_path(service_node, relative_path)),
        },
    }
}

/// Fully-qualified yaml path of `relative_path` under the service node
pub(crate) fn qualified_path(service_node: &YamlNode, relative_path: &str) -> String {
    if service_node.path().is_empty() {
        relative_path.to_string()
    } else {
        format!("{}/{}", service_node.path(), relative_path)
    }
}

/// Render a value as yaml patch text
pub(crate) fn render_patch<T: serde::Serialize>(value: &T) -> PlanResult<String> {
    plan_yaml::to_yaml_text(value).map_err(|e| SerializeError(e.to_string()).into())
}

/// Base metadata for a v1 concern: the node uuid plus the whole service
/// configuration
pub fn prepare_metadata(
    node_id: &NodeId,
    service_config: &ServiceConfig,
    serializer: &dyn PlanSerializer,
) -> PlanResult<DependencyMetadata> {
    let mut metadata = DependencyMetadata::new();
    metadata.insert(
        metadata_keys::UUID.to_string(),
        serializer.serialize(&MetadataValue::Uuid(node_id.as_str().to_string()))?,
    );
    metadata.insert(
        metadata_keys::SERVICE_CONFIG.to_string(),
        serializer.serialize(&MetadataValue::ServiceConfig(service_config.clone()))?,
    );
    Ok(metadata)
}

/// Base metadata for a v2 concern: the node uuid plus the service entity
pub fn prepare_metadata_v2(
    node_id: &NodeId,
    service: &ServiceEntityConfig,
    serializer: &dyn PlanSerializer,
) -> PlanResult<DependencyMetadata> {
    let mut metadata = DependencyMetadata::new();
    metadata.insert(
        metadata_keys::UUID.to_string(),
        serializer.serialize(&MetadataValue::Uuid(node_id.as_str().to_string()))?,
    );
    metadata.insert(
        metadata_keys::SERVICE_ENTITY.to_string(),
        serializer.serialize(&MetadataValue::ServiceEntity(service.clone()))?,
    );
    Ok(metadata)
}

/// Metadata carrying only the node uuid; concern builders add their own
/// concern-specific entries on top
pub(crate) fn uuid_metadata(
    node_id: &NodeId,
    serializer: &dyn PlanSerializer,
) -> PlanResult<DependencyMetadata> {
    let mut metadata = DependencyMetadata::new();
    metadata.insert(
        metadata_keys::UUID.to_string(),
        serializer.serialize(&MetadataValue::Uuid(node_id.as_str().to_string()))?,
    );
    Ok(metadata)
}
