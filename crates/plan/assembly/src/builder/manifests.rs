//! Manifest dependency registration

use crate::builder::{
    prepare_metadata, resolve_anchor, render_patch, uuid_metadata, ConcernAnchor,
};
use plan_types::{
    dependency_paths, metadata_keys, Dependencies, Manifest, MetadataValue, NodeId,
    PlanCreationResponse, PlanResult, PlanSerializer, ServiceConfig, ServiceEntityConfig,
    YamlUpdates,
};
use plan_yaml::YamlNode;

/// Register the v1 manifests dependency entry. Path and patch rules match
/// the artifacts builder: definition-supplied manifests anchor under the
/// service definition; propagated services anchor under stage overrides,
/// patched in when the subtree is missing.
pub fn add_manifests_dependency(
    service_node: &YamlNode,
    service_config: &ServiceConfig,
    serializer: &dyn PlanSerializer,
) -> PlanResult<(NodeId, PlanCreationResponse)> {
    let relative_path = if service_config.propagates() {
        dependency_paths::STAGE_OVERRIDES_MANIFESTS
    } else {
        dependency_paths::SERVICE_DEFINITION_MANIFESTS
    };

    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);
    let metadata = prepare_metadata(&node_id, service_config, serializer)?;

    let mut yaml_updates = YamlUpdates::new();
    if let Some(path) = patch_path {
        yaml_updates.insert(path, render_patch(&service_config.effective_manifests().to_vec())?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    tracing::debug!(node_id = %node_id, path = relative_path, "registered manifests dependency");
    Ok((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    ))
}

/// Register the v2 manifests dependency entry.
///
/// The metadata carries the already-merged manifest list and the service's
/// deployment type, so the downstream step can interpret the payload
/// without re-deriving it. A patch is emitted whenever the merged list
/// did not come verbatim from the yaml tree.
pub fn add_manifests_dependency_v2(
    service_node: &YamlNode,
    service: &ServiceEntityConfig,
    merged_manifests: &[Manifest],
    overridden: bool,
    serializer: &dyn PlanSerializer,
) -> PlanResult<(NodeId, PlanCreationResponse)> {
    let relative_path = dependency_paths::SERVICE_DEFINITION_MANIFESTS;
    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);

    let mut metadata = uuid_metadata(&node_id, serializer)?;
    metadata.insert(
        metadata_keys::MANIFEST_LIST_CONFIG.to_string(),
        serializer.serialize(&MetadataValue::ManifestList(merged_manifests.to_vec()))?,
    );
    metadata.insert(
        metadata_keys::SERVICE_DEFINITION_TYPE.to_string(),
        serializer.serialize(&MetadataValue::DeploymentType(
            service.service_definition.deployment_type,
        ))?,
    );

    let mut yaml_updates = YamlUpdates::new();
    if overridden || patch_path.is_some() {
        let path = patch_path
            .unwrap_or_else(|| crate::builder::qualified_path(service_node, relative_path));
        yaml_updates.insert(path, render_patch(&merged_manifests.to_vec())?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    tracing::debug!(
        node_id = %node_id,
        manifests = merged_manifests.len(),
        overridden,
        "registered merged manifests dependency"
    );
    Ok((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    ))
}
