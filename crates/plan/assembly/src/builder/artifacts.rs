//! Artifact dependency registration

use crate::builder::{
    prepare_metadata, resolve_anchor, render_patch, uuid_metadata, ConcernAnchor,
};
use plan_types::{
    dependency_paths, metadata_keys, ArtifactListConfig, Dependencies, MetadataValue, NodeId,
    PlanCreationResponse, PlanResult, PlanSerializer, ServiceConfig, ServiceEntityConfig,
    YamlUpdates,
};
use plan_yaml::YamlNode;

/// Register the v1 artifacts dependency entry.
///
/// A service carrying its own definition anchors at
/// `serviceDefinition/spec/artifacts`. A propagated service resolves its
/// artifacts through stage overrides instead: the path flips to
/// `stageOverrides/artifacts`, and when the yaml has no such subtree a
/// patch materialises the effective artifact list there.
pub fn add_artifacts_dependency(
    service_node: &YamlNode,
    service_config: &ServiceConfig,
    serializer: &dyn PlanSerializer,
) -> PlanResult<(NodeId, PlanCreationResponse)> {
    let relative_path = if service_config.propagates() {
        dependency_paths::STAGE_OVERRIDES_ARTIFACTS
    } else {
        dependency_paths::SERVICE_DEFINITION_ARTIFACTS
    };

    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);
    let metadata = prepare_metadata(&node_id, service_config, serializer)?;

    let mut yaml_updates = YamlUpdates::new();
    if let Some(path) = patch_path {
        let effective = service_config.effective_artifacts().cloned().unwrap_or_default();
        yaml_updates.insert(path, render_patch(&effective)?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    tracing::debug!(node_id = %node_id, path = relative_path, "registered artifacts dependency");
    Ok((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    ))
}

/// Register the v2 artifacts dependency entry for a service entity
pub fn add_artifacts_dependency_v2(
    service_node: &YamlNode,
    service: &ServiceEntityConfig,
    serializer: &dyn PlanSerializer,
) -> PlanResult<(NodeId, PlanCreationResponse)> {
    let relative_path = dependency_paths::SERVICE_DEFINITION_ARTIFACTS;
    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);

    let artifacts: ArtifactListConfig = service
        .service_definition
        .spec
        .artifacts
        .clone()
        .unwrap_or_default();

    let mut metadata = uuid_metadata(&node_id, serializer)?;
    metadata.insert(
        metadata_keys::ARTIFACT_LIST_CONFIG.to_string(),
        serializer.serialize(&MetadataValue::ArtifactList(artifacts.clone()))?,
    );

    let mut yaml_updates = YamlUpdates::new();
    if let Some(path) = patch_path {
        yaml_updates.insert(path, render_patch(&artifacts)?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    Ok((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    ))
}
