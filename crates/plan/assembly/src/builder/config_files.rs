//! Config file dependency registration

use crate::builder::{
    prepare_metadata, qualified_path, resolve_anchor, render_patch, uuid_metadata, ConcernAnchor,
};
use plan_types::{
    dependency_paths, metadata_keys, ConfigFile, Dependencies, MetadataValue, NodeId,
    PlanCreationResponse, PlanResult, PlanSerializer, ServiceConfig, ServiceEntityConfig,
    YamlUpdates,
};
use plan_yaml::YamlNode;

/// Register the v1 config files dependency entry
pub fn add_config_files_dependency(
    service_node: &YamlNode,
    service_config: &ServiceConfig,
    serializer: &dyn PlanSerializer,
) -> PlanResult<(NodeId, PlanCreationResponse)> {
    let relative_path = if service_config.propagates() {
        dependency_paths::STAGE_OVERRIDES_CONFIG_FILES
    } else {
        dependency_paths::SERVICE_DEFINITION_CONFIG_FILES
    };

    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);
    let metadata = prepare_metadata(&node_id, service_config, serializer)?;

    let mut yaml_updates = YamlUpdates::new();
    if let Some(path) = patch_path {
        yaml_updates.insert(
            path,
            render_patch(&service_config.effective_config_files().to_vec())?,
        );
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    Ok((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    ))
}

/// Register the v2 config files dependency entry with the merged list
pub fn add_config_files_dependency_v2(
    service_node: &YamlNode,
    _service: &ServiceEntityConfig,
    merged_config_files: &[ConfigFile],
    overridden: bool,
    serializer: &dyn PlanSerializer,
) -> PlanResult<(NodeId, PlanCreationResponse)> {
    let relative_path = dependency_paths::SERVICE_DEFINITION_CONFIG_FILES;
    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);

    let mut metadata = uuid_metadata(&node_id, serializer)?;
    metadata.insert(
        metadata_keys::CONFIG_FILES_STEP_PARAMETER.to_string(),
        serializer.serialize(&MetadataValue::ConfigFileList(merged_config_files.to_vec()))?,
    );

    let mut yaml_updates = YamlUpdates::new();
    if overridden || patch_path.is_some() {
        let path = patch_path.unwrap_or_else(|| qualified_path(service_node, relative_path));
        yaml_updates.insert(path, render_patch(&merged_config_files.to_vec())?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    Ok((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    ))
}
