//! Application settings and connection strings dependency registration
//!
//! Both concerns are single-valued: the builders take the winning value
//! from override resolution and register nothing at all when no layer
//! supplies one.

use crate::builder::{qualified_path, resolve_anchor, render_patch, uuid_metadata, ConcernAnchor};
use plan_types::{
    dependency_paths, metadata_keys, ApplicationSettings, ConnectionStrings, Dependencies,
    MetadataValue, NodeId, PlanCreationResponse, PlanResult, PlanSerializer, YamlUpdates,
};
use plan_yaml::YamlNode;

/// Register the application settings dependency entry, if a value exists
pub fn add_application_settings_dependency(
    service_node: &YamlNode,
    settings: Option<&ApplicationSettings>,
    overridden: bool,
    serializer: &dyn PlanSerializer,
) -> PlanResult<Option<(NodeId, PlanCreationResponse)>> {
    let Some(settings) = settings else {
        return Ok(None);
    };

    let relative_path = dependency_paths::SERVICE_DEFINITION_APPLICATION_SETTINGS;
    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);

    let mut metadata = uuid_metadata(&node_id, serializer)?;
    metadata.insert(
        metadata_keys::APPLICATION_SETTINGS_STEP_PARAMETER.to_string(),
        serializer.serialize(&MetadataValue::ApplicationSettings(settings.clone()))?,
    );

    let mut yaml_updates = YamlUpdates::new();
    if overridden || patch_path.is_some() {
        let path = patch_path.unwrap_or_else(|| qualified_path(service_node, relative_path));
        yaml_updates.insert(path, render_patch(settings)?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    Ok(Some((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    )))
}

/// Register the connection strings dependency entry, if a value exists
pub fn add_connection_strings_dependency(
    service_node: &YamlNode,
    strings: Option<&ConnectionStrings>,
    overridden: bool,
    serializer: &dyn PlanSerializer,
) -> PlanResult<Option<(NodeId, PlanCreationResponse)>> {
    let Some(strings) = strings else {
        return Ok(None);
    };

    let relative_path = dependency_paths::SERVICE_DEFINITION_CONNECTION_STRINGS;
    let ConcernAnchor { node_id, patch_path } = resolve_anchor(service_node, relative_path);

    let mut metadata = uuid_metadata(&node_id, serializer)?;
    metadata.insert(
        metadata_keys::CONNECTION_STRINGS_STEP_PARAMETER.to_string(),
        serializer.serialize(&MetadataValue::ConnectionStrings(strings.clone()))?,
    );

    let mut yaml_updates = YamlUpdates::new();
    if overridden || patch_path.is_some() {
        let path = patch_path.unwrap_or_else(|| qualified_path(service_node, relative_path));
        yaml_updates.insert(path, render_patch(strings)?);
    }

    let mut dependencies = Dependencies::new();
    dependencies.register(node_id.clone(), relative_path, metadata);

    Ok(Some((
        node_id,
        PlanCreationResponse::for_dependencies(dependencies).with_yaml_updates(yaml_updates),
    )))
}
