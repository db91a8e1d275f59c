//! The plan-creation response contract
//!
//! Everything the execution engine receives: per-node yaml dependency
//! paths, serialized dependency metadata, yaml patches for synthesized
//! configuration, and the node graph itself. All maps are insertion
//! ordered; merging never overwrites an id already registered.

use crate::ids::NodeId;
use crate::node::PlanNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Well-known dependency-metadata keys
pub mod metadata_keys {
    pub const UUID: &str = "uuid";
    pub const SERVICE_CONFIG: &str = "serviceConfig";
    pub const SERVICE_ENTITY: &str = "serviceEntity";
    pub const MANIFEST_LIST_CONFIG: &str = "manifestListConfig";
    pub const SERVICE_DEFINITION_TYPE: &str = "serviceDefinitionType";
    pub const ARTIFACT_LIST_CONFIG: &str = "artifactListConfig";
    pub const CONFIG_FILES_STEP_PARAMETER: &str = "configFilesStepParameter";
    pub const APPLICATION_SETTINGS_STEP_PARAMETER: &str = "applicationSettingsStepParameter";
    pub const CONNECTION_STRINGS_STEP_PARAMETER: &str = "connectionStringsStepParameter";
}

/// Well-known dependency paths into the stage yaml, forward-slash separated
/// and relative to the service node
pub mod dependency_paths {
    pub const SERVICE_DEFINITION_ARTIFACTS: &str = "serviceDefinition/spec/artifacts";
    pub const SERVICE_DEFINITION_MANIFESTS: &str = "serviceDefinition/spec/manifests";
    pub const SERVICE_DEFINITION_CONFIG_FILES: &str = "serviceDefinition/spec/configFiles";
    pub const SERVICE_DEFINITION_APPLICATION_SETTINGS: &str =
        "serviceDefinition/spec/applicationSettings";
    pub const SERVICE_DEFINITION_CONNECTION_STRINGS: &str =
        "serviceDefinition/spec/connectionStrings";
    pub const STAGE_OVERRIDES_ARTIFACTS: &str = "stageOverrides/artifacts";
    pub const STAGE_OVERRIDES_MANIFESTS: &str = "stageOverrides/manifests";
    pub const STAGE_OVERRIDES_CONFIG_FILES: &str = "stageOverrides/configFiles";
}

/// Serialized metadata attached to one node: key → opaque bytes
pub type DependencyMetadata = IndexMap<String, Vec<u8>>;

/// Per-node dependency declarations for the execution engine
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Node id → yaml path the engine should resolve for this concern
    pub paths: IndexMap<NodeId, String>,
    /// Node id → serialized metadata blobs (always carries at least "uuid")
    pub metadata: IndexMap<NodeId, DependencyMetadata>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one node's dependency path and metadata
    pub fn register(&mut self, node_id: NodeId, path: impl Into<String>, metadata: DependencyMetadata) {
        self.paths.insert(node_id.clone(), path.into());
        self.metadata.insert(node_id, metadata);
    }

    /// Union with another set; ids already present keep their entries
    pub fn merge(&mut self, other: Dependencies) {
        for (id, path) in other.paths {
            self.paths.entry(id).or_insert(path);
        }
        for (id, metadata) in other.metadata {
            self.metadata.entry(id).or_insert(metadata);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.metadata.is_empty()
    }
}

/// Yaml patches: fully-qualified yaml path → replacement yaml text.
/// Present only when resolved configuration diverges from the literal tree.
pub type YamlUpdates = IndexMap<String, String>;

/// One entry of the plan-creation response map
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCreationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<PlanNode>,
    #[serde(default, skip_serializing_if = "Dependencies::is_empty")]
    pub dependencies: Dependencies,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub yaml_updates: YamlUpdates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_node_id: Option<NodeId>,
}

impl PlanCreationResponse {
    pub fn for_node(node: PlanNode) -> Self {
        Self {
            node: Some(node),
            ..Self::default()
        }
    }

    pub fn for_dependencies(dependencies: Dependencies) -> Self {
        Self {
            dependencies,
            ..Self::default()
        }
    }

    pub fn with_yaml_updates(mut self, yaml_updates: YamlUpdates) -> Self {
        self.yaml_updates = yaml_updates;
        self
    }
}

/// The whole deliverable of assembling one stage's service plan
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePlan {
    /// Insertion-ordered response map, one entry per registered node id
    pub responses: IndexMap<NodeId, PlanCreationResponse>,
    /// Always the outermost service-config node
    pub starting_node_id: Option<NodeId>,
}

impl ServicePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response under its node id. Existing entries are kept;
    /// responses are never mutated after being merged upward.
    pub fn put(&mut self, node_id: NodeId, response: PlanCreationResponse) {
        self.responses.entry(node_id).or_insert(response);
    }

    /// All assembled plan nodes, in registration order
    pub fn nodes(&self) -> impl Iterator<Item = &PlanNode> {
        self.responses.values().filter_map(|r| r.node.as_ref())
    }

    pub fn node(&self, id: &NodeId) -> Option<&PlanNode> {
        self.responses.get(id).and_then(|r| r.node.as_ref())
    }

    /// Union of every response's dependency declarations
    pub fn all_dependencies(&self) -> Dependencies {
        let mut merged = Dependencies::new();
        for response in self.responses.values() {
            merged.merge(response.dependencies.clone());
        }
        merged
    }

    /// Union of every response's yaml patches
    pub fn all_yaml_updates(&self) -> YamlUpdates {
        let mut merged = YamlUpdates::new();
        for response in self.responses.values() {
            for (path, text) in &response.yaml_updates {
                merged.entry(path.clone()).or_insert_with(|| text.clone());
            }
        }
        merged
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }
}
