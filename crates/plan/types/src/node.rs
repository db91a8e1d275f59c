//! Plan nodes: the graph handed to the execution engine
//!
//! A node is identified, step-typed, and carries its own parameter payload.
//! Child ids always live on the parent; fork nodes declare their children
//! as independently runnable.

use crate::artifact::{ArtifactSource, SidecarArtifact};
use crate::config_file::ConfigFile;
use crate::deployment::DeploymentType;
use crate::ids::NodeId;
use crate::manifest::Manifest;
use crate::settings::{ApplicationSettings, ConnectionStrings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The step a node represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    ServiceConfig,
    Service,
    ServiceDefinition,
    ServiceSpec,
    Environment,
    Artifact,
    Manifest,
    ConfigFiles,
    ApplicationSettings,
    ConnectionStrings,
    Fork,
}

/// Infrastructure parameters supplied by the caller and attached, opaque,
/// to the environment node
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStepParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
}

/// Per-step parameter payloads, one variant per [`StepType`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StepParameters {
    #[serde(rename_all = "camelCase")]
    ServiceConfig { child_node_id: NodeId },
    #[serde(rename_all = "camelCase")]
    Service {
        /// Absent when the service was propagated from another stage
        service_ref: Option<String>,
        deployment_type: DeploymentType,
        child_node_id: NodeId,
    },
    #[serde(rename_all = "camelCase")]
    ServiceDefinition {
        deployment_type: DeploymentType,
        child_node_ids: Vec<NodeId>,
    },
    #[serde(rename_all = "camelCase")]
    ServiceSpec { child_node_ids: Vec<NodeId> },
    #[serde(rename_all = "camelCase")]
    Environment {
        environment_ref: Option<String>,
        infrastructure: InfrastructureStepParameters,
    },
    #[serde(rename_all = "camelCase")]
    Artifact {
        source: ArtifactSource,
        sidecar_identifier: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Manifest { manifest: Manifest },
    #[serde(rename_all = "camelCase")]
    ConfigFiles { config_files: Vec<ConfigFile> },
    #[serde(rename_all = "camelCase")]
    ApplicationSettings { settings: ApplicationSettings },
    #[serde(rename_all = "camelCase")]
    ConnectionStrings { strings: ConnectionStrings },
    /// Run all listed children in parallel
    #[serde(rename_all = "camelCase")]
    Fork { parallel_node_ids: Vec<NodeId> },
}

impl StepParameters {
    pub fn for_sidecar(sidecar: &SidecarArtifact) -> Self {
        StepParameters::Artifact {
            source: sidecar.source.clone(),
            sidecar_identifier: Some(sidecar.identifier.clone()),
        }
    }

    pub fn for_primary(source: &ArtifactSource) -> Self {
        StepParameters::Artifact {
            source: source.clone(),
            sidecar_identifier: None,
        }
    }
}

/// One node of the assembled plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanNode {
    pub uuid: NodeId,
    /// Human-facing identifier, e.g. the concern or yaml identifier
    pub identifier: String,
    pub name: String,
    pub step_type: StepType,
    pub step_parameters: StepParameters,
}

impl PlanNode {
    pub fn new(
        uuid: NodeId,
        identifier: impl Into<String>,
        name: impl Into<String>,
        step_type: StepType,
        step_parameters: StepParameters,
    ) -> Self {
        Self {
            uuid,
            identifier: identifier.into(),
            name: name.into(),
            step_type,
            step_parameters,
        }
    }

    /// Child node ids declared by this node, in execution-relevant order
    pub fn child_node_ids(&self) -> Vec<&NodeId> {
        match &self.step_parameters {
            StepParameters::ServiceConfig { child_node_id }
            | StepParameters::Service { child_node_id, .. } => vec![child_node_id],
            StepParameters::ServiceDefinition { child_node_ids, .. }
            | StepParameters::ServiceSpec { child_node_ids } => child_node_ids.iter().collect(),
            StepParameters::Fork { parallel_node_ids } => parallel_node_ids.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this node only structures the graph (no work of its own)
    pub fn is_synthetic(&self) -> bool {
        matches!(self.step_type, StepType::Fork)
    }
}
