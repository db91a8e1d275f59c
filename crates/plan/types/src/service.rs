//! Service configuration models
//!
//! Two entity models coexist. The v1 [`ServiceConfig`] carries the service
//! inline (or propagates it from another stage) plus optional stage-scoped
//! overrides. The v2 [`ServiceEntityConfig`] is the standalone service
//! entity whose overrides arrive separately, scoped to an environment.

use crate::artifact::ArtifactListConfig;
use crate::config_file::ConfigFile;
use crate::deployment::DeploymentType;
use crate::error::{PlanError, PlanResult};
use crate::manifest::Manifest;
use crate::settings::{ApplicationSettings, ConnectionStrings};
use serde::{Deserialize, Serialize};

/// Reference to another stage whose resolved service this stage reuses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseFromStage {
    pub stage: String,
}

/// What a service deploys: artifacts, manifests, config files, settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ArtifactListConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<Manifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_files: Vec<ConfigFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_settings: Option<ApplicationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strings: Option<ConnectionStrings>,
}

/// A deployment-typed service spec
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub spec: ServiceSpec,
}

impl ServiceDefinition {
    pub fn new(deployment_type: DeploymentType, spec: ServiceSpec) -> Self {
        Self {
            deployment_type,
            spec,
        }
    }
}

/// Stage-scoped replacements for parts of the service definition
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOverridesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ArtifactListConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<Manifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_files: Vec<ConfigFile>,
}

/// The v1 service declaration of a deployment stage
///
/// Exactly one of `service_ref` / `use_from_stage` must be set; this is
/// enforced by [`ServiceConfig::validate_service_source`], which every
/// consumer calls before building nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_from_stage: Option<UseFromStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_definition: Option<ServiceDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_overrides: Option<StageOverridesConfig>,
}

impl ServiceConfig {
    /// Enforce the serviceRef / useFromStage mutual-exclusivity rule
    pub fn validate_service_source(&self) -> PlanResult<()> {
        match (&self.service_ref, &self.use_from_stage) {
            (Some(_), Some(_)) => Err(PlanError::MutuallyExclusiveServiceFields),
            (None, None) => Err(PlanError::MissingServiceFields),
            _ => Ok(()),
        }
    }

    /// Whether this config reuses another stage's service
    pub fn propagates(&self) -> bool {
        self.use_from_stage.is_some()
    }

    /// The definition this stage deploys, required for node building
    pub fn definition(&self) -> PlanResult<&ServiceDefinition> {
        self.service_definition
            .as_ref()
            .ok_or_else(|| PlanError::MissingServiceDefinition {
                service_ref: self.service_ref.clone().unwrap_or_default(),
            })
    }

    /// Effective artifacts: stage overrides shadow the definition's list
    pub fn effective_artifacts(&self) -> Option<&ArtifactListConfig> {
        if let Some(overrides) = &self.stage_overrides {
            if let Some(artifacts) = &overrides.artifacts {
                if artifacts.has_artifacts() {
                    return Some(artifacts);
                }
            }
        }
        self.service_definition
            .as_ref()
            .and_then(|def| def.spec.artifacts.as_ref())
            .filter(|a| a.has_artifacts())
    }

    /// Effective manifests: a non-empty stage-override list fully replaces
    /// the definition's list for this stage
    pub fn effective_manifests(&self) -> &[Manifest] {
        if let Some(overrides) = &self.stage_overrides {
            if !overrides.manifests.is_empty() {
                return &overrides.manifests;
            }
        }
        self.service_definition
            .as_ref()
            .map(|def| def.spec.manifests.as_slice())
            .unwrap_or_default()
    }

    /// Effective config files, same replacement rule as manifests
    pub fn effective_config_files(&self) -> &[ConfigFile] {
        if let Some(overrides) = &self.stage_overrides {
            if !overrides.config_files.is_empty() {
                return &overrides.config_files;
            }
        }
        self.service_definition
            .as_ref()
            .map(|def| def.spec.config_files.as_slice())
            .unwrap_or_default()
    }
}

/// The v2 standalone service entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntityConfig {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub service_definition: ServiceDefinition,
}

impl ServiceEntityConfig {
    pub fn new(identifier: impl Into<String>, service_definition: ServiceDefinition) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            service_definition,
        }
    }
}
