//! Deployment stages
//!
//! A stage deploys either a single service or a matrix of services. The
//! propagation validator only ever accepts single-service stages as
//! propagation sources.

use crate::deployment::DeploymentType;
use crate::service::ServiceConfig;
use serde::{Deserialize, Serialize};

/// A multi-service (matrix) declaration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiServiceConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ServiceConfig>,
    /// Run the matrix entries in parallel rather than serially
    #[serde(default)]
    pub parallel: bool,
}

/// The spec of a deployment stage: one service or many, plus environment
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSpec {
    /// Declared outright for stages that propagate their service and so
    /// carry no inline service definition to derive it from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_type: Option<DeploymentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<MultiServiceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_ref: Option<String>,
}

/// One phase of a pipeline: service + environment + execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStage {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub spec: StageSpec,
}

impl DeploymentStage {
    pub fn new(identifier: impl Into<String>, spec: StageSpec) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            spec,
        }
    }

    /// Whether this stage deploys more than one service
    pub fn is_multi_service(&self) -> bool {
        self.spec.services.is_some()
    }

    /// The single service config, if this is a single-service stage
    pub fn service_config(&self) -> Option<&ServiceConfig> {
        self.spec.service.as_ref()
    }

    /// The deployment type of this stage: the explicit declaration when
    /// present, otherwise derived from the inline service definition
    pub fn deployment_type(&self) -> Option<DeploymentType> {
        self.spec.deployment_type.or_else(|| {
            self.spec
                .service
                .as_ref()
                .and_then(|svc| svc.service_definition.as_ref())
                .map(|def| def.deployment_type)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{ServiceDefinition, ServiceSpec};

    #[test]
    fn test_multi_service_detection() {
        let single = DeploymentStage::new(
            "stage1",
            StageSpec {
                service: Some(ServiceConfig::default()),
                ..StageSpec::default()
            },
        );
        assert!(!single.is_multi_service());

        let multi = DeploymentStage::new(
            "stage2",
            StageSpec {
                services: Some(MultiServiceConfig::default()),
                ..StageSpec::default()
            },
        );
        assert!(multi.is_multi_service());
    }

    #[test]
    fn test_deployment_type_read_through() {
        let stage = DeploymentStage::new(
            "stage1",
            StageSpec {
                service: Some(ServiceConfig {
                    service_ref: Some("svc".into()),
                    service_definition: Some(ServiceDefinition::new(
                        DeploymentType::NativeHelm,
                        ServiceSpec::default(),
                    )),
                    ..ServiceConfig::default()
                }),
                ..StageSpec::default()
            },
        );
        assert_eq!(stage.deployment_type(), Some(DeploymentType::NativeHelm));
    }
}
