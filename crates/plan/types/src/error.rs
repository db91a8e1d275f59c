//! Plan-assembly error taxonomy
//!
//! All failures are synchronous and abort the whole stage's plan creation;
//! no partial plan is ever returned. Unresolvable references (a typo) are
//! distinct variants from illegal ones (a structural rule violation).

use crate::deployment::DeploymentType;
use crate::serializer::SerializeError;
use thiserror::Error;

/// Which override layer an invalid entry was found in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideLayer {
    ServiceOverrides,
    EnvironmentGlobalOverrides,
}

impl std::fmt::Display for OverrideLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideLayer::ServiceOverrides => write!(f, "service overrides"),
            OverrideLayer::EnvironmentGlobalOverrides => write!(f, "environment global overrides"),
        }
    }
}

/// Which collection concern a validation failure refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideConcern {
    Manifest,
    ConfigFile,
}

impl std::fmt::Display for OverrideConcern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideConcern::Manifest => write!(f, "manifest"),
            OverrideConcern::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Errors raised while assembling a stage's plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Only one of serviceRef and useFromStage fields are allowed.")]
    MutuallyExclusiveServiceFields,

    #[error("At least one of serviceRef and useFromStage fields is required.")]
    MissingServiceFields,

    #[error("Stage with identifier [{stage}] given for service propagation does not exist.")]
    StageNotFound { stage: String },

    #[error(
        "Invalid identifier [{stage}] given in useFromStage. Cannot reference a stage which also has useFromStage parameter."
    )]
    ChainedPropagation { stage: String },

    #[error(
        "Stage [{stage}] deploys multiple services. Service propagation is not supported for multi-service stages."
    )]
    MultiServicePropagation { stage: String },

    #[error(
        "Deployment type [{deployment_type}] of stage [{stage}] does not match deployment type [{source_type}] of stage [{source_stage}] from which service propagation is configured."
    )]
    DeploymentTypeMismatch {
        stage: String,
        deployment_type: DeploymentType,
        source_stage: String,
        source_type: DeploymentType,
    },

    #[error(
        "Found duplicate {concern} identifiers [{}] in {layer} for service [{service_ref}] and environment [{environment_ref}].",
        identifiers.join(",")
    )]
    DuplicateOverrideIdentifiers {
        concern: OverrideConcern,
        identifiers: Vec<String>,
        layer: OverrideLayer,
        service_ref: String,
        environment_ref: String,
    },

    #[error("Unsupported manifest types: [{}] found in {layer}.", kinds.join(","))]
    UnsupportedManifestKinds {
        kinds: Vec<String>,
        layer: OverrideLayer,
    },

    #[error("Service [{service_ref}] has no service definition.")]
    MissingServiceDefinition { service_ref: String },

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

/// Result alias for plan-assembly operations
pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutual_exclusivity_message() {
        assert_eq!(
            PlanError::MutuallyExclusiveServiceFields.to_string(),
            "Only one of serviceRef and useFromStage fields are allowed."
        );
    }

    #[test]
    fn test_required_field_message() {
        assert_eq!(
            PlanError::MissingServiceFields.to_string(),
            "At least one of serviceRef and useFromStage fields is required."
        );
    }

    #[test]
    fn test_duplicate_identifier_message_lists_everything() {
        let err = PlanError::DuplicateOverrideIdentifiers {
            concern: OverrideConcern::Manifest,
            identifiers: vec!["values_test1".into(), "values_test2".into()],
            layer: OverrideLayer::EnvironmentGlobalOverrides,
            service_ref: "SVC_REF".into(),
            environment_ref: "ENV_REF".into(),
        };
        assert_eq!(
            err.to_string(),
            "Found duplicate manifest identifiers [values_test1,values_test2] in environment global overrides for service [SVC_REF] and environment [ENV_REF]."
        );
    }

    #[test]
    fn test_deployment_type_mismatch_names_both_sides() {
        let err = PlanError::DeploymentTypeMismatch {
            stage: "stage1".into(),
            deployment_type: DeploymentType::Kubernetes,
            source_stage: "stage0".into(),
            source_type: DeploymentType::NativeHelm,
        };
        let message = err.to_string();
        assert!(message.contains("stage1"));
        assert!(message.contains("Kubernetes"));
        assert!(message.contains("stage0"));
        assert!(message.contains("NativeHelm"));
    }
}
