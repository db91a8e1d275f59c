//! Plan-assembly domain types
//!
//! The vocabulary shared by the plan assembler and the external execution
//! engine: service and override configuration models, the plan node graph,
//! the dependency/response contract, the error taxonomy, and the opaque
//! serializer seam.
//!
//! Two service entity models coexist:
//!
//! - **v1** ([`ServiceConfig`]) — the service is declared inline in the
//!   stage (or propagated from a prior stage) and may carry stage-scoped
//!   overrides.
//! - **v2** ([`ServiceEntityConfig`]) — the service is a standalone entity;
//!   overrides arrive separately, scoped to an environment
//!   ([`EnvironmentGlobalOverride`], [`ServiceOverrideConfig`]).

#![deny(unsafe_code)]

pub mod artifact;
pub mod config_file;
pub mod deployment;
pub mod environment;
pub mod error;
pub mod ids;
pub mod manifest;
pub mod node;
pub mod response;
pub mod serializer;
pub mod service;
pub mod settings;
pub mod stage;
pub mod store;

pub use artifact::{ArtifactListConfig, ArtifactSource, PrimaryArtifact, SidecarArtifact};
pub use config_file::ConfigFile;
pub use deployment::DeploymentType;
pub use environment::{EnvironmentGlobalOverride, ServiceOverrideConfig};
pub use error::{OverrideConcern, OverrideLayer, PlanError, PlanResult};
pub use ids::NodeId;
pub use manifest::{Manifest, ManifestKind};
pub use node::{InfrastructureStepParameters, PlanNode, StepParameters, StepType};
pub use response::{
    dependency_paths, metadata_keys, Dependencies, DependencyMetadata, PlanCreationResponse,
    ServicePlan, YamlUpdates,
};
pub use serializer::{JsonSerializer, MetadataValue, PlanSerializer, SerializeError};
pub use service::{
    ServiceConfig, ServiceDefinition, ServiceEntityConfig, ServiceSpec, StageOverridesConfig,
    UseFromStage,
};
pub use settings::{ApplicationSettings, ConnectionStrings};
pub use stage::{DeploymentStage, MultiServiceConfig, StageSpec};
pub use store::{StoreConfig, StoreKind};
