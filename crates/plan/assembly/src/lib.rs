//! Stage plan assembly
//!
//! Turns a YAML-authored deployment stage into a resolved configuration
//! and an executable node graph. The assembler coordinates, it never
//! executes deployment work: fork nodes declare which children the
//! external engine may run in parallel, and every piece of configuration
//! the engine needs crosses the boundary as a registered dependency with
//! serialized metadata.
//!
//! # Components
//!
//! - [`resolver`] — merges the service definition with environment-global
//!   and per-service override layers, validating duplicates and manifest
//!   kinds
//! - [`propagation`] — validates `useFromStage` references against prior
//!   stages
//! - [`builder`] — registers per-concern dependency entries, emitting
//!   yaml patches for synthesized values
//! - [`forks`] — groups leaf nodes into parallel-runnable fork nodes
//! - [`wiring`] — chains the service nodes and returns the whole plan
//!
//! # Example
//!
//! ```rust
//! use plan_assembly::wiring::assemble_stage_plan;
//! use plan_types::{
//!     DeploymentStage, DeploymentType, InfrastructureStepParameters, JsonSerializer,
//!     Manifest, ManifestKind, ServiceConfig, ServiceDefinition, ServiceSpec, StageSpec,
//! };
//! use plan_yaml::YamlTree;
//!
//! let yaml = "spec:\n  service:\n    serviceRef: web\n";
//! let tree = YamlTree::parse(yaml).unwrap();
//!
//! let stage = DeploymentStage::new(
//!     "deploy",
//!     StageSpec {
//!         service: Some(ServiceConfig {
//!             service_ref: Some("web".into()),
//!             service_definition: Some(ServiceDefinition::new(
//!                 DeploymentType::Kubernetes,
//!                 ServiceSpec {
//!                     manifests: vec![Manifest::new("base", ManifestKind::K8sManifest)],
//!                     ..ServiceSpec::default()
//!                 },
//!             )),
//!             ..ServiceConfig::default()
//!         }),
//!         ..StageSpec::default()
//!     },
//! );
//!
//! let plan = assemble_stage_plan(
//!     &stage,
//!     &[],
//!     &tree,
//!     &JsonSerializer,
//!     InfrastructureStepParameters::default(),
//! )
//! .unwrap();
//! assert!(plan.starting_node_id.is_some());
//! ```

#![deny(unsafe_code)]

pub mod builder;
pub mod forks;
pub mod propagation;
pub mod resolver;
pub mod wiring;

pub use forks::fork_node;
pub use propagation::validate_use_from_stage;
pub use resolver::{resolve_overrides, ResolvedOverrides};
pub use wiring::{assemble_service_plan, assemble_service_plan_v2, assemble_stage_plan};
