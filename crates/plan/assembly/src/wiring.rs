//! Graph wiring
//!
//! The top-level orchestrator: builds leaf nodes and forks for every
//! present concern, chains the service nodes, and returns the whole node
//! map plus the starting node id. It composes the specialized components
//! and never executes any deployment work itself.
//!
//! Chain shape (child ids always stored on the parent):
//!
//! ```text
//! ServiceConfig ─→ Service ─→ ServiceDefinition ─→ [ServiceSpec, Environment]
//!                                ServiceSpec ─→ [artifacts-fork, manifests-fork,
//!                                                configFiles, applicationSettings,
//!                                                connectionStrings]
//! ```
//!
//! The starting node is always the outermost ServiceConfig node, anchored
//! at the service yaml node's injected identifier. Any validation failure
//! aborts the whole call; no partial plan is ever returned.

use crate::builder;
use crate::forks::fork_node;
use crate::propagation::validate_use_from_stage;
use crate::resolver::{resolve_overrides, ResolvedOverrides};
use plan_types::{
    dependency_paths, ArtifactListConfig, ConfigFile, DeploymentStage, DeploymentType,
    EnvironmentGlobalOverride, InfrastructureStepParameters, Manifest, NodeId, PlanCreationResponse,
    PlanError, PlanNode, PlanResult, PlanSerializer, ServiceConfig, ServiceEntityConfig,
    ServiceOverrideConfig, ServicePlan, StepParameters, StepType,
};
use plan_yaml::{YamlField, YamlNode, YamlTree};

/// Assemble the full service plan for a v1 service configuration.
///
/// `service_field` is the yaml anchor of the service node;
/// `service_config` must already be the effective configuration (a
/// propagated service is substituted by [`assemble_stage_plan`] before
/// this is called).
pub fn assemble_service_plan(
    service_field: YamlField<'_>,
    service_config: &ServiceConfig,
    environment_ref: Option<&str>,
    serializer: &dyn PlanSerializer,
    infrastructure: InfrastructureStepParameters,
) -> PlanResult<ServicePlan> {
    service_config.validate_service_source()?;
    let definition = service_config.definition()?;
    let deployment_type = definition.deployment_type;
    let service_node = service_field.node;

    let mut plan = ServicePlan::new();
    let mut spec_children: Vec<NodeId> = Vec::new();

    // artifacts: sidecar leaves → sidecars fork, combined with the
    // primary leaf into the artifacts fork
    if let Some(artifacts) = service_config.effective_artifacts().cloned() {
        let (anchor_id, response) =
            builder::artifacts::add_artifacts_dependency(service_node, service_config, serializer)?;
        plan.put(anchor_id, response);

        let base_path = if service_config.propagates() {
            dependency_paths::STAGE_OVERRIDES_ARTIFACTS
        } else {
            dependency_paths::SERVICE_DEFINITION_ARTIFACTS
        };
        if let Some(fork_id) = add_artifact_nodes(&mut plan, service_node, &artifacts, base_path) {
            spec_children.push(fork_id);
        }
    }

    // manifests: one leaf per manifest, flattened into a single fork
    let manifests = service_config.effective_manifests().to_vec();
    if !manifests.is_empty() {
        let (anchor_id, response) =
            builder::manifests::add_manifests_dependency(service_node, service_config, serializer)?;
        plan.put(anchor_id, response);

        let base_path = if service_config.propagates() {
            dependency_paths::STAGE_OVERRIDES_MANIFESTS
        } else {
            dependency_paths::SERVICE_DEFINITION_MANIFESTS
        };
        if let Some(fork_id) =
            add_manifest_nodes(&mut plan, service_node, &manifests, base_path, true)
        {
            spec_children.push(fork_id);
        }
    }

    // config files: one group leaf
    let config_files = service_config.effective_config_files().to_vec();
    if !config_files.is_empty() {
        let (anchor_id, response) = builder::config_files::add_config_files_dependency(
            service_node,
            service_config,
            serializer,
        )?;
        plan.put(anchor_id, response);
        spec_children.push(add_config_files_node(&mut plan, &config_files));
    }

    // single-valued settings concerns
    let spec = &definition.spec;
    add_settings_leaves(
        &mut plan,
        service_node,
        spec.application_settings.as_ref(),
        false,
        spec.connection_strings.as_ref(),
        false,
        serializer,
        &mut spec_children,
    )?;

    let service_ref = service_config.service_ref.clone();
    finish_chain(
        &mut plan,
        service_node,
        service_ref,
        deployment_type,
        spec_children,
        environment_ref,
        infrastructure,
    );

    tracing::info!(
        nodes = plan.node_count(),
        deployment_type = %deployment_type,
        "service plan assembled"
    );
    Ok(plan)
}

/// Assemble the full service plan for a v2 service entity, resolving the
/// environment-scoped override layers first.
pub fn assemble_service_plan_v2(
    service_field: YamlField<'_>,
    service: &ServiceEntityConfig,
    service_override: Option<&ServiceOverrideConfig>,
    env_override: Option<&EnvironmentGlobalOverride>,
    environment_ref: &str,
    serializer: &dyn PlanSerializer,
    infrastructure: InfrastructureStepParameters,
) -> PlanResult<ServicePlan> {
    let resolved: ResolvedOverrides =
        resolve_overrides(service, service_override, env_override, environment_ref)?;
    let deployment_type = service.service_definition.deployment_type;
    let service_node = service_field.node;

    let mut plan = ServicePlan::new();
    let mut spec_children: Vec<NodeId> = Vec::new();

    if let Some(artifacts) = service
        .service_definition
        .spec
        .artifacts
        .clone()
        .filter(|a| a.has_artifacts())
    {
        let (anchor_id, response) =
            builder::artifacts::add_artifacts_dependency_v2(service_node, service, serializer)?;
        plan.put(anchor_id, response);
        if let Some(fork_id) = add_artifact_nodes(
            &mut plan,
            service_node,
            &artifacts,
            dependency_paths::SERVICE_DEFINITION_ARTIFACTS,
        ) {
            spec_children.push(fork_id);
        }
    }

    if !resolved.manifests.is_empty() {
        let (anchor_id, response) = builder::manifests::add_manifests_dependency_v2(
            service_node,
            service,
            &resolved.manifests,
            resolved.manifests_overridden,
            serializer,
        )?;
        plan.put(anchor_id, response);
        if let Some(fork_id) = add_manifest_nodes(
            &mut plan,
            service_node,
            &resolved.manifests,
            dependency_paths::SERVICE_DEFINITION_MANIFESTS,
            !resolved.manifests_overridden,
        ) {
            spec_children.push(fork_id);
        }
    }

    if !resolved.config_files.is_empty() {
        let (anchor_id, response) = builder::config_files::add_config_files_dependency_v2(
            service_node,
            service,
            &resolved.config_files,
            resolved.config_files_overridden,
            serializer,
        )?;
        plan.put(anchor_id, response);
        spec_children.push(add_config_files_node(&mut plan, &resolved.config_files));
    }

    add_settings_leaves(
        &mut plan,
        service_node,
        resolved.application_settings.as_ref(),
        resolved.application_settings_overridden,
        resolved.connection_strings.as_ref(),
        resolved.connection_strings_overridden,
        serializer,
        &mut spec_children,
    )?;

    finish_chain(
        &mut plan,
        service_node,
        Some(service.identifier.clone()),
        deployment_type,
        spec_children,
        Some(environment_ref),
        infrastructure,
    );

    tracing::info!(
        service_ref = %service.identifier,
        environment_ref,
        nodes = plan.node_count(),
        "service plan assembled from entity"
    );
    Ok(plan)
}

/// Top-level per-stage entry: resolves service propagation against the
/// prior stages, then assembles the service plan.
pub fn assemble_stage_plan(
    stage: &DeploymentStage,
    prior_stages: &[DeploymentStage],
    tree: &YamlTree,
    serializer: &dyn PlanSerializer,
    infrastructure: InfrastructureStepParameters,
) -> PlanResult<ServicePlan> {
    let service = stage
        .service_config()
        .ok_or(PlanError::MissingServiceFields)?;
    service.validate_service_source()?;

    let effective;
    let service_config = if service.propagates() {
        let referenced = validate_use_from_stage(stage, prior_stages)?;
        // the propagated definition is deployed under this stage's own
        // overrides; the useFromStage marker is kept so dependency paths
        // resolve through stage overrides
        effective = ServiceConfig {
            service_ref: None,
            use_from_stage: service.use_from_stage.clone(),
            service_definition: referenced.service_definition.clone(),
            stage_overrides: service.stage_overrides.clone(),
        };
        &effective
    } else {
        service
    };

    let service_field = locate_service_field(tree);
    let plan = assemble_service_plan(
        service_field,
        service_config,
        stage.spec.environment_ref.as_deref(),
        serializer,
        infrastructure,
    )?;

    tracing::info!(stage = %stage.identifier, nodes = plan.node_count(), "stage plan assembled");
    Ok(plan)
}

/// Find the service anchor in a stage yaml tree. Accepts documents rooted
/// at the stage node or wrapped in a `stage:` mapping, with the service
/// under `spec/service` or `spec/serviceConfig`.
fn locate_service_field(tree: &YamlTree) -> YamlField<'_> {
    let stage_node = tree
        .field("stage")
        .map(|field| field.node)
        .unwrap_or_else(|| tree.root());
    let spec_node = stage_node
        .field("spec")
        .map(|field| field.node)
        .unwrap_or(stage_node);
    spec_node
        .field("service")
        .or_else(|| spec_node.field("serviceConfig"))
        .unwrap_or(YamlField {
            name: "service",
            node: spec_node,
        })
}

/// Leaf node ids adopt the yaml subtree identifier when the subtree
/// exists; synthesized leaves get fresh ids.
fn leaf_node_id(service_node: &YamlNode, relative_path: &str) -> NodeId {
    service_node
        .at(relative_path)
        .map(|node| NodeId::new(node.uuid()))
        .unwrap_or_else(NodeId::generate)
}

/// Build artifact leaves and their forks. Returns the artifacts fork id,
/// or `None` when the declaration has no artifacts at all.
fn add_artifact_nodes(
    plan: &mut ServicePlan,
    service_node: &YamlNode,
    artifacts: &ArtifactListConfig,
    base_path: &str,
) -> Option<NodeId> {
    let mut sidecar_ids = Vec::with_capacity(artifacts.sidecars.len());
    for (index, sidecar) in artifacts.sidecars.iter().enumerate() {
        let leaf_id = leaf_node_id(service_node, &format!("{}/sidecars/{}", base_path, index));
        let node = PlanNode::new(
            leaf_id.clone(),
            sidecar.identifier.clone(),
            sidecar.identifier.clone(),
            StepType::Artifact,
            StepParameters::for_sidecar(sidecar),
        );
        attach_node(plan, node);
        sidecar_ids.push(leaf_id);
    }

    let mut outer_children = Vec::new();
    if let Some(primary) = &artifacts.primary {
        let leaf_id = leaf_node_id(service_node, &format!("{}/primary", base_path));
        let node = PlanNode::new(
            leaf_id.clone(),
            "primary",
            "primary",
            StepType::Artifact,
            StepParameters::for_primary(&primary.source),
        );
        attach_node(plan, node);
        outer_children.push(leaf_id);
    }
    if let Some(sidecars_fork) = fork_node(sidecar_ids, "sidecars") {
        outer_children.push(sidecars_fork.uuid.clone());
        attach_node(plan, sidecars_fork);
    }

    let artifacts_fork = fork_node(outer_children, "artifacts")?;
    let fork_id = artifacts_fork.uuid.clone();
    attach_node(plan, artifacts_fork);
    Some(fork_id)
}

/// Build manifest leaves and their flat fork. Leaves anchored in the yaml
/// keep the subtree identifiers only while the list is verbatim.
fn add_manifest_nodes(
    plan: &mut ServicePlan,
    service_node: &YamlNode,
    manifests: &[Manifest],
    base_path: &str,
    anchored: bool,
) -> Option<NodeId> {
    let mut manifest_ids = Vec::with_capacity(manifests.len());
    for (index, manifest) in manifests.iter().enumerate() {
        let leaf_id = if anchored {
            leaf_node_id(service_node, &format!("{}/{}", base_path, index))
        } else {
            NodeId::generate()
        };
        let node = PlanNode::new(
            leaf_id.clone(),
            manifest.identifier.clone(),
            manifest.identifier.clone(),
            StepType::Manifest,
            StepParameters::Manifest {
                manifest: manifest.clone(),
            },
        );
        attach_node(plan, node);
        manifest_ids.push(leaf_id);
    }

    let manifests_fork = fork_node(manifest_ids, "manifests")?;
    let fork_id = manifests_fork.uuid.clone();
    attach_node(plan, manifests_fork);
    Some(fork_id)
}

/// The config-file group is one leaf node, attached directly
fn add_config_files_node(plan: &mut ServicePlan, config_files: &[ConfigFile]) -> NodeId {
    let leaf_id = NodeId::generate();
    let node = PlanNode::new(
        leaf_id.clone(),
        "configFiles",
        "configFiles",
        StepType::ConfigFiles,
        StepParameters::ConfigFiles {
            config_files: config_files.to_vec(),
        },
    );
    attach_node(plan, node);
    leaf_id
}

/// Register the single-valued settings concerns: dependency entry plus a
/// leaf node under the same anchor id, attached directly to the spec node.
#[allow(clippy::too_many_arguments)]
fn add_settings_leaves(
    plan: &mut ServicePlan,
    service_node: &YamlNode,
    application_settings: Option<&plan_types::ApplicationSettings>,
    application_settings_overridden: bool,
    connection_strings: Option<&plan_types::ConnectionStrings>,
    connection_strings_overridden: bool,
    serializer: &dyn PlanSerializer,
    spec_children: &mut Vec<NodeId>,
) -> PlanResult<()> {
    if let Some(settings) = application_settings {
        if let Some((anchor_id, response)) = builder::settings::add_application_settings_dependency(
            service_node,
            Some(settings),
            application_settings_overridden,
            serializer,
        )? {
            plan.put(anchor_id.clone(), response);
            attach_node(
                plan,
                PlanNode::new(
                    anchor_id.clone(),
                    "applicationSettings",
                    "applicationSettings",
                    StepType::ApplicationSettings,
                    StepParameters::ApplicationSettings {
                        settings: settings.clone(),
                    },
                ),
            );
            spec_children.push(anchor_id);
        }
    }
    if let Some(strings) = connection_strings {
        if let Some((anchor_id, response)) = builder::settings::add_connection_strings_dependency(
            service_node,
            Some(strings),
            connection_strings_overridden,
            serializer,
        )? {
            plan.put(anchor_id.clone(), response);
            attach_node(
                plan,
                PlanNode::new(
                    anchor_id.clone(),
                    "connectionStrings",
                    "connectionStrings",
                    StepType::ConnectionStrings,
                    StepParameters::ConnectionStrings {
                        strings: strings.clone(),
                    },
                ),
            );
            spec_children.push(anchor_id);
        }
    }
    Ok(())
}

/// Attach a node to the plan, or fold it into an existing dependency-only
/// response registered under the same id.
fn attach_node(plan: &mut ServicePlan, node: PlanNode) {
    let id = node.uuid.clone();
    if let Some(existing) = plan.responses.get_mut(&id) {
        if existing.node.is_none() {
            existing.node = Some(node);
        }
        return;
    }
    plan.put(id, PlanCreationResponse::for_node(node));
}

/// Chain the service nodes and record the starting node id
fn finish_chain(
    plan: &mut ServicePlan,
    service_node: &YamlNode,
    service_ref: Option<String>,
    deployment_type: DeploymentType,
    spec_children: Vec<NodeId>,
    environment_ref: Option<&str>,
    infrastructure: InfrastructureStepParameters,
) {
    let service_spec_id = NodeId::generate();
    attach_node(
        plan,
        PlanNode::new(
            service_spec_id.clone(),
            "serviceSpec",
            "serviceSpec",
            StepType::ServiceSpec,
            StepParameters::ServiceSpec {
                child_node_ids: spec_children,
            },
        ),
    );

    let environment_id = NodeId::generate();
    attach_node(
        plan,
        PlanNode::new(
            environment_id.clone(),
            "environment",
            environment_ref.unwrap_or("environment"),
            StepType::Environment,
            StepParameters::Environment {
                environment_ref: environment_ref.map(str::to_string),
                infrastructure,
            },
        ),
    );

    let service_definition_id = NodeId::generate();
    attach_node(
        plan,
        PlanNode::new(
            service_definition_id.clone(),
            "serviceDefinition",
            "serviceDefinition",
            StepType::ServiceDefinition,
            StepParameters::ServiceDefinition {
                deployment_type,
                child_node_ids: vec![service_spec_id, environment_id],
            },
        ),
    );

    let service_id = NodeId::generate();
    let service_name = service_ref.clone().unwrap_or_else(|| "service".to_string());
    attach_node(
        plan,
        PlanNode::new(
            service_id.clone(),
            "service",
            service_name,
            StepType::Service,
            StepParameters::Service {
                service_ref,
                deployment_type,
                child_node_id: service_definition_id,
            },
        ),
    );

    let service_config_id = NodeId::new(service_node.uuid());
    attach_node(
        plan,
        PlanNode::new(
            service_config_id.clone(),
            "serviceConfig",
            "serviceConfig",
            StepType::ServiceConfig,
            StepParameters::ServiceConfig {
                child_node_id: service_id,
            },
        ),
    );

    plan.starting_node_id = Some(service_config_id);
}
