//! End-to-end plan assembly scenarios

use plan_assembly::wiring::{
    assemble_service_plan, assemble_service_plan_v2, assemble_stage_plan,
};
use plan_types::{
    ArtifactListConfig, ArtifactSource, DeploymentStage, DeploymentType,
    EnvironmentGlobalOverride, InfrastructureStepParameters, JsonSerializer, Manifest,
    ManifestKind, NodeId, PrimaryArtifact, ServiceConfig, ServiceDefinition,
    ServiceEntityConfig, ServiceOverrideConfig, ServicePlan, ServiceSpec, SidecarArtifact,
    StageOverridesConfig, StageSpec, StepParameters, StepType, UseFromStage,
};
use plan_yaml::{YamlField, YamlTree};

const STAGE_YAML: &str = r#"
spec:
  service:
    serviceRef: web
    serviceDefinition:
      type: Kubernetes
      spec:
        artifacts:
          primary:
            source:
              type: DockerRegistry
              connectorRef: dockerhub
              imagePath: library/nginx
          sidecars:
            - identifier: envoy
              source:
                type: DockerRegistry
                connectorRef: dockerhub
                imagePath: envoyproxy/envoy
            - identifier: logshipper
              source:
                type: DockerRegistry
                connectorRef: dockerhub
                imagePath: fluent/fluent-bit
        manifests:
          - identifier: k8s_base
            type: K8sManifest
          - identifier: values_dev
            type: Values
          - identifier: values_common
            type: Values
"#;

fn full_service_config() -> ServiceConfig {
    ServiceConfig {
        service_ref: Some("web".into()),
        service_definition: Some(ServiceDefinition::new(
            DeploymentType::Kubernetes,
            ServiceSpec {
                artifacts: Some(ArtifactListConfig {
                    primary: Some(PrimaryArtifact {
                        source: ArtifactSource::docker("dockerhub", "library/nginx"),
                    }),
                    sidecars: vec![
                        SidecarArtifact {
                            identifier: "envoy".into(),
                            source: ArtifactSource::docker("dockerhub", "envoyproxy/envoy"),
                        },
                        SidecarArtifact {
                            identifier: "logshipper".into(),
                            source: ArtifactSource::docker("dockerhub", "fluent/fluent-bit"),
                        },
                    ],
                }),
                manifests: vec![
                    Manifest::new("k8s_base", ManifestKind::K8sManifest),
                    Manifest::new("values_dev", ManifestKind::Values),
                    Manifest::new("values_common", ManifestKind::Values),
                ],
                ..ServiceSpec::default()
            },
        )),
        ..ServiceConfig::default()
    }
}

fn single_service_stage(id: &str, service: ServiceConfig) -> DeploymentStage {
    DeploymentStage::new(
        id,
        StageSpec {
            service: Some(service),
            environment_ref: Some("dev".into()),
            ..StageSpec::default()
        },
    )
}

fn fork_children<'a>(plan: &'a ServicePlan, identifier: &str) -> &'a [NodeId] {
    let fork = plan
        .nodes()
        .find(|n| n.step_type == StepType::Fork && n.identifier == identifier)
        .unwrap_or_else(|| panic!("no {} fork in plan", identifier));
    match &fork.step_parameters {
        StepParameters::Fork { parallel_node_ids } => parallel_node_ids,
        other => panic!("fork carries unexpected parameters: {:?}", other),
    }
}

#[test]
fn graph_shape_for_full_service() {
    let tree = YamlTree::parse(STAGE_YAML).unwrap();
    let stage = single_service_stage("deploy", full_service_config());

    let plan = assemble_stage_plan(
        &stage,
        &[],
        &tree,
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap();

    // 3 artifact leaves, sidecars fork, artifacts fork, 3 manifest
    // leaves, manifests fork, and the five chain nodes
    assert_eq!(plan.node_count(), 14);

    let artifact_leaves = plan
        .nodes()
        .filter(|n| n.step_type == StepType::Artifact)
        .count();
    assert_eq!(artifact_leaves, 3);
    let manifest_leaves = plan
        .nodes()
        .filter(|n| n.step_type == StepType::Manifest)
        .count();
    assert_eq!(manifest_leaves, 3);

    assert_eq!(fork_children(&plan, "sidecars").len(), 2);
    assert_eq!(fork_children(&plan, "manifests").len(), 3);

    // the artifacts fork combines the primary leaf with the sidecars fork
    let artifacts_children = fork_children(&plan, "artifacts");
    assert_eq!(artifacts_children.len(), 2);
    let primary = plan
        .nodes()
        .find(|n| n.identifier == "primary")
        .unwrap();
    assert_eq!(artifacts_children[0], primary.uuid);

    // starting node is the service-config node anchored at the yaml node
    let service_yaml_uuid = tree.root().at("spec/service").unwrap().uuid();
    let starting = plan.starting_node_id.clone().unwrap();
    assert_eq!(starting.as_str(), service_yaml_uuid);
    assert_eq!(plan.node(&starting).unwrap().step_type, StepType::ServiceConfig);
}

#[test]
fn chain_children_are_stored_on_parents() {
    let tree = YamlTree::parse(STAGE_YAML).unwrap();
    let stage = single_service_stage("deploy", full_service_config());
    let plan = assemble_stage_plan(
        &stage,
        &[],
        &tree,
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap();

    // walk the chain from the starting node down to the forks
    let start = plan.node(plan.starting_node_id.as_ref().unwrap()).unwrap();
    let service_id = match &start.step_parameters {
        StepParameters::ServiceConfig { child_node_id } => child_node_id,
        other => panic!("unexpected start parameters: {:?}", other),
    };
    let service = plan.node(service_id).unwrap();
    assert_eq!(service.step_type, StepType::Service);

    let definition_id = match &service.step_parameters {
        StepParameters::Service { child_node_id, .. } => child_node_id,
        other => panic!("unexpected service parameters: {:?}", other),
    };
    let definition = plan.node(definition_id).unwrap();
    let definition_children = match &definition.step_parameters {
        StepParameters::ServiceDefinition { child_node_ids, .. } => child_node_ids,
        other => panic!("unexpected definition parameters: {:?}", other),
    };
    assert_eq!(definition_children.len(), 2);

    let spec_node = plan.node(&definition_children[0]).unwrap();
    assert_eq!(spec_node.step_type, StepType::ServiceSpec);
    let environment = plan.node(&definition_children[1]).unwrap();
    assert_eq!(environment.step_type, StepType::Environment);

    // the spec node references the two forks, artifacts first
    let spec_children = match &spec_node.step_parameters {
        StepParameters::ServiceSpec { child_node_ids } => child_node_ids,
        other => panic!("unexpected spec parameters: {:?}", other),
    };
    assert_eq!(spec_children.len(), 2);
    assert_eq!(plan.node(&spec_children[0]).unwrap().identifier, "artifacts");
    assert_eq!(plan.node(&spec_children[1]).unwrap().identifier, "manifests");
}

#[test]
fn reassembly_from_the_same_tree_is_isomorphic() {
    let tree = YamlTree::parse(STAGE_YAML).unwrap();
    let stage = single_service_stage("deploy", full_service_config());

    let assemble = || {
        assemble_stage_plan(
            &stage,
            &[],
            &tree,
            &JsonSerializer,
            InfrastructureStepParameters::default(),
        )
        .unwrap()
    };
    let first = assemble();
    let second = assemble();

    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.starting_node_id, second.starting_node_id);

    // identical dependency paths
    let paths = |plan: &ServicePlan| -> Vec<String> {
        let mut paths: Vec<String> = plan.all_dependencies().paths.values().cloned().collect();
        paths.sort();
        paths
    };
    assert_eq!(paths(&first), paths(&second));

    // identical metadata key sets per dependency
    let key_sets = |plan: &ServicePlan| -> Vec<Vec<String>> {
        plan.all_dependencies()
            .metadata
            .values()
            .map(|m| {
                let mut keys: Vec<String> = m.keys().cloned().collect();
                keys.sort();
                keys
            })
            .collect()
    };
    assert_eq!(key_sets(&first), key_sets(&second));

    // identical fork groupings
    for fork in ["sidecars", "artifacts", "manifests"] {
        assert_eq!(
            fork_children(&first, fork).len(),
            fork_children(&second, fork).len()
        );
    }
}

#[test]
fn propagated_service_resolves_through_stage_overrides() {
    let propagating_yaml = "spec:\n  service:\n    useFromStage:\n      stage: stage0\n";
    let tree = YamlTree::parse(propagating_yaml).unwrap();

    let prior = vec![single_service_stage("stage0", full_service_config())];
    let stage = DeploymentStage::new(
        "stage1",
        StageSpec {
            service: Some(ServiceConfig {
                use_from_stage: Some(UseFromStage {
                    stage: "stage0".into(),
                }),
                stage_overrides: Some(StageOverridesConfig {
                    manifests: vec![Manifest::new("values_stage1", ManifestKind::Values)],
                    ..StageOverridesConfig::default()
                }),
                ..ServiceConfig::default()
            }),
            environment_ref: Some("qa".into()),
            ..StageSpec::default()
        },
    );

    let plan = assemble_stage_plan(
        &stage,
        &prior,
        &tree,
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap();

    // dependency paths flip to stage overrides for the propagated service
    let dependencies = plan.all_dependencies();
    let paths: Vec<&str> = dependencies.paths.values().map(String::as_str).collect();
    assert!(paths.contains(&"stageOverrides/artifacts"));
    assert!(paths.contains(&"stageOverrides/manifests"));

    // no stageOverrides subtree exists in the yaml, so patches carry the
    // effective values
    let updates = plan.all_yaml_updates();
    assert!(updates.contains_key("spec/service/stageOverrides/manifests"));
    let patch = updates.get("spec/service/stageOverrides/manifests").unwrap();
    assert!(patch.contains("values_stage1"));

    // the stage-override manifest replaces the source's list outright
    assert_eq!(fork_children(&plan, "manifests").len(), 1);
}

#[test]
fn propagation_failures_abort_the_whole_stage() {
    let tree = YamlTree::parse("spec:\n  service:\n    useFromStage:\n      stage: stage0\n").unwrap();

    // deployment type mismatch, both sides named in the message
    let mut helm_service = full_service_config();
    helm_service.service_definition = Some(ServiceDefinition::new(
        DeploymentType::NativeHelm,
        ServiceSpec::default(),
    ));
    let prior = vec![single_service_stage("stage0", helm_service)];
    let stage = DeploymentStage::new(
        "stage1",
        StageSpec {
            deployment_type: Some(DeploymentType::Kubernetes),
            service: Some(ServiceConfig {
                use_from_stage: Some(UseFromStage {
                    stage: "stage0".into(),
                }),
                ..ServiceConfig::default()
            }),
            ..StageSpec::default()
        },
    );

    let err = assemble_stage_plan(
        &stage,
        &prior,
        &tree,
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Deployment type [Kubernetes] of stage [stage1] does not match deployment type [NativeHelm] of stage [stage0] from which service propagation is configured."
    );
}

#[test]
fn v2_entity_plan_merges_override_layers() {
    let service_yaml = r#"
serviceDefinition:
  type: Kubernetes
  spec:
    manifests:
      - identifier: A
        type: Values
      - identifier: B
        type: Values
"#;
    let tree = YamlTree::parse(service_yaml).unwrap();
    let service_field = YamlField {
        name: "service",
        node: tree.root(),
    };

    let entity = ServiceEntityConfig::new(
        "web",
        ServiceDefinition::new(
            DeploymentType::Kubernetes,
            ServiceSpec {
                manifests: vec![
                    Manifest::new("A", ManifestKind::Values),
                    Manifest::new("B", ManifestKind::Values),
                ],
                ..ServiceSpec::default()
            },
        ),
    );
    let env_override = EnvironmentGlobalOverride {
        manifests: vec![Manifest::new("C", ManifestKind::Values)],
        ..EnvironmentGlobalOverride::default()
    };
    let svc_override = ServiceOverrideConfig {
        manifests: vec![Manifest::new("B", ManifestKind::TasVars)],
        ..ServiceOverrideConfig::new("web", "dev")
    };

    let plan = assemble_service_plan_v2(
        service_field,
        &entity,
        Some(&svc_override),
        Some(&env_override),
        "dev",
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap();

    // merged order: environment entry, replaced service entry, base rest
    let leaf_identifiers: Vec<&str> = plan
        .nodes()
        .filter(|n| n.step_type == StepType::Manifest)
        .map(|n| n.identifier.as_str())
        .collect();
    assert_eq!(leaf_identifiers, vec!["C", "B", "A"]);
    assert_eq!(fork_children(&plan, "manifests").len(), 3);

    // merged metadata carries the manifest list and the deployment type
    let dependencies = plan.all_dependencies();
    let manifests_anchor = dependencies
        .paths
        .iter()
        .find(|(_, path)| path.as_str() == "serviceDefinition/spec/manifests")
        .map(|(id, _)| id.clone())
        .unwrap();
    let metadata = dependencies.metadata.get(&manifests_anchor).unwrap();
    let mut keys: Vec<&str> = metadata.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["manifestListConfig", "serviceDefinitionType", "uuid"]);

    // the merged list diverges from the yaml, so it is patched back
    let updates = plan.all_yaml_updates();
    let patch = updates.get("serviceDefinition/spec/manifests").unwrap();
    assert!(patch.contains("identifier: C"));

    // manifests only: 3 leaves + fork + the five chain nodes
    assert_eq!(plan.node_count(), 9);
}

#[test]
fn v2_rejects_base_kind_in_override_before_building_any_node() {
    let tree = YamlTree::parse("serviceDefinition:\n  type: Kubernetes\n").unwrap();
    let service_field = YamlField {
        name: "service",
        node: tree.root(),
    };
    let entity = ServiceEntityConfig::new(
        "web",
        ServiceDefinition::new(DeploymentType::Kubernetes, ServiceSpec::default()),
    );
    let svc_override = ServiceOverrideConfig {
        manifests: vec![Manifest::new("full", ManifestKind::K8sManifest)],
        ..ServiceOverrideConfig::new("web", "dev")
    };

    let err = assemble_service_plan_v2(
        service_field,
        &entity,
        Some(&svc_override),
        None,
        "dev",
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported manifest types: [K8sManifest] found in service overrides."
    );
}

#[test]
fn serializer_bytes_pass_through_opaquely() {
    use plan_types::{MetadataValue, PlanSerializer, SerializeError};

    struct StubSerializer;
    impl PlanSerializer for StubSerializer {
        fn serialize(&self, _value: &MetadataValue) -> Result<Vec<u8>, SerializeError> {
            Ok(b"blob".to_vec())
        }
    }

    let tree = YamlTree::parse(STAGE_YAML).unwrap();
    let stage = single_service_stage("deploy", full_service_config());
    let plan = assemble_stage_plan(
        &stage,
        &[],
        &tree,
        &StubSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap();

    // whatever the injected serializer produces is carried verbatim
    let dependencies = plan.all_dependencies();
    assert!(!dependencies.metadata.is_empty());
    for metadata in dependencies.metadata.values() {
        for bytes in metadata.values() {
            assert_eq!(bytes, b"blob");
        }
    }
}

#[test]
fn dependency_only_entries_are_not_plan_nodes() {
    let tree = YamlTree::parse(STAGE_YAML).unwrap();
    let stage = single_service_stage("deploy", full_service_config());
    let plan = assemble_stage_plan(
        &stage,
        &[],
        &tree,
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap();

    // the artifacts and manifests concerns register dependency-only
    // entries alongside the 14 plan nodes
    assert_eq!(plan.responses.len(), 16);
    assert_eq!(plan.node_count(), 14);
}

#[test]
fn service_plan_requires_a_service_source() {
    let tree = YamlTree::parse("serviceRef: web\n").unwrap();
    let service_field = YamlField {
        name: "service",
        node: tree.root(),
    };

    let err = assemble_service_plan(
        service_field,
        &ServiceConfig::default(),
        None,
        &JsonSerializer,
        InfrastructureStepParameters::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "At least one of serviceRef and useFromStage fields is required."
    );
}
