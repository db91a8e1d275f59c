//! Override resolution
//!
//! Merges the v2 entity model's three configuration layers — service
//! definition, environment global override, per-service override — into
//! one collection per concern. Pure function over its inputs.
//!
//! Merge rule per collection concern: an ordered map keyed by identifier.
//! Environment-global entries go in first, then service-override entries;
//! a service entry sharing an identifier with an environment entry
//! replaces its content but keeps the earlier position. Base
//! service-definition entries not superseded are appended last. When both
//! override layers are empty the base list is returned verbatim.
//!
//! Single-valued concerns (application settings, connection strings) do
//! not merge: service override wins over environment global, which wins
//! over the service definition's own value.

use indexmap::IndexMap;
use plan_types::{
    ApplicationSettings, ConfigFile, ConnectionStrings, EnvironmentGlobalOverride, Manifest,
    OverrideConcern, OverrideLayer, PlanError, PlanResult, ServiceEntityConfig,
    ServiceOverrideConfig,
};

/// The outcome of resolving all override layers for one service in one
/// environment. `*_overridden` flags record whether an override layer
/// contributed to the value, which drives yaml-patch emission downstream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedOverrides {
    pub manifests: Vec<Manifest>,
    pub manifests_overridden: bool,
    pub config_files: Vec<ConfigFile>,
    pub config_files_overridden: bool,
    pub application_settings: Option<ApplicationSettings>,
    pub application_settings_overridden: bool,
    pub connection_strings: Option<ConnectionStrings>,
    pub connection_strings_overridden: bool,
}

/// Resolve every concern for `service` deployed into `environment_ref`.
///
/// Override objects may be absent or entirely empty; both mean "no
/// override". Validation failures name the offending identifiers or
/// kinds and the layer they were found in.
pub fn resolve_overrides(
    service: &ServiceEntityConfig,
    service_override: Option<&ServiceOverrideConfig>,
    env_override: Option<&EnvironmentGlobalOverride>,
    environment_ref: &str,
) -> PlanResult<ResolvedOverrides> {
    let service_ref = service.identifier.as_str();
    let spec = &service.service_definition.spec;

    let svc_manifests = service_override.map(|o| o.manifests.as_slice()).unwrap_or_default();
    let env_manifests = env_override.map(|o| o.manifests.as_slice()).unwrap_or_default();
    let svc_files = service_override.map(|o| o.config_files.as_slice()).unwrap_or_default();
    let env_files = env_override.map(|o| o.config_files.as_slice()).unwrap_or_default();

    validate_manifest_layer(svc_manifests, OverrideLayer::ServiceOverrides, service_ref, environment_ref)?;
    validate_manifest_layer(
        env_manifests,
        OverrideLayer::EnvironmentGlobalOverrides,
        service_ref,
        environment_ref,
    )?;
    validate_config_file_layer(svc_files, OverrideLayer::ServiceOverrides, service_ref, environment_ref)?;
    validate_config_file_layer(
        env_files,
        OverrideLayer::EnvironmentGlobalOverrides,
        service_ref,
        environment_ref,
    )?;

    let (manifests, manifests_overridden) =
        merge_by_identifier(&spec.manifests, env_manifests, svc_manifests, |m: &Manifest| {
            m.identifier.as_str()
        });
    let (config_files, config_files_overridden) =
        merge_by_identifier(&spec.config_files, env_files, svc_files, |f: &ConfigFile| {
            f.identifier.as_str()
        });

    let (application_settings, application_settings_overridden) = pick_single(
        spec.application_settings.as_ref(),
        env_override.and_then(|o| o.application_settings.as_ref()),
        service_override.and_then(|o| o.application_settings.as_ref()),
    );
    let (connection_strings, connection_strings_overridden) = pick_single(
        spec.connection_strings.as_ref(),
        env_override.and_then(|o| o.connection_strings.as_ref()),
        service_override.and_then(|o| o.connection_strings.as_ref()),
    );

    tracing::debug!(
        service_ref,
        environment_ref,
        manifests = manifests.len(),
        config_files = config_files.len(),
        "resolved override layers"
    );

    Ok(ResolvedOverrides {
        manifests,
        manifests_overridden,
        config_files,
        config_files_overridden,
        application_settings,
        application_settings_overridden,
        connection_strings,
        connection_strings_overridden,
    })
}

/// Merge one collection concern. Returns the merged list and whether any
/// override layer contributed.
fn merge_by_identifier<T: Clone>(
    base: &[T],
    env_layer: &[T],
    svc_layer: &[T],
    identifier: impl Fn(&T) -> &str,
) -> (Vec<T>, bool) {
    if env_layer.is_empty() && svc_layer.is_empty() {
        return (base.to_vec(), false);
    }

    let mut merged: IndexMap<String, T> = IndexMap::new();
    for entry in env_layer {
        merged.insert(identifier(entry).to_string(), entry.clone());
    }
    for entry in svc_layer {
        // insert on an existing key replaces content but keeps position
        merged.insert(identifier(entry).to_string(), entry.clone());
    }
    for entry in base {
        let id = identifier(entry);
        if !merged.contains_key(id) {
            merged.insert(id.to_string(), entry.clone());
        }
    }

    (merged.into_values().collect(), true)
}

/// Single-valued concern precedence: service override > environment global
/// > service definition. The flag is true when an override layer won.
fn pick_single<T: Clone>(
    base: Option<&T>,
    env_layer: Option<&T>,
    svc_layer: Option<&T>,
) -> (Option<T>, bool) {
    if let Some(value) = svc_layer {
        return (Some(value.clone()), true);
    }
    if let Some(value) = env_layer {
        return (Some(value.clone()), true);
    }
    (base.cloned(), false)
}

fn validate_manifest_layer(
    entries: &[Manifest],
    layer: OverrideLayer,
    service_ref: &str,
    environment_ref: &str,
) -> PlanResult<()> {
    let disallowed: Vec<String> = entries
        .iter()
        .filter(|m| !m.kind.allowed_in_overrides())
        .map(|m| m.kind.as_str().to_string())
        .collect();
    if !disallowed.is_empty() {
        return Err(PlanError::UnsupportedManifestKinds {
            kinds: dedup_preserving_order(disallowed),
            layer,
        });
    }

    let duplicates = duplicate_identifiers(entries.iter().map(|m| m.identifier.as_str()));
    if !duplicates.is_empty() {
        return Err(PlanError::DuplicateOverrideIdentifiers {
            concern: OverrideConcern::Manifest,
            identifiers: duplicates,
            layer,
            service_ref: service_ref.to_string(),
            environment_ref: environment_ref.to_string(),
        });
    }
    Ok(())
}

fn validate_config_file_layer(
    entries: &[ConfigFile],
    layer: OverrideLayer,
    service_ref: &str,
    environment_ref: &str,
) -> PlanResult<()> {
    let duplicates = duplicate_identifiers(entries.iter().map(|f| f.identifier.as_str()));
    if !duplicates.is_empty() {
        return Err(PlanError::DuplicateOverrideIdentifiers {
            concern: OverrideConcern::ConfigFile,
            identifiers: duplicates,
            layer,
            service_ref: service_ref.to_string(),
            environment_ref: environment_ref.to_string(),
        });
    }
    Ok(())
}

/// Identifiers appearing more than once, in first-occurrence order
fn duplicate_identifiers<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.to_string())
        .collect()
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = IndexMap::new();
    for value in values {
        seen.entry(value).or_insert(());
    }
    seen.into_keys().collect()
}
