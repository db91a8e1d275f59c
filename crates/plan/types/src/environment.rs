//! Environment-scoped override models (v2 entity model)
//!
//! Environment global overrides apply to every service deployed into the
//! environment; service overrides apply to one (service, environment)
//! pair and take precedence over the globals.

use crate::config_file::ConfigFile;
use crate::manifest::Manifest;
use crate::settings::{ApplicationSettings, ConnectionStrings};
use serde::{Deserialize, Serialize};

/// Defaults an environment imposes on every service deployed into it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentGlobalOverride {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<Manifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_files: Vec<ConfigFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_settings: Option<ApplicationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strings: Option<ConnectionStrings>,
}

impl EnvironmentGlobalOverride {
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
            && self.config_files.is_empty()
            && self.application_settings.is_none()
            && self.connection_strings.is_none()
    }
}

/// Overrides for one (service, environment) pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOverrideConfig {
    pub service_ref: String,
    pub environment_ref: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifests: Vec<Manifest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_files: Vec<ConfigFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_settings: Option<ApplicationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strings: Option<ConnectionStrings>,
}

impl ServiceOverrideConfig {
    pub fn new(service_ref: impl Into<String>, environment_ref: impl Into<String>) -> Self {
        Self {
            service_ref: service_ref.into(),
            environment_ref: environment_ref.into(),
            manifests: Vec::new(),
            config_files: Vec::new(),
            application_settings: None,
            connection_strings: None,
        }
    }
}
