//! Manifest configuration
//!
//! Manifest identity, for merge and duplicate validation, is the
//! `identifier` field alone. Override layers may only carry values-style
//! kinds; a base kind (a full manifest definition) appearing in an override
//! layer is a validation error.

use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a manifest entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManifestKind {
    K8sManifest,
    HelmChart,
    Kustomize,
    OpenshiftTemplate,
    Values,
    KustomizePatches,
    OpenshiftParams,
    HelmRepoOverride,
    TasVars,
    TasAutoscaler,
}

impl ManifestKind {
    /// Whether this kind may appear inside an override layer.
    ///
    /// Only values-style kinds are permitted there; full manifest
    /// definitions must live in the service definition.
    pub fn allowed_in_overrides(&self) -> bool {
        matches!(
            self,
            ManifestKind::Values
                | ManifestKind::KustomizePatches
                | ManifestKind::OpenshiftParams
                | ManifestKind::HelmRepoOverride
                | ManifestKind::TasVars
                | ManifestKind::TasAutoscaler
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKind::K8sManifest => "K8sManifest",
            ManifestKind::HelmChart => "HelmChart",
            ManifestKind::Kustomize => "Kustomize",
            ManifestKind::OpenshiftTemplate => "OpenshiftTemplate",
            ManifestKind::Values => "Values",
            ManifestKind::KustomizePatches => "KustomizePatches",
            ManifestKind::OpenshiftParams => "OpenshiftParams",
            ManifestKind::HelmRepoOverride => "HelmRepoOverride",
            ManifestKind::TasVars => "TasVars",
            ManifestKind::TasAutoscaler => "TasAutoscaler",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One manifest entry in a service definition or override layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: ManifestKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
}

impl Manifest {
    pub fn new(identifier: impl Into<String>, kind: ManifestKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            store: None,
        }
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = Some(store);
        self
    }
}
