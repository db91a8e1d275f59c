//! Config file configuration
//!
//! Identity for merge and duplicate validation is the `identifier` field.

use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};

/// One config file entry in a service definition or override layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub identifier: String,
    pub store: StoreConfig,
}

impl ConfigFile {
    pub fn new(identifier: impl Into<String>, store: StoreConfig) -> Self {
        Self {
            identifier: identifier.into(),
            store,
        }
    }
}
