//! Application settings and connection strings
//!
//! Both are single-valued, store-backed settings files. Unlike the
//! collection concerns there is no merging: the highest-precedence layer
//! that supplies one wins outright.

use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};

/// An application-settings file attached to a service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSettings {
    pub store: StoreConfig,
}

/// A connection-strings file attached to a service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStrings {
    pub store: StoreConfig,
}
