//! Deployment types recognized by graph wiring
//!
//! The registry is a closed enum: a stage whose deployment type is not one
//! of these kinds fails at parse time, before any graph is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The deployment flavor of a service definition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentType {
    Kubernetes,
    Ssh,
    WinRm,
    NativeHelm,
    ServerlessAwsLambda,
    AzureWebApp,
    #[serde(rename = "ECS")]
    Ecs,
    CustomDeployment,
    Elastigroup,
    #[serde(rename = "TAS")]
    Tas,
    Asg,
}

impl DeploymentType {
    /// Every kind the plan assembler knows how to wire
    pub const ALL: [DeploymentType; 11] = [
        DeploymentType::Kubernetes,
        DeploymentType::Ssh,
        DeploymentType::WinRm,
        DeploymentType::NativeHelm,
        DeploymentType::ServerlessAwsLambda,
        DeploymentType::AzureWebApp,
        DeploymentType::Ecs,
        DeploymentType::CustomDeployment,
        DeploymentType::Elastigroup,
        DeploymentType::Tas,
        DeploymentType::Asg,
    ];

    /// Wire spelling, as authored in stage YAML
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentType::Kubernetes => "Kubernetes",
            DeploymentType::Ssh => "Ssh",
            DeploymentType::WinRm => "WinRm",
            DeploymentType::NativeHelm => "NativeHelm",
            DeploymentType::ServerlessAwsLambda => "ServerlessAwsLambda",
            DeploymentType::AzureWebApp => "AzureWebApp",
            DeploymentType::Ecs => "ECS",
            DeploymentType::CustomDeployment => "CustomDeployment",
            DeploymentType::Elastigroup => "Elastigroup",
            DeploymentType::Tas => "TAS",
            DeploymentType::Asg => "Asg",
        }
    }

    /// Look up a kind by its wire spelling
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
