//! AWS provisioning error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install the AWS CLI v2")]
    AwsCliNotFound,

    #[error("AWS authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("aws command failed: {0}")]
    CommandFailed(String),

    #[error("key pair not found: {0}")]
    KeyPairNotFound(String),

    #[error("no matching AMI found in {0}")]
    ImageNotFound(String),

    #[error("key pair generation failed: {0}")]
    KeyGeneration(#[from] ssh_key::Error),

    #[error("failed to provision {resource}: {reason}")]
    ProvisioningFailed { resource: String, reason: String },

    #[error("failed to tear down test resources: {0}")]
    TeardownFailed(String),

    #[error("region pool is empty")]
    EmptyRegionPool,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AwsError>;
