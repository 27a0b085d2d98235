//! EC2 API seam
//!
//! Trait over the handful of remote operations the resource collection
//! needs, so tests can substitute a recording fake for the real `aws` CLI.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Ec2Api: Send + Sync {
    /// Register an OpenSSH public key under `name` in `region`, returning
    /// the provider-assigned key pair id.
    async fn import_key_pair(&self, region: &str, name: &str, public_key: &str) -> Result<String>;

    /// Delete a registered key pair. Returns [`AwsError::KeyPairNotFound`]
    /// when the key pair is already absent.
    ///
    /// [`AwsError::KeyPairNotFound`]: crate::error::AwsError::KeyPairNotFound
    async fn delete_key_pair(&self, region: &str, name: &str) -> Result<()>;

    /// Resolve the machine image fixtures should boot in `region`.
    async fn resolve_ami(&self, region: &str) -> Result<String>;
}
