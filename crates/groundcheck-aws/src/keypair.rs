//! EC2 key pair generation

use crate::error::Result;
use ssh_key::{Algorithm, LineEnding, PrivateKey};

/// A generated SSH key pair, registered with EC2 under `name`.
///
/// The private key lives in memory only and is never written to disk.
#[derive(Debug, Clone)]
pub struct Ec2KeyPair {
    pub name: String,
    /// OpenSSH `authorized_keys` form, as uploaded to EC2.
    pub public_key: String,
    private_key: String,
}

impl Ec2KeyPair {
    /// Generate a fresh Ed25519 key pair named `name`.
    pub fn generate(name: impl Into<String>) -> Result<Self> {
        let private = PrivateKey::random(&mut rand::rngs::OsRng, Algorithm::Ed25519)?;
        let public_key = private.public_key().to_openssh()?;
        let private_key = private.to_openssh(LineEnding::LF)?.to_string();

        Ok(Self {
            name: name.into(),
            public_key,
            private_key,
        })
    }

    /// OpenSSH-encoded private key, e.g. for connecting to an instance a
    /// fixture started.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}
