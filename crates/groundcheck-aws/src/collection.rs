//! Random test-resource collection
//!
//! Bundles the ephemeral AWS prerequisites one test run needs: a randomly
//! chosen region, a registered key pair, a unique id, and a resolved AMI.
//! Creation is all-or-nothing; teardown is idempotent.

use crate::api::Ec2Api;
use crate::error::{AwsError, Result};
use crate::keypair::Ec2KeyPair;
use crate::region::{SUPPORTED_REGIONS, random_region};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Length of the token disambiguating concurrent test runs.
const UNIQUE_ID_LEN: usize = 6;

/// Generate a short base62 token for disambiguating resource names.
///
/// Randomness is the only collision safety net between concurrent runs, so
/// every collection draws a fresh token from the thread rng.
pub fn unique_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_ID_LEN)
        .map(char::from)
        .collect()
}

/// Options for creating a resource collection.
#[derive(Debug, Clone)]
pub struct CollectionOptions {
    /// Regions the collection may be placed in.
    pub regions: Vec<String>,
    /// Prefix for the registered key pair name.
    pub key_name_prefix: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            regions: SUPPORTED_REGIONS.iter().map(|r| r.to_string()).collect(),
            key_name_prefix: "groundcheck".to_string(),
        }
    }
}

/// Ephemeral AWS prerequisites for one test run.
///
/// Owned exclusively by the run that created it. Holds the API handle it was
/// created through so teardown needs no extra arguments.
pub struct ResourceCollection {
    api: Arc<dyn Ec2Api>,
    pub aws_region: String,
    pub key_pair: Ec2KeyPair,
    pub unique_id: String,
    pub ami_id: String,
    destroyed: AtomicBool,
}

impl std::fmt::Debug for ResourceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCollection")
            .field("aws_region", &self.aws_region)
            .field("key_pair", &self.key_pair)
            .field("unique_id", &self.unique_id)
            .field("ami_id", &self.ami_id)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl ResourceCollection {
    /// Provision a fresh collection.
    ///
    /// All-or-nothing: when a later step fails, resources registered by
    /// earlier steps are rolled back before the error returns, so a
    /// partially initialized collection never escapes.
    pub async fn create(api: Arc<dyn Ec2Api>, options: &CollectionOptions) -> Result<Self> {
        let aws_region = random_region(&options.regions)?;
        let unique_id = unique_id();
        let key_name = format!("{}-{}", options.key_name_prefix, unique_id);

        info!("creating resource collection {} in {}", unique_id, aws_region);

        let key_pair = Ec2KeyPair::generate(&key_name)?;
        api.import_key_pair(&aws_region, &key_name, &key_pair.public_key)
            .await
            .map_err(|e| AwsError::ProvisioningFailed {
                resource: format!("key pair {}", key_name),
                reason: e.to_string(),
            })?;

        let ami_id = match api.resolve_ami(&aws_region).await {
            Ok(ami_id) => ami_id,
            Err(e) => {
                // Roll back the key pair registered above.
                if let Err(cleanup) = api.delete_key_pair(&aws_region, &key_name).await {
                    warn!("rollback of key pair {} failed: {}", key_name, cleanup);
                }
                return Err(AwsError::ProvisioningFailed {
                    resource: format!("AMI in {}", aws_region),
                    reason: e.to_string(),
                });
            }
        };

        Ok(Self {
            api,
            aws_region,
            key_pair,
            unique_id,
            ami_id,
            destroyed: AtomicBool::new(false),
        })
    }

    /// Delete everything the collection registered.
    ///
    /// Safe to call more than once; an already-absent key pair is not an
    /// error. Callers arrange this on every exit path right after a
    /// successful [`create`](Self::create).
    pub async fn destroy(&self) -> Result<()> {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!("destroying resource collection {}", self.unique_id);

        match self
            .api
            .delete_key_pair(&self.aws_region, &self.key_pair.name)
            .await
        {
            Ok(()) | Err(AwsError::KeyPairNotFound(_)) => Ok(()),
            Err(e) => {
                // Leave the guard unset so a deliberate second call can retry.
                self.destroyed.store(false, Ordering::SeqCst);
                Err(AwsError::TeardownFailed(e.to_string()))
            }
        }
    }

    /// Variables fixtures conventionally take, derived from this collection.
    pub fn terraform_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("aws_region".to_string(), self.aws_region.clone());
        vars.insert("ec2_key_name".to_string(), self.key_pair.name.clone());
        vars.insert("ec2_instance_name".to_string(), self.unique_id.clone());
        vars.insert("ec2_image".to_string(), self.ami_id.clone());
        vars
    }
}
