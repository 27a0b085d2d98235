//! AWS test-resource provisioning for Groundcheck
//!
//! Provisions the ephemeral AWS prerequisites a terraform fixture needs
//! before it can be applied: a randomly chosen region, a generated and
//! registered EC2 key pair, a unique id for disambiguating resource names
//! across concurrent runs, and a resolved AMI. Creation is all-or-nothing
//! and teardown is idempotent.
//!
//! # Requirements
//!
//! - `aws` CLI v2 installed and configured with credentials
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use groundcheck_aws::{AwsCli, CollectionOptions, ResourceCollection};
//!
//! let api = Arc::new(AwsCli::new());
//! let collection = ResourceCollection::create(api, &CollectionOptions::default()).await?;
//!
//! let vars = collection.terraform_vars();
//! // ... run the terraform cycle with `vars` ...
//!
//! collection.destroy().await?;
//! ```

pub mod api;
pub mod awscli;
pub mod collection;
pub mod error;
pub mod keypair;
pub mod region;

pub use api::Ec2Api;
pub use awscli::{AwsCli, CallerIdentity};
pub use collection::{CollectionOptions, ResourceCollection, unique_id};
pub use error::{AwsError, Result};
pub use keypair::Ec2KeyPair;
pub use region::{SUPPORTED_REGIONS, random_region};
