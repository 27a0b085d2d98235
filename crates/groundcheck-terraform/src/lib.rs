//! Terraform orchestration for Groundcheck
//!
//! This crate drives the terraform CLI through one apply/destroy cycle
//! against a fixture template directory. When an apply fails with a known,
//! expected, non-deterministic error signature, the apply is retried exactly
//! once; whatever happens, a destroy runs afterwards so test resources never
//! leak.
//!
//! # Requirements
//!
//! - `terraform` must be installed (or a binary path supplied via
//!   [`Terraform::with_binary`])
//!
//! # Example
//!
//! ```ignore
//! use groundcheck_terraform::{apply_and_destroy, ApplyOptions, Terraform};
//!
//! let terraform = Terraform::new();
//! let mut options = ApplyOptions::new("minimal-example", "test-fixtures/minimal-example");
//! options.vars.insert("aws_region".to_string(), "us-east-1".to_string());
//!
//! let output = apply_and_destroy(&terraform, &options).await?;
//! ```

pub mod apply;
pub mod error;
pub mod terraform;

pub use apply::{ApplyOptions, RETRY_MARKER, apply_and_destroy};
pub use error::{Result, TerraformError};
pub use terraform::{CommandOutput, Terraform};
