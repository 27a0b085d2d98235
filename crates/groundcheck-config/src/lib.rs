//! Configuration resolution for Groundcheck
//!
//! Environment variables first, built-in defaults second:
//! - `GROUNDCHECK_TERRAFORM_BIN` — terraform binary override
//! - `GROUNDCHECK_AWS_BIN` — aws CLI binary override
//! - `GROUNDCHECK_REGIONS` — comma-separated region pool override
//! - `GROUNDCHECK_FIXTURE_DIR` — extra root searched by [`find_fixture_dir`]

pub mod error;

pub use error::*;

use std::path::PathBuf;

pub const TERRAFORM_BIN_ENV: &str = "GROUNDCHECK_TERRAFORM_BIN";
pub const AWS_BIN_ENV: &str = "GROUNDCHECK_AWS_BIN";
pub const REGIONS_ENV: &str = "GROUNDCHECK_REGIONS";
pub const FIXTURE_DIR_ENV: &str = "GROUNDCHECK_FIXTURE_DIR";

/// Terraform binary to invoke.
pub fn terraform_binary() -> PathBuf {
    std::env::var(TERRAFORM_BIN_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("terraform"))
}

/// aws CLI binary to invoke.
pub fn aws_binary() -> String {
    std::env::var(AWS_BIN_ENV).unwrap_or_else(|_| "aws".to_string())
}

/// Region pool override, when `GROUNDCHECK_REGIONS` is set and non-empty.
pub fn region_pool_override() -> Option<Vec<String>> {
    let raw = std::env::var(REGIONS_ENV).ok()?;
    let regions: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    if regions.is_empty() { None } else { Some(regions) }
}

/// Locate a fixture template directory by name.
///
/// Searched in the following order:
/// 1. The name itself, when it is an existing directory path
/// 2. `./test-fixtures/<name>` and `./fixtures/<name>`
/// 3. `$GROUNDCHECK_FIXTURE_DIR/<name>`
pub fn find_fixture_dir(name: &str) -> Result<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_dir() {
        return Ok(direct);
    }

    let current_dir = std::env::current_dir()?;
    for root in ["test-fixtures", "fixtures"] {
        let candidate = current_dir.join(root).join(name);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    if let Ok(root) = std::env::var(FIXTURE_DIR_ENV) {
        let candidate = PathBuf::from(root).join(name);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Err(ConfigError::FixtureNotFound(name.to_string()))
}
