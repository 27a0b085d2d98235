//! Region selection

use crate::error::{AwsError, Result};
use rand::seq::SliceRandom;

/// Regions a test run may be placed in.
pub const SUPPORTED_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-northeast-1",
    "ap-southeast-1",
    "ap-southeast-2",
];

/// Pick one region at random from `pool`.
///
/// The pool is an explicit argument so callers (and tests) control the
/// candidate set instead of relying on process-global state.
pub fn random_region(pool: &[String]) -> Result<String> {
    pool.choose(&mut rand::thread_rng())
        .cloned()
        .ok_or(AwsError::EmptyRegionPool)
}
