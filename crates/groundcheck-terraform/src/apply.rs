//! Apply/destroy orchestration
//!
//! Runs one apply against a template directory, classifies any failure text
//! against a table of known retryable error signatures, retries the apply at
//! most once on a match, and always runs a destroy afterwards so a failed
//! apply cannot leak the resources it managed to create.

use crate::error::{Result, TerraformError};
use crate::terraform::Terraform;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Marker appended to the accumulated output whenever an automatic retry is
/// triggered. Test suites grep for this to confirm the retry path ran.
pub const RETRY_MARKER: &str = "**TERRAFORM-RETRY**";

/// Options for one orchestrated apply/destroy cycle.
///
/// Built fresh per run, consumed once, not reused.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Label used in logs and diagnostics.
    pub test_name: String,
    /// Directory containing the terraform template.
    pub template_path: PathBuf,
    /// Variables passed to terraform as `-var key=value`.
    pub vars: HashMap<String, String>,
    /// Whether a retryable apply failure should be retried (once).
    pub attempt_terraform_retry: bool,
    /// Literal output substring mapped to a human-readable explanation of
    /// why the failure is retryable. Empty means no matching is performed.
    pub retryable_terraform_errors: HashMap<String, String>,
}

impl ApplyOptions {
    pub fn new(test_name: impl Into<String>, template_path: impl Into<PathBuf>) -> Self {
        Self {
            test_name: test_name.into(),
            template_path: template_path.into(),
            ..Self::default()
        }
    }
}

enum ApplyFailure {
    NonRetryable,
    RetryExhausted(String),
}

/// Run one apply cycle and always destroy afterwards.
///
/// Returns the combined terraform output of every invocation in the cycle.
/// The failure variants carry the same accumulated output, so callers can
/// scan it for [`RETRY_MARKER`] regardless of the outcome.
pub async fn apply_and_destroy(terraform: &Terraform, options: &ApplyOptions) -> Result<String> {
    if !options.template_path.is_dir() {
        return Err(TerraformError::TemplateNotFound(
            options.template_path.clone(),
        ));
    }

    info!(
        test = %options.test_name,
        "applying template {}",
        options.template_path.display()
    );

    let init = terraform.init(&options.template_path).await?;
    if !init.success {
        // Nothing has been provisioned yet, so there is nothing to destroy.
        return Err(TerraformError::InitFailed {
            output: init.output,
        });
    }

    let mut output = String::new();
    let mut failure: Option<ApplyFailure> = None;

    let first = terraform.apply(&options.template_path, &options.vars).await?;
    output.push_str(&first.output);

    if !first.success {
        match retryable_match(&first.output, options) {
            Some((signature, explanation)) => {
                warn!(
                    test = %options.test_name,
                    "retrying apply after \"{}\": {}",
                    signature,
                    explanation
                );
                output.push('\n');
                output.push_str(RETRY_MARKER);
                output.push('\n');

                let second = terraform.apply(&options.template_path, &options.vars).await?;
                output.push_str(&second.output);
                if !second.success {
                    failure = Some(ApplyFailure::RetryExhausted(signature.to_string()));
                }
            }
            None => failure = Some(ApplyFailure::NonRetryable),
        }
    }

    // Destroy runs whatever happened above.
    let destroy = terraform
        .destroy(&options.template_path, &options.vars)
        .await?;
    output.push_str(&destroy.output);
    if !destroy.success {
        if failure.is_none() {
            return Err(TerraformError::DestroyFailed { output });
        }
        // The apply failure stays the reported error; the leak is not silent.
        error!(
            test = %options.test_name,
            exit_code = destroy.exit_code,
            "terraform destroy failed after a failed apply, resources may be left behind"
        );
    }

    match failure {
        None => Ok(output),
        Some(ApplyFailure::NonRetryable) => Err(TerraformError::ApplyFailed { output }),
        Some(ApplyFailure::RetryExhausted(matched)) => {
            Err(TerraformError::RetryExhausted { matched, output })
        }
    }
}

/// Find any configured retryable signature contained in the failure output.
/// Any single match suffices; there is no ordering among the signatures.
fn retryable_match<'a>(output: &str, options: &'a ApplyOptions) -> Option<(&'a str, &'a str)> {
    if !options.attempt_terraform_retry {
        return None;
    }
    options
        .retryable_terraform_errors
        .iter()
        .find(|(signature, _)| output.contains(signature.as_str()))
        .map(|(signature, explanation)| (signature.as_str(), explanation.as_str()))
}
