//! Terraform orchestration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("terraform not found. Please install terraform and put it on PATH")]
    TerraformNotFound,

    #[error("template path not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("terraform init failed")]
    InitFailed { output: String },

    #[error("terraform apply failed and no retryable error matched")]
    ApplyFailed { output: String },

    #[error("terraform apply failed again after retrying on \"{matched}\"")]
    RetryExhausted { matched: String, output: String },

    #[error("terraform destroy failed after a successful apply")]
    DestroyFailed { output: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerraformError {
    /// Combined terraform output accumulated up to the failure, if the
    /// variant carries any. Callers scan this for the retry marker.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::InitFailed { output }
            | Self::ApplyFailed { output }
            | Self::RetryExhausted { output, .. }
            | Self::DestroyFailed { output } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TerraformError>;
