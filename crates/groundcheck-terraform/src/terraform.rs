//! terraform CLI wrapper
//!
//! Wraps the terraform CLI commands Groundcheck needs. Every invocation
//! captures combined stdout/stderr text; a non-zero terraform exit is data
//! for the orchestrator, not an error at this layer.

use crate::error::{Result, TerraformError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// terraform CLI wrapper
#[derive(Debug, Clone)]
pub struct Terraform {
    binary: PathBuf,
}

/// Captured result of a single terraform invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    /// Combined stdout and stderr text
    pub output: String,
}

impl Terraform {
    /// Use the `terraform` binary found on PATH.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("terraform"),
        }
    }

    /// Use a specific terraform binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that the binary exists and runs, returning its version line.
    pub async fn check_installed(&self) -> Result<String> {
        let result = self.run(None, vec!["version".to_string()]).await?;
        if !result.success {
            return Err(TerraformError::TerraformNotFound);
        }
        Ok(result.output.lines().next().unwrap_or_default().to_string())
    }

    /// Run `terraform init` in the template directory.
    pub async fn init(&self, template_dir: &Path) -> Result<CommandOutput> {
        let args = vec![
            "init".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
        ];
        self.run(Some(template_dir), args).await
    }

    /// Run `terraform apply` with the given variables.
    pub async fn apply(
        &self,
        template_dir: &Path,
        vars: &HashMap<String, String>,
    ) -> Result<CommandOutput> {
        let mut args = vec![
            "apply".to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
            "-no-color".to_string(),
        ];
        args.extend(var_args(vars));
        self.run(Some(template_dir), args).await
    }

    /// Run `terraform destroy` with the given variables.
    pub async fn destroy(
        &self,
        template_dir: &Path,
        vars: &HashMap<String, String>,
    ) -> Result<CommandOutput> {
        let mut args = vec![
            "destroy".to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
            "-no-color".to_string(),
        ];
        args.extend(var_args(vars));
        self.run(Some(template_dir), args).await
    }

    /// Run a terraform command and capture its combined output.
    async fn run(&self, dir: Option<&Path>, args: Vec<String>) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd.args(&args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", self.binary.display(), args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TerraformError::TerraformNotFound,
            _ => TerraformError::Io(e),
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            output: combined,
        };
        tracing::debug!(
            "terraform {} exited with code {}",
            args.first().map(String::as_str).unwrap_or_default(),
            result.exit_code
        );
        Ok(result)
    }
}

impl Default for Terraform {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a variable map as `-var key=value` argument pairs.
fn var_args(vars: &HashMap<String, String>) -> Vec<String> {
    let mut args = Vec::with_capacity(vars.len() * 2);
    for (key, value) in vars {
        args.push("-var".to_string());
        args.push(format!("{}={}", key, value));
    }
    args
}
