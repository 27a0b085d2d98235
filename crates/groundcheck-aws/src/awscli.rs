//! aws CLI wrapper
//!
//! Wraps the AWS CLI for the EC2 operations Groundcheck needs. All commands
//! run with `--output json` and responses are parsed with serde.

use crate::api::Ec2Api;
use crate::error::{AwsError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

/// Canonical's AWS account id, owner of the official Ubuntu images.
const CANONICAL_OWNER_ID: &str = "099720109477";

/// Name pattern of the Ubuntu images fixtures boot by default.
const UBUNTU_NAME_PATTERN: &str = "ubuntu/images/hvm-ssd/ubuntu-jammy-22.04-amd64-server-*";

/// aws CLI wrapper
pub struct AwsCli {
    binary: String,
}

impl AwsCli {
    pub fn new() -> Self {
        Self {
            binary: "aws".to_string(),
        }
    }

    /// Use a specific aws binary instead of the one on PATH.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that the CLI is installed and credentials resolve.
    pub async fn check_auth(&self) -> Result<CallerIdentity> {
        let output = self
            .run_command(None, &["sts", "get-caller-identity"])
            .await
            .map_err(|e| match e {
                AwsError::CommandFailed(msg) => AwsError::AuthenticationFailed(msg),
                other => other,
            })?;

        let identity: CallerIdentity = serde_json::from_str(&output)?;
        Ok(identity)
    }

    /// Run an aws command and return stdout.
    async fn run_command(&self, region: Option<&str>, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        if let Some(region) = region {
            cmd.arg("--region").arg(region);
        }
        cmd.args(args);
        cmd.arg("--output").arg("json");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws {}", args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AwsError::AwsCliNotFound,
            _ => AwsError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("InvalidKeyPair.NotFound") {
                return Err(AwsError::KeyPairNotFound(stderr));
            }
            return Err(AwsError::CommandFailed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ec2Api for AwsCli {
    async fn import_key_pair(&self, region: &str, name: &str, public_key: &str) -> Result<String> {
        let material = base64::engine::general_purpose::STANDARD.encode(public_key);
        let output = self
            .run_command(
                Some(region),
                &[
                    "ec2",
                    "import-key-pair",
                    "--key-name",
                    name,
                    "--public-key-material",
                    material.as_str(),
                ],
            )
            .await?;

        let imported: ImportedKeyPair = serde_json::from_str(&output)?;
        Ok(imported.key_pair_id)
    }

    async fn delete_key_pair(&self, region: &str, name: &str) -> Result<()> {
        self.run_command(
            Some(region),
            &["ec2", "delete-key-pair", "--key-name", name],
        )
        .await?;
        Ok(())
    }

    async fn resolve_ami(&self, region: &str) -> Result<String> {
        let name_filter = format!("Name=name,Values={}", UBUNTU_NAME_PATTERN);
        let output = self
            .run_command(
                Some(region),
                &[
                    "ec2",
                    "describe-images",
                    "--owners",
                    CANONICAL_OWNER_ID,
                    "--filters",
                    name_filter.as_str(),
                    "Name=state,Values=available",
                ],
            )
            .await?;

        let response: DescribeImages = serde_json::from_str(&output)?;
        newest_image(response.images).ok_or_else(|| AwsError::ImageNotFound(region.to_string()))
    }
}

/// Pick the id of the most recently created image.
fn newest_image(mut images: Vec<ImageInfo>) -> Option<String> {
    // CreationDate is ISO 8601, so lexicographic order is chronological.
    images.sort_by(|a, b| a.creation_date.cmp(&b.creation_date));
    images.pop().map(|image| image.image_id)
}

/// Identity from `aws sts get-caller-identity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Arn")]
    pub arn: String,

    #[serde(rename = "UserId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct ImportedKeyPair {
    #[serde(rename = "KeyPairId")]
    key_pair_id: String,
}

#[derive(Debug, Deserialize)]
struct DescribeImages {
    #[serde(rename = "Images")]
    images: Vec<ImageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageInfo {
    #[serde(rename = "ImageId")]
    image_id: String,

    #[serde(rename = "CreationDate")]
    creation_date: String,
}
