use async_trait::async_trait;
use groundcheck_aws::{AwsError, Ec2Api, Result};
use std::sync::Mutex;

/// Recording fake for the EC2 seam: logs every call and injects failures on
/// demand.
#[derive(Default)]
pub struct FakeEc2 {
    pub calls: Mutex<Vec<String>>,
    pub fail_import: bool,
    pub fail_ami: bool,
    pub fail_delete: bool,
    pub delete_reports_missing: bool,
}

impl FakeEc2 {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Ec2Api for FakeEc2 {
    async fn import_key_pair(&self, region: &str, name: &str, public_key: &str) -> Result<String> {
        self.record(format!("import {} {}", region, name));
        assert!(public_key.starts_with("ssh-ed25519 "));
        if self.fail_import {
            return Err(AwsError::CommandFailed("UnauthorizedOperation".to_string()));
        }
        Ok("key-0123456789abcdef0".to_string())
    }

    async fn delete_key_pair(&self, region: &str, name: &str) -> Result<()> {
        self.record(format!("delete {} {}", region, name));
        if self.delete_reports_missing {
            return Err(AwsError::KeyPairNotFound(name.to_string()));
        }
        if self.fail_delete {
            return Err(AwsError::CommandFailed("RequestLimitExceeded".to_string()));
        }
        Ok(())
    }

    async fn resolve_ami(&self, region: &str) -> Result<String> {
        self.record(format!("ami {}", region));
        if self.fail_ami {
            return Err(AwsError::ImageNotFound(region.to_string()));
        }
        Ok("ami-0abcdef1234567890".to_string())
    }
}
