#![cfg(unix)]

mod common;

use common::{FakeBehavior, FakeTerraform, Step};
use groundcheck_terraform::{
    ApplyOptions, RETRY_MARKER, Terraform, TerraformError, apply_and_destroy,
};

const KEYPAIR_ERROR: &str =
    "aws_instance.demo: Error launching source instance: InvalidKeyPair.NotFound";

fn options_for(fake: &FakeTerraform) -> ApplyOptions {
    let mut options = ApplyOptions::new("orchestration-test", fake.template());
    options
        .vars
        .insert("aws_region".to_string(), "us-east-1".to_string());
    options
}

#[tokio::test]
async fn successful_apply_runs_destroy_once() {
    let fake = FakeTerraform::install(&FakeBehavior::default());
    let terraform = Terraform::with_binary(fake.binary());

    let output = apply_and_destroy(&terraform, &options_for(&fake))
        .await
        .unwrap();

    assert!(output.contains("Apply complete"));
    assert!(output.contains("Destroy complete"));
    assert!(!output.contains(RETRY_MARKER));
    assert_eq!(fake.invocations(), ["init", "apply", "destroy"]);
}

#[tokio::test]
async fn failed_init_stops_before_apply_and_destroy() {
    let behavior = FakeBehavior {
        init: Step::fail("Error: Failed to install provider"),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let err = apply_and_destroy(&terraform, &options_for(&fake))
        .await
        .unwrap_err();

    match err {
        TerraformError::InitFailed { output } => {
            assert!(output.contains("Failed to install provider"));
        }
        other => panic!("expected InitFailed, got {:?}", other),
    }
    // Nothing was provisioned, so no destroy may run.
    assert_eq!(fake.invocations(), ["init"]);
}

#[tokio::test]
async fn failed_apply_without_retry_still_destroys() {
    let behavior = FakeBehavior {
        first_apply: Step::fail(KEYPAIR_ERROR),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let err = apply_and_destroy(&terraform, &options_for(&fake))
        .await
        .unwrap_err();

    match err {
        TerraformError::ApplyFailed { output } => {
            assert!(!output.contains(RETRY_MARKER));
            assert!(output.contains("Destroy complete"));
        }
        other => panic!("expected ApplyFailed, got {:?}", other),
    }
    assert_eq!(fake.invocations(), ["init", "apply", "destroy"]);
}

#[tokio::test]
async fn matching_signature_triggers_single_retry() {
    let behavior = FakeBehavior {
        first_apply: Step::fail(KEYPAIR_ERROR),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let mut options = options_for(&fake);
    options.attempt_terraform_retry = true;
    options.retryable_terraform_errors.insert(
        KEYPAIR_ERROR.to_string(),
        "EC2 key pair propagation is eventually consistent".to_string(),
    );

    let output = apply_and_destroy(&terraform, &options).await.unwrap();

    assert!(output.contains(RETRY_MARKER));
    assert!(output.contains("Apply complete"));
    assert_eq!(fake.invocations(), ["init", "apply", "apply", "destroy"]);
}

#[tokio::test]
async fn second_failure_after_retry_is_terminal() {
    let behavior = FakeBehavior {
        first_apply: Step::fail(KEYPAIR_ERROR),
        second_apply: Step::fail(KEYPAIR_ERROR),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let mut options = options_for(&fake);
    options.attempt_terraform_retry = true;
    options
        .retryable_terraform_errors
        .insert(KEYPAIR_ERROR.to_string(), String::new());

    let err = apply_and_destroy(&terraform, &options).await.unwrap_err();

    match err {
        TerraformError::RetryExhausted { matched, output } => {
            assert_eq!(matched, KEYPAIR_ERROR);
            assert!(output.contains(RETRY_MARKER));
            assert!(output.contains("Destroy complete"));
        }
        other => panic!("expected RetryExhausted, got {:?}", other),
    }
    // Exactly one retry, exactly one destroy.
    assert_eq!(fake.invocations(), ["init", "apply", "apply", "destroy"]);
}

#[tokio::test]
async fn unrelated_signature_does_not_retry() {
    let behavior = FakeBehavior {
        first_apply: Step::fail(KEYPAIR_ERROR),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let mut options = options_for(&fake);
    options.attempt_terraform_retry = true;
    options.retryable_terraform_errors.insert(
        "I'm a message that shouldn't show up in the output".to_string(),
        String::new(),
    );

    let err = apply_and_destroy(&terraform, &options).await.unwrap_err();

    match err {
        TerraformError::ApplyFailed { output } => assert!(!output.contains(RETRY_MARKER)),
        other => panic!("expected ApplyFailed, got {:?}", other),
    }
    assert_eq!(fake.invocations(), ["init", "apply", "destroy"]);
}

#[tokio::test]
async fn destroy_failure_after_successful_apply_is_an_error() {
    let behavior = FakeBehavior {
        destroy: Step::fail("Error: timeout while waiting for instance to terminate"),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let err = apply_and_destroy(&terraform, &options_for(&fake))
        .await
        .unwrap_err();

    match err {
        TerraformError::DestroyFailed { output } => {
            assert!(output.contains("Apply complete"));
            assert!(output.contains("timeout while waiting"));
        }
        other => panic!("expected DestroyFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn destroy_failure_does_not_mask_apply_failure() {
    let behavior = FakeBehavior {
        first_apply: Step::fail(KEYPAIR_ERROR),
        destroy: Step::fail("Error: destroy failed too"),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let err = apply_and_destroy(&terraform, &options_for(&fake))
        .await
        .unwrap_err();

    assert!(matches!(err, TerraformError::ApplyFailed { .. }));
}

#[tokio::test]
async fn missing_template_fails_before_any_invocation() {
    let fake = FakeTerraform::install(&FakeBehavior::default());
    let terraform = Terraform::with_binary(fake.binary());

    let options = ApplyOptions::new("missing-template", "/nonexistent/template");
    let err = apply_and_destroy(&terraform, &options).await.unwrap_err();

    assert!(matches!(err, TerraformError::TemplateNotFound(_)));
    assert!(fake.invocations().is_empty());
}

#[tokio::test]
async fn missing_binary_is_fatal() {
    let fake = FakeTerraform::install(&FakeBehavior::default());
    let terraform = Terraform::with_binary("/nonexistent/terraform");

    let err = apply_and_destroy(&terraform, &options_for(&fake))
        .await
        .unwrap_err();

    assert!(matches!(err, TerraformError::TerraformNotFound));
}

#[tokio::test]
async fn apply_reports_the_process_exit_code() {
    let behavior = FakeBehavior {
        first_apply: Step::fail(KEYPAIR_ERROR),
        ..Default::default()
    };
    let fake = FakeTerraform::install(&behavior);
    let terraform = Terraform::with_binary(fake.binary());

    let result = terraform
        .apply(&fake.template(), &std::collections::HashMap::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
}

#[tokio::test]
async fn check_installed_reports_version() {
    let fake = FakeTerraform::install(&FakeBehavior::default());
    let terraform = Terraform::with_binary(fake.binary());

    let version = terraform.check_installed().await.unwrap();
    assert_eq!(version, "Terraform v1.6.6");
}
