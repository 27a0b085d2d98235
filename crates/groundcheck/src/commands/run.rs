use anyhow::Context;
use colored::Colorize;
use groundcheck_aws::{AwsCli, CollectionOptions, ResourceCollection};
use groundcheck_terraform::{ApplyOptions, RETRY_MARKER, Terraform, apply_and_destroy};
use std::sync::Arc;

pub async fn handle(
    template: String,
    test_name: String,
    vars: Vec<String>,
    retry: bool,
    retryable_errors: Vec<String>,
    provision: bool,
) -> anyhow::Result<()> {
    let template_path = groundcheck_config::find_fixture_dir(&template)?;
    let terraform = Terraform::with_binary(groundcheck_config::terraform_binary());

    let mut options = ApplyOptions::new(test_name, template_path);
    options.attempt_terraform_retry = retry;
    for entry in &retryable_errors {
        let (signature, reason) = super::split_pair(entry)
            .with_context(|| format!("invalid --retryable-error '{}', expected SUBSTRING=REASON", entry))?;
        options.retryable_terraform_errors.insert(signature, reason);
    }

    // Parse every --var up front: once resources are provisioned, nothing
    // may fail before the teardown below is reached.
    let mut cli_vars = Vec::with_capacity(vars.len());
    for entry in &vars {
        let pair = super::split_pair(entry)
            .with_context(|| format!("invalid --var '{}', expected KEY=VALUE", entry))?;
        cli_vars.push(pair);
    }

    let collection = if provision {
        println!("{}", "Provisioning AWS test resources...".blue());

        let mut collection_options = CollectionOptions::default();
        if let Some(regions) = groundcheck_config::region_pool_override() {
            collection_options.regions = regions;
        }

        let api = Arc::new(AwsCli::with_binary(groundcheck_config::aws_binary()));
        let collection = ResourceCollection::create(api, &collection_options).await?;
        println!("  ✓ region: {}", collection.aws_region.cyan());
        println!("  ✓ key pair: {}", collection.key_pair.name.cyan());
        println!("  ✓ AMI: {}", collection.ami_id.cyan());

        options.vars.extend(collection.terraform_vars());
        Some(collection)
    } else {
        None
    };

    // Explicit --var flags win over provisioned values.
    for (key, value) in cli_vars {
        options.vars.insert(key, value);
    }

    println!(
        "{}",
        format!(
            "Running apply/destroy cycle on {}...",
            options.template_path.display()
        )
        .blue()
    );

    let result = apply_and_destroy(&terraform, &options).await;

    // Teardown happens on every path before the result is reported.
    if let Some(collection) = &collection {
        println!("{}", "Tearing down AWS test resources...".blue());
        match collection.destroy().await {
            Ok(()) => println!("  {} teardown complete", "✓".green()),
            Err(e) => eprintln!("  {} teardown failed: {}", "✗".red(), e),
        }
    }

    match result {
        Ok(output) => {
            if output.contains(RETRY_MARKER) {
                println!("  {} apply succeeded after one retry", "✓".green());
            } else {
                println!("  {} apply and destroy succeeded", "✓".green());
            }
            Ok(())
        }
        Err(e) => {
            if let Some(output) = e.output() {
                eprintln!("{}", output);
            }
            Err(e.into())
        }
    }
}
