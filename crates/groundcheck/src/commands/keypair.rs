use colored::Colorize;
use groundcheck_aws::{AwsCli, AwsError, Ec2Api, Ec2KeyPair, SUPPORTED_REGIONS, random_region, unique_id};

pub async fn up(name: String, region: Option<String>) -> anyhow::Result<()> {
    let region = match region {
        Some(region) => region,
        None => {
            let pool: Vec<String> = SUPPORTED_REGIONS.iter().map(|r| r.to_string()).collect();
            random_region(&pool)?
        }
    };

    let key_name = format!("{}-{}", name, unique_id());
    let key_pair = Ec2KeyPair::generate(&key_name)?;

    let aws = AwsCli::with_binary(groundcheck_config::aws_binary());
    let key_pair_id = aws
        .import_key_pair(&region, &key_pair.name, &key_pair.public_key)
        .await?;

    println!(
        "  {} registered {} in {} ({})",
        "✓".green(),
        key_pair.name.cyan(),
        region.cyan(),
        key_pair_id
    );
    Ok(())
}

pub async fn down(name: String, region: String) -> anyhow::Result<()> {
    let aws = AwsCli::with_binary(groundcheck_config::aws_binary());

    match aws.delete_key_pair(&region, &name).await {
        Ok(()) => println!("  {} deleted {} from {}", "✓".green(), name.cyan(), region.cyan()),
        Err(AwsError::KeyPairNotFound(_)) => println!(
            "  {} {} was already absent in {}",
            "✓".green(),
            name.cyan(),
            region.cyan()
        ),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
