use colored::Colorize;
use groundcheck_aws::AwsCli;
use groundcheck_terraform::Terraform;

pub async fn handle() -> anyhow::Result<()> {
    println!("{}", "Checking toolchain...".blue());

    let terraform = Terraform::with_binary(groundcheck_config::terraform_binary());
    match terraform.check_installed().await {
        Ok(version) => println!("  {} {}", "✓".green(), version),
        Err(e) => {
            println!("  {} terraform: {}", "✗".red(), e);
            anyhow::bail!("terraform is not usable");
        }
    }

    let aws = AwsCli::with_binary(groundcheck_config::aws_binary());
    match aws.check_auth().await {
        Ok(identity) => println!(
            "  {} AWS account {} ({})",
            "✓".green(),
            identity.account.cyan(),
            identity.arn
        ),
        Err(e) => {
            println!("  {} aws: {}", "✗".red(), e);
            anyhow::bail!("AWS credentials are not usable");
        }
    }

    Ok(())
}
