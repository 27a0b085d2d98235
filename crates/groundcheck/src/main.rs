mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ground")]
#[command(version)]
#[command(about = "Drive terraform apply/destroy cycles against test fixtures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one apply/destroy cycle against a fixture template
    Run {
        /// Fixture name or template directory path
        template: String,
        /// Label for logs and diagnostics
        #[arg(long, default_value = "groundcheck")]
        test_name: String,
        /// Terraform variable (KEY=VALUE, repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// Retry the apply once when a retryable error signature matches
        #[arg(long)]
        retry: bool,
        /// Retryable error signature (SUBSTRING=REASON, repeatable)
        #[arg(long = "retryable-error", value_name = "SUBSTRING=REASON")]
        retryable_errors: Vec<String>,
        /// Provision an AWS resource collection and pass it as variables
        #[arg(long)]
        provision: bool,
    },
    /// Check that terraform and AWS credentials are usable
    Check,
    /// Manage standalone EC2 key pairs
    #[command(subcommand)]
    Keypair(KeypairCommands),
}

#[derive(Subcommand)]
enum KeypairCommands {
    /// Generate a key pair and register it with EC2
    Up {
        /// Base name for the key pair (a unique id is appended)
        name: String,
        /// Region to register in (random when omitted)
        #[arg(short, long)]
        region: Option<String>,
    },
    /// Delete a registered key pair
    Down {
        /// Key pair name
        name: String,
        /// Region the key pair lives in
        #[arg(short, long)]
        region: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            template,
            test_name,
            vars,
            retry,
            retryable_errors,
            provision,
        } => commands::run::handle(template, test_name, vars, retry, retryable_errors, provision).await,
        Commands::Check => commands::check::handle().await,
        Commands::Keypair(KeypairCommands::Up { name, region }) => {
            commands::keypair::up(name, region).await
        }
        Commands::Keypair(KeypairCommands::Down { name, region }) => {
            commands::keypair::down(name, region).await
        }
    }
}
