use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use naming_sdk::{DEFAULT_REGISTRY_URI, GrpcNameRegistry};
use remote_math_sdk::{DEFAULT_BINDING_NAME, lookup_client};
use rmath_transport_grpc::GrpcClientConfig;
use tracing_subscriber::EnvFilter;

/// Math client - resolves the math object by name and calls it
#[derive(Parser)]
#[command(name = "math-client")]
#[command(about = "Math client - resolves the math object by name and calls it")]
#[command(version)]
struct Cli {
    /// Registry URI
    #[arg(long, default_value = DEFAULT_REGISTRY_URI)]
    registry: String,

    /// Name the math object is bound under
    #[arg(long, default_value = DEFAULT_BINDING_NAME)]
    name: String,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// a + b
    Add(Operands),
    /// a - b
    Subtract(Operands),
    /// a * b
    Multiply(Operands),
    /// a / b
    Divide(Operands),
    /// Number of successful operations served so far
    Computations,
}

#[derive(clap::Args)]
struct Operands {
    #[arg(allow_negative_numbers = true)]
    a: f64,
    #[arg(allow_negative_numbers = true)]
    b: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = remote_math::config::level_for_verbosity(cli.verbose).unwrap_or("warn");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let cfg = GrpcClientConfig::new("remote_math").with_connect_timeout(Duration::from_secs(5));
    let registry = GrpcNameRegistry::connect(&cli.registry, &cfg.clone().with_max_retries(0))
        .await
        .with_context(|| format!("cannot reach registry at {}", cli.registry))?;
    let math = lookup_client(&registry, &cli.name, &cfg).await?;

    match cli.command {
        Command::Add(Operands { a, b }) => println!("{}", math.add(a, b).await?),
        Command::Subtract(Operands { a, b }) => println!("{}", math.subtract(a, b).await?),
        Command::Multiply(Operands { a, b }) => println!("{}", math.multiply(a, b).await?),
        Command::Divide(Operands { a, b }) => println!("{}", math.divide(a, b).await?),
        Command::Computations => println!("{}", math.computations().await?),
    }
    Ok(())
}
