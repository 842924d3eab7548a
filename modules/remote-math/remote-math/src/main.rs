use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use remote_math::config::CliOverrides;
use remote_math::{Calculator, ServerConfig, StartupError, logging, signals};
use tokio_util::sync::CancellationToken;

/// Math server - exports a math object and binds it in the name registry
#[derive(Parser)]
#[command(name = "math-server")]
#[command(about = "Math server - exports a math object and binds it in the name registry")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Registry URI override (e.g. http://127.0.0.1:1099)
    #[arg(long)]
    registry: Option<String>,

    /// Binding name override
    #[arg(long)]
    name: Option<String>,

    /// Listen address override for the exported object
    #[arg(long)]
    listen: Option<String>,

    /// Replace an existing binding instead of failing
    #[arg(long)]
    rebind: bool,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            registry_uri: self.registry.clone(),
            binding_name: self.name.clone(),
            listen_addr: self.listen.clone(),
            rebind: self.rebind,
            verbose: self.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (MATH_SERVER__*) -> 4) CLI overrides
    let mut config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail_before_logging(&e),
    };
    config.apply_cli_overrides(&cli.overrides());

    if cli.print_config {
        return match serde_json::to_string_pretty(&config) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => fail_before_logging(&StartupError::InvalidConfig(e.to_string())),
        };
    }

    if let Err(e) = logging::init_logging(&config.logging) {
        return fail_before_logging(&StartupError::InvalidConfig(format!("{e:#}")));
    }

    tracing::info!(
        name = %config.binding_name,
        registry = %config.registry_uri,
        "math server starting"
    );

    let cancel = CancellationToken::new();
    let _signals = signals::spawn_shutdown_listener(cancel.clone());

    let result = remote_math::run(
        &config,
        Arc::new(Calculator::new()),
        cancel,
        &mut std::io::stdout(),
    )
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "math server failed");
            let code = e.exit_code();
            eprintln!("Error: {:?}", anyhow::Error::new(e));
            ExitCode::from(code)
        }
    }
}

fn fail_before_logging(err: &StartupError) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::from(err.exit_code())
}
