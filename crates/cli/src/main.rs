mod serve;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pensum_core::CalculationRequest;
use pensum_eval::{AccrualRateProvider, EvalContext, FixedAccrualRate, SchemeRegistryClient};

/// Pension calculation service.
#[derive(Parser)]
#[command(name = "pensum", version, about = "Pension mutation calculation service")]
struct Cli {
    /// Log level when PENSUM_LOG_LEVEL and RUST_LOG are unset
    #[arg(long, env = "PENSUM_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listening port
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Base URL of the scheme registry; unset means the fixed default
        /// accrual rate
        #[arg(long, env = "SCHEME_REGISTRY_URL")]
        scheme_registry_url: Option<String>,
    },

    /// Evaluate a calculation request document from a file
    Eval {
        /// Path to the request JSON file
        request: PathBuf,

        /// Base URL of the scheme registry; unset means the fixed default
        /// accrual rate
        #[arg(long, env = "SCHEME_REGISTRY_URL")]
        scheme_registry_url: Option<String>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_level.to_string().into());

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn provider_for(scheme_registry_url: Option<String>) -> Arc<dyn AccrualRateProvider> {
    match scheme_registry_url {
        Some(url) => Arc::new(SchemeRegistryClient::new(url)),
        None => Arc::new(FixedAccrualRate::default()),
    }
}

/// Evaluate a request document from a file and print the response JSON.
fn run_eval(request_path: &PathBuf, rates: &dyn AccrualRateProvider) -> Result<(), String> {
    let text = std::fs::read_to_string(request_path)
        .map_err(|e| format!("failed to read {}: {}", request_path.display(), e))?;
    let document: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))?;

    let request = CalculationRequest::from_json(&document).map_err(|e| {
        let fields: Vec<String> = e
            .problems
            .iter()
            .map(|p| format!("{}: {}", p.field, p.reason))
            .collect();
        format!("invalid request: {}", fields.join("; "))
    })?;

    let ctx = EvalContext::new(rates);
    let response = pensum_eval::evaluate_request(&request, &ctx)
        .map_err(|e| format!("evaluation failed: {}", e))?;

    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("failed to render response: {}", e))?;
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    match cli.command {
        Commands::Serve {
            port,
            scheme_registry_url,
        } => {
            let rates = provider_for(scheme_registry_url);
            if let Err(e) = serve::start_server(port, rates).await {
                tracing::error!(error = %e, "server failed");
                process::exit(1);
            }
        }
        Commands::Eval {
            request,
            scheme_registry_url,
        } => {
            let rates = provider_for(scheme_registry_url);
            if let Err(e) = run_eval(&request, rates.as_ref()) {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        }
    }
}
