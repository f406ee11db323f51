//! Footprint CLI
//!
//! Public-profile discovery and identity signal analysis for a username,
//! name or email.

mod render;
mod server;

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use footprint_core::Registry;
use footprint_runtime::{Engine, Settings};

use crate::server::AppState;

#[derive(Parser)]
#[command(name = "footprint")]
#[command(
    author,
    version,
    about = "Footprint: public profile discovery and identity signals",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Args)]
struct EngineArgs {
    /// Registry JSON file(s); concatenated in order. Defaults to the bundled registry
    #[arg(short, long, env = "FOOTPRINT_REGISTRY", value_delimiter = ',')]
    registry: Vec<PathBuf>,

    /// Settings file (TOML)
    #[arg(short, long, env = "FOOTPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "FOOTPRINT_TIMEOUT")]
    timeout: Option<u64>,

    /// Maximum probes in flight
    #[arg(long, env = "FOOTPRINT_CONCURRENCY")]
    concurrency: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every platform for an identifier and print the report
    Analyze {
        /// Username, name or email
        identifier: String,

        #[command(flatten)]
        engine: EngineArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to a file
        #[arg(long)]
        save: bool,

        /// Output file for --save (default: report_<identifier>_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the platforms in the registry
    Platforms {
        /// Registry JSON file(s); defaults to the bundled registry
        #[arg(short, long, env = "FOOTPRINT_REGISTRY", value_delimiter = ',')]
        registry: Vec<PathBuf>,
    },

    /// Serve GET /analyze/{identifier} over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for reports
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Analyze {
            identifier,
            engine,
            json,
            save,
            output,
        } => {
            run_analyze(&identifier, engine, json, save, output).await?;
        }
        Commands::Platforms { registry } => {
            let registry = load_registry(&registry)?;
            print!("{}", render::registry(&registry));
        }
        Commands::Serve { bind, engine } => {
            let registry = load_registry(&engine.registry)?;
            let engine = build_engine(&engine)?;
            let state = AppState {
                engine,
                registry: Arc::new(registry),
            };
            server::serve(bind, state).await?;
        }
    }

    Ok(())
}

/// Registry from files, or the bundled one when none are given
fn load_registry(paths: &[PathBuf]) -> Result<Registry> {
    if paths.is_empty() {
        return Registry::embedded().context("bundled registry is malformed");
    }
    Registry::load_files(paths).context("failed to load registry")
}

fn build_engine(args: &EngineArgs) -> Result<Engine> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(timeout) = args.timeout {
        settings.fetch.timeout_secs = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        settings.scan.max_concurrent = concurrency;
    }

    Engine::new(settings).context("failed to start engine")
}

async fn run_analyze(
    identifier: &str,
    args: EngineArgs,
    json: bool,
    save: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    // Both fail fast, before any probe is sent
    let registry = load_registry(&args.registry)?;
    let engine = build_engine(&args)?;

    if !json {
        let settings = engine.settings();
        println!("🛰️  Footprint - public profile discovery\n");
        println!("🔍 Identifier: {}", identifier);
        println!(
            "📚 Registry: {} platforms | ⏱️  Timeout: {}s | 🔀 Concurrency: {}\n",
            registry.len(),
            settings.fetch.timeout_secs,
            settings.scan.max_concurrent
        );
    }

    let report = engine.analyze(&registry, identifier).await;
    let report_json = serde_json::to_string_pretty(&report)?;

    if json {
        println!("{}", report_json);
    } else {
        print!("{}", render::report(&report));
    }

    if save || output.is_some() {
        let output_path = output.unwrap_or_else(|| {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
            let slug: String = report
                .subject
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            PathBuf::from(format!("report_{}_{}.json", slug, timestamp))
        });

        fs::write(&output_path, &report_json)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        eprintln!("📄 Report saved to: {}", output_path.display());
    }

    Ok(())
}
