use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use match_insight::api::state::AppState;
use match_insight::api::{build_router, cors_layer};
use match_insight::config::AppConfig;
use match_insight::pipeline::{error_envelope, Pipeline};
use match_insight::transforms::TransformError;

#[derive(Parser)]
#[command(name = "match-insight")]
#[command(about = "Match history analytics: features, similar matches and win probability")]
#[command(version)]
struct Cli {
    /// Path to configuration file (optional)
    #[arg(long, default_value = "./match-insight.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where a transform reads its request from.
#[derive(Args)]
struct InputArgs {
    /// Request JSON file (stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Remove the input file once the call finishes
    #[arg(long, requires = "input")]
    delete_input: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract features from {"matches": [...]}
    Features {
        #[command(flatten)]
        io: InputArgs,

        /// Include skipped-record diagnostics in the response
        #[arg(long)]
        diagnostics: bool,
    },

    /// Retrieve similar matches for {"query": ..., "top_k": ...}
    Similar {
        #[command(flatten)]
        io: InputArgs,

        /// JSONL corpus to search instead of the configured one
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Default number of results when the request has no top_k
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Simulate a match from a feature object
    Simulate {
        #[command(flatten)]
        io: InputArgs,

        /// Number of samples
        #[arg(long)]
        simulations: Option<usize>,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Extract features and simulate in one call
    Predict {
        #[command(flatten)]
        io: InputArgs,

        /// Number of samples
        #[arg(long)]
        simulations: Option<usize>,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Include skipped-record diagnostics in the response
        #[arg(long)]
        diagnostics: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing; stdout is reserved for response documents
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting match-insight v{}", env!("CARGO_PKG_VERSION"));

    let ok = match cli.command {
        Commands::Features { io, diagnostics } => {
            let pipeline = Pipeline::new(&config, Vec::new())
                .with_diagnostics(diagnostics || config.include_diagnostics);
            run_transform(&io, |body| pipeline.features(body))
        }
        Commands::Similar { io, corpus, top_k } => {
            if corpus.is_some() {
                config.retrieval.corpus_path = corpus;
            }
            match Pipeline::from_config(&config) {
                Ok(mut pipeline) => {
                    if let Some(top_k) = top_k {
                        pipeline = pipeline.with_top_k(top_k);
                    }
                    run_transform(&io, |body| pipeline.similar(body))
                }
                Err(e) => {
                    tracing::error!("Failed to load corpus: {}", e);
                    println!("{}", json!({ "error": e.to_string() }));
                    false
                }
            }
        }
        Commands::Simulate {
            io,
            simulations,
            seed,
        } => {
            let pipeline = simulation_pipeline(&config, simulations, seed);
            run_transform(&io, |body| pipeline.simulate(body))
        }
        Commands::Predict {
            io,
            simulations,
            seed,
            diagnostics,
        } => {
            let pipeline = simulation_pipeline(&config, simulations, seed)
                .with_diagnostics(diagnostics || config.include_diagnostics);
            run_transform(&io, |body| pipeline.predict(body))
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let pipeline = Pipeline::from_config(&config)?;
            tracing::info!(
                "Loaded {} corpus records (vector mode: {})",
                pipeline.corpus().len(),
                config.retrieval.vector_mode
            );
            let app = build_router(AppState::new(pipeline))
                .layer(cors_layer(&config.server.cors_origin));

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn simulation_pipeline(
    config: &AppConfig,
    simulations: Option<usize>,
    seed: Option<u64>,
) -> Pipeline {
    let mut pipeline = Pipeline::new(config, Vec::new());
    if let Some(n) = simulations {
        pipeline = pipeline.with_num_simulations(n);
    }
    if seed.is_some() {
        pipeline = pipeline.with_seed(seed);
    }
    pipeline
}

/// Read the request, run `op`, print the response or the error envelope.
/// Returns whether the call succeeded.
fn run_transform<F>(io: &InputArgs, op: F) -> bool
where
    F: FnOnce(&str) -> Result<Value, TransformError>,
{
    let stdout = std::io::stdout();
    transform_to(io, &mut stdout.lock(), op)
}

/// Run one transform call, writing a single JSON document to `out`. The
/// input file is removed when requested, whatever the outcome.
fn transform_to<W, F>(io: &InputArgs, out: &mut W, op: F) -> bool
where
    W: Write,
    F: FnOnce(&str) -> Result<Value, TransformError>,
{
    let outcome = read_input(io.input.as_deref())
        .map_err(|e| json!({ "error": e.to_string() }))
        .and_then(|body| op(&body).map_err(|e| error_envelope(&e)));

    if io.delete_input {
        if let Some(path) = &io.input {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!("Failed to remove input file {:?}: {}", path, e);
            }
        }
    }

    let (document, ok) = match outcome {
        Ok(response) => (response, true),
        Err(envelope) => {
            tracing::error!("Transform failed: {}", envelope["error"]);
            (envelope, false)
        }
    };

    if let Err(e) = writeln!(out, "{}", document) {
        tracing::error!("Failed to write response: {}", e);
        return false;
    }
    ok
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}
