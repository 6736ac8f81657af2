//! CLI entry point for the gin-ingest loader.

use std::path::Path;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use gin_client::GinClient;
use gin_ingest::clock::SystemClock;
use gin_ingest::config::{IngestConfig, OpenGinConfig};
use gin_ingest::orchestrator::Ingestor;
use gin_ingest::source::SourceTables;
use gin_ingest::verify::verify_ingestion;

/// Config file prefix, resolved as `gin.toml` etc. in the working directory.
const CONFIG_FILE: &str = "gin";

#[derive(Parser)]
#[command(name = "gin-ingest")]
#[command(about = "Load tabular data into an OpenGIN graph store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest all source tables, then verify.
    Create,
    /// Verify ingestion results only.
    Verify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };

    let (ingest_config, opengin_config) = load_config(CONFIG_FILE);
    let client = GinClient::new(&opengin_config.client_config())?;

    match command {
        Command::Create => {
            let sources = SourceTables::load(Path::new(&ingest_config.data_dir), &ingest_config)?;
            let clock = SystemClock;
            let report = Ingestor::new(&client, &sources, &clock).run().await;
            if !report.all_ok() {
                tracing::warn!(
                    run_id = %report.run_id,
                    create_failed = report.create.failed(),
                    link_failed = report.link.failed(),
                    "Some writes failed"
                );
            }
            verify_ingestion(&client, &ingest_config.verify_major_kind).await;
        }
        Command::Verify => {
            verify_ingestion(&client, &ingest_config.verify_major_kind).await;
        }
    }

    Ok(())
}

fn load_config(file_prefix: &str) -> (IngestConfig, OpenGinConfig) {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("GIN")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    let cfg = match cfg {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "Config unreadable, using defaults");
            return (IngestConfig::default(), OpenGinConfig::default());
        }
    };

    let ingest = cfg.get::<IngestConfig>("ingest").unwrap_or_default();
    let opengin = cfg.get::<OpenGinConfig>("opengin").unwrap_or_default();
    (ingest, opengin)
}
