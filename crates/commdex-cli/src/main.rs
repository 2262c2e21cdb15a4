//! Commdex CLI - Build and serve a communication search index

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod lifecycle;

use config::{FileConfig, Settings};
use lifecycle::LifecycleController;

#[derive(Parser)]
#[command(name = "commdex")]
#[command(author, version, about = "Build and serve a search index over communications")]
pub struct Cli {
    /// Port the search service listens on
    #[arg(short, long, env = "COMMDEX_PORT")]
    pub port: Option<u16>,

    /// Index directory
    #[arg(short, long, env = "COMMDEX_DIR")]
    pub dir: Option<PathBuf>,

    /// Language served (ISO 639-2/T)
    #[arg(short, long, env = "COMMDEX_LANGUAGE")]
    pub language: Option<String>,

    /// Zip archive or directory of communications to index
    #[arg(long, env = "COMMDEX_DIRECT")]
    pub direct: Option<PathBuf>,

    /// Fetch service host
    #[arg(long = "fh", env = "COMMDEX_FETCH_HOST")]
    pub fetch_host: Option<String>,

    /// Fetch service port
    #[arg(long = "fp", env = "COMMDEX_FETCH_PORT")]
    pub fetch_port: Option<u16>,

    /// Progress interval, and page size when fetching
    #[arg(long, env = "COMMDEX_BATCH")]
    pub batch: Option<usize>,

    /// Let the index tokenize sentence text instead of using supplied tokens
    #[arg(long = "lt", env = "COMMDEX_NATIVE_TOKENIZER")]
    pub native_tokenizer: bool,

    /// Build the index
    #[arg(short = 'b', long, env = "COMMDEX_BUILD_INDEX")]
    pub build_index: bool,

    /// Serve the index
    #[arg(short = 'r', long, env = "COMMDEX_RUN_SEARCH")]
    pub run_search: bool,

    /// TOML file with defaults for the options above
    #[arg(long, env = "COMMDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every record in an index
    Dump {
        /// Index directory
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting commdex");

    if let Some(Commands::Dump { dir }) = &cli.command {
        let stdout = std::io::stdout();
        let count = commdex_index::dump_index(dir, &mut stdout.lock())?;
        tracing::info!("Dumped {} records", count);
        return Ok(());
    }

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(&cli, file)?;
    tracing::debug!("Resolved settings: {:?}", settings);

    // Source selection is checked before anything touches the index
    let ingest = if settings.build {
        Some(settings.ingest_config()?)
    } else {
        None
    };

    let mut controller = LifecycleController::new(&settings.index_dir);

    if let Some(config) = &ingest {
        controller.build(config).await?;
    }

    if settings.serve {
        let mut serving = controller
            .serve(settings.listen_addr(), &settings.language)
            .await?;

        let stopped_early = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Interrupted, shutting down");
                None
            }
            outcome = serving.handle.join() => Some(outcome),
        };

        match stopped_early {
            None => serving.stop().await?,
            Some(outcome) => {
                serving.service.handler().close();
                outcome?;
            }
        }
    }

    Ok(())
}
