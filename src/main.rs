use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use rad_compiler::log_format::TargetFirstFormat;

#[derive(Parser, Debug)]
#[command(
    name = "rad-compiler",
    version,
    about = "Compile RAD annex CSV exports into a normalized SQLite rule database."
)]
struct Cli {
    /// SQLite database to create or update
    #[arg(long, env = "RAD_DATABASE_PATH", default_value = "rad_master.db")]
    database: String,

    /// Directory holding the Annex_*.csv exports
    #[arg(long, env = "RAD_SOURCE_DIR", default_value = ".")]
    source_dir: PathBuf,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .event_format(TargetFirstFormat)
                .with_writer(std::io::stderr),
        )
        .init();

    let report = rad_compiler::compile(&cli.database, &cli.source_dir)?;

    info!(
        "RAD database written to {} ({} stages run)",
        cli.database,
        report.stages.len()
    );
    Ok(())
}
