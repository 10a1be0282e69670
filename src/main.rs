//! # Vault CLI (`vault`)
//!
//! Pairs every file in a content directory with a Markdown note and keeps
//! the pairings in a SQLite catalog.
//!
//! ## Usage
//!
//! ```bash
//! vault --config ./vault.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vault init` | Create the catalog database and schema |
//! | `vault index` | Create missing notes and catalog entries |
//! | `vault validate` | Report catalog entries whose files are missing |
//! | `vault stats` | Summarize the catalog |

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vault_catalog::{config, migrate, stats, sync, validate};

/// Vault catalog: pair content files with Markdown notes, tracked in SQLite.
#[derive(Parser)]
#[command(name = "vault", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./vault.toml")]
    config: PathBuf,

    /// Log more to stderr (`-v` info, `-vv` debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the catalog schema.
    ///
    /// Creates the SQLite file and the `notes` table. Idempotent.
    Init,

    /// Index the content folder and create missing notes.
    ///
    /// Notes that already exist are never rewritten, and artifacts already
    /// in the catalog are skipped, so repeated runs are safe.
    Index {
        /// Show what would be indexed without writing notes or catalog rows.
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that every cataloged note and content file still exists.
    Validate {
        /// Print the drift reports as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show catalog statistics.
    Stats,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Catalog initialized at {}", cfg.catalog_path().display());
        }
        Commands::Index { dry_run } => {
            sync::run_index(&cfg, dry_run).await?;
        }
        Commands::Validate { json } => {
            validate::run_validate(&cfg, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
