//! `nvmf-config`: inspect and normalize NVMe over Fabrics configuration files.

mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fabric_config::{ConfigOptions, DEFAULT_CONFIG_PATH, Destination, FabricConfig};
use fabric_keyring::{DEFAULT_KEYRING, MemoryKeyring};
use fabric_topology::Root;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "nvmf-config", version, about = "Inspect and normalize NVMe-oF fabrics configuration")]
struct Cli {
    /// Configuration document to read.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Keyring TLS keys go to when a port names none.
    #[arg(long, global = true, default_value = DEFAULT_KEYRING)]
    keyring: String,

    /// Write single-line JSON instead of indented output.
    #[arg(long, global = true)]
    compact: bool,

    /// Increase log verbosity (repeat for more).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the document and print the full topology snapshot.
    Show,
    /// Load the document and write it back in canonical form.
    Normalize {
        /// Write here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load the document and print what was imported.
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = ConfigOptions::new()
        .with_config_path(&cli.config)
        .with_default_keyring(&cli.keyring)
        .with_pretty(!cli.compact);
    let config = FabricConfig::with_options(Arc::new(MemoryKeyring::new()), options)?;

    let mut root = Root::new();
    let summary = config
        .load_default(&mut root)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    info!(
        hosts = summary.hosts,
        ports = summary.ports,
        skipped = summary.skipped,
        "loaded configuration"
    );

    match cli.command {
        Command::Show => {
            let mut stdout = io::stdout().lock();
            config.dump(&root, &mut stdout)?;
            writeln!(stdout)?;
        }
        Command::Normalize { output } => {
            let destination = output
                .as_deref()
                .map_or(Destination::Stdout, Destination::Path);
            config
                .store(&root, destination)
                .context("failed to write configuration")?;
        }
        Command::Check => {
            let report = if cli.compact {
                serde_json::to_string(&summary)?
            } else {
                serde_json::to_string_pretty(&summary)?
            };
            println!("{report}");
        }
    }
    Ok(())
}
