//! Trie Granularity - Main entrypoint.
//!
//! Loads the configuration, initializes logging and runs name workloads
//! against a trie of the selected granularity.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use trie_granularity_lib::config::{LogConfig, TrieGranularityConfig};
use trie_granularity_lib::data_structures::RadixTrieConfig;
use trie_granularity_lib::driver::{self, GranularityKind, RunOptions};
use trie_granularity_lib::error::{TrieGranularityError, TrieGranularityResult};

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(name = "trie-granularity", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Insert, look up and optionally remove every name of a file
    Run {
        /// File with one name per line
        #[clap(short, long, value_parser)]
        input: PathBuf,

        /// Comparison granularity
        #[clap(short, long, value_enum, default_value = "component")]
        granularity: GranularityKind,

        /// Only use the first N names
        #[clap(short = 'n', long)]
        count: Option<usize>,

        /// Remove every name after the lookups
        #[clap(short, long)]
        remove: bool,

        /// Print shape statistics
        #[clap(short, long)]
        stats: bool,

        /// Print the report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Run the built-in five name scenario and print the trie
    Warmup {
        /// Comparison granularity
        #[clap(short, long, value_enum, default_value = "component")]
        granularity: GranularityKind,

        /// Remove one name after the lookups
        #[clap(short, long)]
        remove: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> TrieGranularityResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let json_layer = log.json.then(|| {
        fmt::layer()
            .json()
            .with_file(log.source_location)
            .with_line_number(log.source_location)
            .with_writer(std::io::stderr)
    });
    let pretty_layer = (!log.json).then(|| {
        fmt::layer()
            .pretty()
            .with_file(log.source_location)
            .with_line_number(log.source_location)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default())
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| {
            TrieGranularityError::Custom(format!("Failed to set global tracing subscriber: {e}"))
        })
}

/// Main entry point for the application.
fn main() -> TrieGranularityResult<()> {
    let args = Args::parse();

    let config = match trie_granularity_lib::init(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };
    init_logging(&config.log)?;

    let trie_config = RadixTrieConfig::from(&config);

    match args.command {
        Command::Run {
            input,
            granularity,
            count,
            remove,
            stats,
            json,
        } => {
            let names = driver::read_names(&input)?;
            info!(input = %input.display(), names = names.len(), "Loaded names");

            let report = driver::run(granularity, &names, &trie_config, &RunOptions { count, remove })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary());
                if stats {
                    println!("level widths: {:?}", report.stats.level_widths);
                    println!("counters:     {:?}", report.counters);
                }
            }
            Ok(())
        }
        Command::Warmup { granularity, remove } => {
            let report = driver::warmup(granularity, &trie_config, remove)?;
            for name in &report.names {
                println!("{name}");
            }
            println!("all names found: {}", report.all_found);
            println!("unknown name missing: {}", report.missing_not_found);
            if let Some(after) = &report.names_after_remove {
                println!("after removing {}:", driver::WARMUP_REMOVED);
                for name in after {
                    println!("  {name}");
                }
            }
            print!("{}", report.tree);
            Ok(())
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            TrieGranularityConfig::default().write_toml(&output)?;
            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
