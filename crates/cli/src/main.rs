// fruitdex CLI - builds the reconciled catalog from collaborator dumps in storage

mod catalog;
mod exit_codes;
mod storage;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use fruitdex_io::StoreError;
use fruitdex_recon::ReconError;

use exit_codes::{
    EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_IO, EXIT_MALFORMED_SOURCE, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "fruitdex")]
#[command(about = "Reconcile fruit, skin and gamepass listings into one catalog")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the shaped documents in storage and write all.json
    #[command(after_help = "\
Examples:
  fruitdex build
  fruitdex build --storage /srv/fruitdex --json
  fruitdex build --config catalog.toml --output catalog.json
  fruitdex build --strict")]
    Build {
        /// Storage directory holding the shaped documents
        #[arg(long, env = "FRUITDEX_STORAGE", default_value = "storage")]
        storage: PathBuf,

        /// Catalog config (aliases, family bridge); built-in defaults when omitted
        #[arg(long, env = "FRUITDEX_CONFIG")]
        config: Option<PathBuf>,

        /// Write the catalog here instead of <storage>/all.json
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print summary and report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Exit 6 when the report has mismatches or unresolved names
        #[arg(long)]
        strict: bool,
    },

    /// Shape raw dumps in storage into per-kind documents
    Shape {
        #[arg(long, env = "FRUITDEX_STORAGE", default_value = "storage")]
        storage: PathBuf,
    },

    /// Write info.json from the embedded metadata seed
    Seed {
        #[arg(long, env = "FRUITDEX_STORAGE", default_value = "storage")]
        storage: PathBuf,

        /// Overwrite an existing info.json
        #[arg(long)]
        force: bool,
    },

    /// Show freshness of every well-known storage document
    Status {
        #[arg(long, env = "FRUITDEX_STORAGE", default_value = "storage")]
        storage: PathBuf,

        /// Freshness window in seconds
        #[arg(long, default_value_t = 7200)]
        ttl: u64,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a catalog config without building
    #[command(after_help = "\
Examples:
  fruitdex validate catalog.toml")]
    Validate {
        /// Path to the catalog TOML file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build { storage, config, output, json, strict } => {
            catalog::cmd_build(storage, config, output, json, strict)
        }
        Commands::Shape { storage } => storage::cmd_shape(storage),
        Commands::Seed { storage, force } => storage::cmd_seed(storage, force),
        Commands::Status { storage, ttl, json } => storage::cmd_status(storage, ttl, json),
        Commands::Validate { config } => catalog::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::Io { .. } | StoreError::Missing(_) => EXIT_IO,
            StoreError::Json { .. } | StoreError::Shape(_) => EXIT_MALFORMED_SOURCE,
        };
        let hint = match &err {
            StoreError::Missing(_) => {
                Some("place raw dumps in storage and run `fruitdex shape` first".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = match &err {
            ReconError::Io(_) => EXIT_IO,
            ReconError::ConfigParse(_)
            | ReconError::ConfigValidation(_)
            | ReconError::AliasChain { .. }
            | ReconError::BridgeSelfTarget(_) => EXIT_INVALID_CONFIG,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}
