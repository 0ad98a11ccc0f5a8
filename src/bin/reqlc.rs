//! reqlc - ReQL wire query tool
//!
//! Inspect the term catalog and validate, normalise or explain JSON wire
//! queries.
//!
//! # Examples
//!
//! ```bash
//! # List every term type with its arity and optargs
//! reqlc terms
//!
//! # Validate a query and print its canonical encoding
//! echo '[39, [[15, ["users"]], {"age": 25}]]' | reqlc encode -
//!
//! # Show the decoded term tree
//! reqlc explain query.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reqlwire::config::{LoggingConfig, ReqlConfig};
use reqlwire::reql::{OptArgSpec, TermType, WireDecoder};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ReQL wire query tool
#[derive(Parser, Debug)]
#[command(name = "reqlc")]
#[command(version = reqlwire::VERSION)]
#[command(about = "Inspect, validate and normalise ReQL wire queries", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "REQLWIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(long, global = true, env = "REQLWIRE_LOG")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the term catalog
    Terms {
        /// Only show the term with this name (e.g. FILTER)
        #[arg(long)]
        name: Option<String>,
    },

    /// Decode, validate and re-encode a wire query
    Encode(InputArgs),

    /// Print the decoded term tree
    Explain(InputArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ReqlConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_logging(&config.logging)?;
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Terms { name } => print_terms(name.as_deref()),
        Commands::Encode(args) => encode(&config, &args),
        Commands::Explain(args) => explain(&args),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&logging.level)
        .with_context(|| format!("Invalid log level: {}", logging.level))?;

    // Logs go to stderr so encoded output on stdout stays clean.
    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn read_input(path: &PathBuf) -> Result<String> {
    let mut text = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
    } else {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(text)
}

fn encode(config: &ReqlConfig, args: &InputArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let term = WireDecoder::decode_str(&text).context("Invalid wire query")?;
    let wire = config.encoder.encoder().encode(&term)?;

    let output = if args.pretty || config.encoder.pretty {
        serde_json::to_string_pretty(&wire)?
    } else {
        serde_json::to_string(&wire)?
    };
    info!(term_type = %term.term_type(), bytes = output.len(), "Encoded query");
    println!("{}", output);
    Ok(())
}

fn explain(args: &InputArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let term = WireDecoder::decode_str(&text).context("Invalid wire query")?;
    println!("{}", term);
    Ok(())
}

fn print_terms(name: Option<&str>) -> Result<()> {
    let selected: Vec<TermType> = match name {
        Some(name) => {
            let term_type = TermType::from_name(&name.to_uppercase())
                .with_context(|| format!("Unknown term type: {}", name))?;
            vec![term_type]
        }
        None => TermType::ALL.to_vec(),
    };

    println!("{:>5}  {:<18} {:<12} OPTARGS", "TAG", "NAME", "ARITY");
    for term_type in selected {
        let signature = term_type.signature();
        let optargs = match signature.optargs {
            OptArgSpec::None => "-".to_string(),
            OptArgSpec::Only(names) => names.join(", "),
            OptArgSpec::Any => "(any)".to_string(),
        };
        println!(
            "{:>5}  {:<18} {:<12} {}",
            term_type.to_u64(),
            term_type.name(),
            signature.arity.to_string(),
            optargs
        );
    }
    Ok(())
}
