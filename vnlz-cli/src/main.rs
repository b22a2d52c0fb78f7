//! vnlz CLI - decode and encode LZSS streams from visual-novel containers.
//!
//! The container itself (archive index, header, obfuscation) is out of scope:
//! the input is expected to be a raw compressed stream, optionally preceded
//! by a 32-bit unpacked size.

mod commands;
mod config;
mod utils;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{cmd_batch, cmd_decode, cmd_dialects, cmd_encode};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vnlz_lzss::SizePrefix;

#[derive(Parser)]
#[command(name = "vnlz")]
#[command(author, version, about = "Table-driven LZSS decoder for visual-novel containers")]
#[command(long_about = "
vnlz decodes the LZSS-family streams used by many visual-novel engines.
Each engine variant is selected by a dialect tag; run `vnlz dialects` for the list.

Examples:
  vnlz dialects
  vnlz decode script.lz -o script.bin -d okumura --size 18244
  vnlz decode image.cmp -o image.raw -d shin --prefix le32 --skip 16
  vnlz encode script.bin -o script.lz -d lz10 --prefix le32
  vnlz batch 'data/*.cmp' -o out -d hotel-dusk --prefix le32 --progress
  vnlz --config engines.json decode bg01.dat -o bg01.raw -d my-engine --prefix be32
")]
struct Cli {
    /// JSON file with additional dialect tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available dialects
    #[command(alias = "ls")]
    Dialects {
        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decode one compressed stream
    #[command(alias = "d")]
    Decode {
        /// Compressed input file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Dialect tag or alias
        #[arg(short, long)]
        dialect: String,

        /// Declared unpacked size
        #[arg(short, long, required_unless_present = "prefix", conflicts_with = "prefix")]
        size: Option<usize>,

        /// Read the unpacked size from a 32-bit prefix (le32, be32)
        #[arg(short, long)]
        prefix: Option<SizePrefix>,

        /// Skip this many bytes of container header first
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Fail if the stream ends before the declared size
        #[arg(long)]
        strict: bool,

        /// Write the full declared size, zero-padding a short result
        #[arg(long)]
        pad: bool,
    },

    /// Compress a file into a stream of the given dialect
    #[command(alias = "e")]
    Encode {
        /// Input file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Dialect tag or alias
        #[arg(short, long)]
        dialect: String,

        /// Prepend a 32-bit unpacked size (le32, be32)
        #[arg(short, long)]
        prefix: Option<SizePrefix>,
    },

    /// Decode many size-prefixed streams in parallel
    Batch {
        /// Input files or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Dialect tag or alias
        #[arg(short, long)]
        dialect: String,

        /// Size prefix of every input (le32, be32)
        #[arg(short, long, default_value = "le32")]
        prefix: SizePrefix,

        /// Skip this many bytes of container header in every input
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Treat short streams as failures
        #[arg(long)]
        strict: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Print shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Dialects { json } => cmd_dialects(&config, json),
        Commands::Decode {
            input,
            output,
            dialect,
            size,
            prefix,
            skip,
            strict,
            pad,
        } => cmd_decode(
            &config,
            &commands::DecodeArgs {
                input: &input,
                output: &output,
                dialect: &dialect,
                size,
                prefix,
                skip,
                strict,
                pad,
            },
        ),
        Commands::Encode {
            input,
            output,
            dialect,
            prefix,
        } => cmd_encode(&config, &input, &output, &dialect, prefix),
        Commands::Batch {
            patterns,
            output,
            dialect,
            prefix,
            skip,
            strict,
            progress,
        } => cmd_batch(
            &config,
            &commands::BatchArgs {
                patterns: &patterns,
                output: &output,
                dialect: &dialect,
                prefix,
                skip,
                strict,
                progress,
            },
        ),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "vnlz", &mut std::io::stdout());
            Ok(())
        }
    }
}
