use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod convert;
mod info;
mod validate;

mod config;

/// mzxml - Streaming mzXML reader, writer and validator
#[derive(Parser)]
#[command(name = "mzxml")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a summary of an mzXML file
    Info {
        /// Input mzXML file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dump the whole parsed run as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Re-serialize an mzXML file as mzXML 2.0
    Convert {
        /// Input mzXML file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path (defaults to <INPUT stem>.2_0.mzXML)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// TOML file with [read] and [write] settings
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Escape markup characters in comments and other free text
        #[arg(long)]
        escape_text: bool,

        /// Write an empty index instead of scan offsets
        #[arg(long)]
        no_index: bool,
    },

    /// Validate mzXML file integrity and consistency
    Validate {
        /// Input mzXML file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file, json } => info::run(file, json),
        Commands::Convert {
            input,
            output,
            config,
            escape_text,
            no_index,
        } => convert::run(input, output, config, escape_text, no_index),
        Commands::Validate { file } => validate::run(file),
    }
}
