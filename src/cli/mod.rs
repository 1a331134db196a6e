use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Create a new ZIP archive from the specified files.
    #[command(alias = "c")]
    Create {
        /// One or more input files to add to the archive.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// The path for the output archive file (e.g., backup.zip).
        #[arg(short, long)]
        output: PathBuf,

        /// Deflate compression level (0-9). Higher levels compress better at
        /// the cost of speed.
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,

        /// Number of parallel worker threads. [0 = auto-detect based on CPU cores]
        #[arg(long, default_value_t = 0)]
        threads: usize,

        /// Suppress the progress line.
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the contents of an archive without extracting it.
    #[command(alias = "l")]
    List {
        /// The archive file to inspect.
        #[arg(required = true)]
        archive: PathBuf,
    },
}

pub fn run() -> Result<Args, clap::Error> {
    Args::try_parse()
}
