use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Record checks and output format shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    /// Exact number of columns each record must have
    #[arg(short, long)]
    pub columns: Option<usize>,

    /// Column type descriptor, e.g. "int;string;*"
    #[arg(short, long)]
    pub types: Option<String>,

    /// Emit one JSON object per record
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Try every offset of a file and print each record that parses
    Scan {
        /// File or disk image to scan
        file: PathBuf,

        #[command(flatten)]
        record: RecordArgs,

        /// First offset to try (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0", value_parser = parse_offset)]
        start: usize,

        /// Offset to stop before (decimal or 0x-prefixed hex)
        #[arg(long, value_parser = parse_offset)]
        end: Option<usize>,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Resume after the end of each recovered cell
        #[arg(long)]
        skip_recovered: bool,

        /// Parse candidate offsets on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Parse the record whose leaf cell starts at one offset
    Parse {
        /// File or disk image to read
        file: PathBuf,

        /// Offset of the leaf cell marker (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: usize,

        #[command(flatten)]
        record: RecordArgs,
    },
}

/// Parses a decimal or `0x`-prefixed hexadecimal offset.
pub fn parse_offset(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse::<usize>(),
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", s, e))
}
