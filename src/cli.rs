//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Interactive Hjson-backed configuration panel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: config.hjson next to the binary)
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,

    /// Run these semicolon-separated commands instead of reading stdin
    #[arg(long)]
    pub script: Option<String>,
}

impl Cli {
    /// Split `--script` into individual command lines.
    pub fn script_lines(&self) -> Option<Vec<String>> {
        self.script.as_ref().map(|s| {
            s.split(';')
                .map(|cmd| cmd.trim().to_string())
                .filter(|cmd| !cmd.is_empty())
                .collect()
        })
    }
}
