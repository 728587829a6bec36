use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// XPath Rule Coverage - Verify rule examples exercise every XPath feature
#[derive(Parser, Debug)]
#[command(name = "xpath-rule-coverage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check example coverage for every XPath rule in a ruleset
    Check {
        /// Path to ruleset XML file (use - for stdin)
        #[arg(short, long)]
        ruleset: PathBuf,

        /// Check only the rule with this name
        #[arg(long)]
        rule: Option<String>,

        /// Run the analysis engine against generated example sources
        #[arg(long)]
        run_engine: bool,

        /// Engine binary to invoke
        #[arg(long, env = "XPATH_COVERAGE_ENGINE")]
        engine_bin: Option<String>,

        /// Engine timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write an LCOV trace of covered rule lines to this path
        #[arg(long)]
        lcov: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Show the extracted XPath structure without running checks
        #[arg(long)]
        dry_run: bool,

        /// Enable verbose output with per-file engine lines
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
