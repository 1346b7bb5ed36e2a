use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use xreflint::config::{load_config, LintConfig};
use xreflint::linter::{LintOptions, Linter};
use xreflint::report::{render, ReportFormat};

/// Cross-reference integrity linter for multi-file XML corpora.
#[derive(Parser)]
#[command(
    name = "xreflint",
    about = "Cross-reference integrity linter for multi-file XML corpora"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate cross-references across a set of XML documents
    Lint {
        /// Content XML files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Register XML files declaring reusable entries
        #[arg(long = "register", num_args = 1..)]
        registers: Vec<PathBuf>,
        /// Path to a JSON rule configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also report definitions never referenced by any document
        #[arg(long)]
        orphans: bool,
        /// Output format (text, json, or github)
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Maximum input file size in bytes
        #[arg(long)]
        max_file_size: Option<u64>,
    },
    /// Print the effective rule configuration as JSON
    Rules {
        /// Path to a JSON rule configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> xreflint::errors::Result<i32> {
    match cli.command {
        Commands::Lint {
            files,
            registers,
            config,
            orphans,
            format,
            max_file_size,
        } => {
            let format = ReportFormat::from_str(&format).ok_or_else(|| {
                xreflint::errors::LintError::Config {
                    message: format!("unknown output format '{}'", format),
                }
            })?;

            let mut config = load_config(config.as_deref())?;
            if let Some(limit) = max_file_size {
                config.max_file_size = limit;
            }

            let linter = Linter::new(config);
            let docs = linter.load(&files, &registers)?;
            let report = linter.run(
                &docs,
                &LintOptions {
                    report_orphans: orphans,
                },
            )?;

            print!("{}", render(&report, format)?);
            Ok(if report.is_clean() { 0 } else { 1 })
        }
        Commands::Rules { config } => {
            let config: LintConfig = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(0)
        }
    }
}
