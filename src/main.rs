use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod export;
mod watch;

use export::{ArticleSource, DocTarget, TranslateFormat};

#[derive(Parser)]
#[command(name = "ghostdoc", version, about = "Turn generated article HTML into formatted document exports")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to ghostdoc.json (default: ./ghostdoc.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Naming of the exported document.
#[derive(Args, Clone)]
struct TargetArgs {
    /// Publication the article is written for
    #[arg(long)]
    publication: String,

    /// Issue month, as it should appear in the title
    #[arg(long)]
    month: String,

    /// Issue year (default: current year)
    #[arg(long)]
    year: Option<i32>,
}

impl TargetArgs {
    fn into_target(self) -> DocTarget {
        DocTarget {
            publication: self.publication,
            month: self.month,
            year: self.year.unwrap_or_else(|| chrono::Local::now().year()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten an HTML file into text, style ranges and style operations
    Translate {
        /// Path to the HTML fragment
        file: PathBuf,

        /// Insertion index of the first character
        #[arg(long)]
        base: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: TranslateFormat,
    },

    /// Plan the export of an article draft
    Export {
        /// Path to the article HTML
        file: PathBuf,

        /// Plain-text version used when the HTML cannot be parsed
        #[arg(long)]
        plain: Option<PathBuf>,

        #[command(flatten)]
        target: TargetArgs,

        /// Export as the final version instead of a draft
        #[arg(long = "final")]
        is_final: bool,

        /// Insertion index of the first character (default: config baseOffset)
        #[arg(long)]
        base: Option<usize>,

        /// Write the plan here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Plan the export of an interview transcription
    Transcript {
        /// Path to the transcription text
        file: PathBuf,

        #[command(flatten)]
        target: TargetArgs,

        /// Topic headline
        #[arg(long)]
        headline: Option<String>,

        /// Topic angle
        #[arg(long)]
        angle: Option<String>,

        /// Write the plan here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Strip em dashes and stock LLM phrasing from generated copy
    Sanitize {
        /// Path to the text or HTML file
        file: PathBuf,

        /// Rewrite the file instead of printing the result
        #[arg(long)]
        in_place: bool,
    },

    /// Re-plan an article export whenever the draft changes
    Watch {
        /// Path to the article HTML
        file: PathBuf,

        /// Plain-text version, also watched, used when the HTML cannot be parsed
        #[arg(long)]
        plain: Option<PathBuf>,

        #[command(flatten)]
        target: TargetArgs,

        /// Export as the final version instead of a draft
        #[arg(long = "final")]
        is_final: bool,

        /// Insertion index of the first character (default: config baseOffset)
        #[arg(long)]
        base: Option<usize>,

        /// Write the plan here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Plan exports for every HTML file under a directory
    Batch {
        /// Directory containing article HTML files
        dir: PathBuf,

        #[command(flatten)]
        target: TargetArgs,

        /// Export as final versions instead of drafts
        #[arg(long = "final")]
        is_final: bool,

        /// Directory receiving one JSON plan per article
        #[arg(long)]
        out: PathBuf,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    // --verbose and --quiet win over RUST_LOG; otherwise default to WARN
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Translate { file, base, format } => {
            export::handle_translate(&file, base.unwrap_or(config.base_offset), format)?;
        }
        Commands::Export {
            file,
            plain,
            target,
            is_final,
            base,
            out,
        } => {
            let source = ArticleSource {
                html: &file,
                plain: plain.as_deref(),
                is_final,
                base_offset: base.unwrap_or(config.base_offset),
            };
            export::handle_export(&config, &target.into_target(), &source, out.as_deref(), cli.quiet)?;
        }
        Commands::Transcript {
            file,
            target,
            headline,
            angle,
            out,
        } => {
            export::handle_transcript(
                &config,
                &target.into_target(),
                &file,
                headline.as_deref(),
                angle.as_deref(),
                out.as_deref(),
                cli.quiet,
            )?;
        }
        Commands::Sanitize { file, in_place } => {
            export::handle_sanitize(&file, in_place, cli.quiet)?;
        }
        Commands::Watch {
            file,
            plain,
            target,
            is_final,
            base,
            out,
        } => {
            let source = ArticleSource {
                html: &file,
                plain: plain.as_deref(),
                is_final,
                base_offset: base.unwrap_or(config.base_offset),
            };
            watch::watch_and_export(&config, &target.into_target(), &source, out.as_deref(), cli.quiet)?;
        }
        Commands::Batch {
            dir,
            target,
            is_final,
            out,
        } => {
            let report = export::run_batch(&config, &target.into_target(), &dir, &out, is_final)?;
            if !cli.quiet {
                report.print_summary();
            }
            if !report.failed.is_empty() {
                anyhow::bail!("{} file(s) failed to export", report.failed.len());
            }
        }
    }

    Ok(())
}
