//! mailmapsync command-line tool.
//!
//! Appends every author/committer identity found in the commit history of
//! the current repository to its `.mailmap`, unless the file already
//! accounts for it. Run with no arguments for the default behaviour.

mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mailmapsync_core::errors::{CoreError, HistoryError};
use mailmapsync_core::history::HistoryBackend;
use mailmapsync_core::{MailmapSync, MatchMode, SyncConfig, SyncReport};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Add missing commit authors and committers to the repository's .mailmap.
#[derive(Parser, Debug)]
#[command(name = "mailmapsync", version, about)]
struct Cli {
    /// Repository root to read history from.
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Mapping file path, relative to the repository root.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// History backend: git-cli or libgit2.
    #[arg(long)]
    backend: Option<HistoryBackend>,

    /// Identity matching: substring or field.
    #[arg(long)]
    match_mode: Option<MatchMode>,

    /// Show what would be added without writing the file.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print a default configuration file and exit.
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides.
    fn resolve_config(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => {
                SyncConfig::load_and_validate(path).context("failed to load configuration file")?
            }
            None => SyncConfig::default(),
        };

        if let Some(file) = &self.file {
            config.mailmap.path = file.clone();
        }
        if let Some(mode) = self.match_mode {
            config.mailmap.match_mode = mode;
        }
        if let Some(backend) = self.backend {
            config.history.backend = backend;
        }
        if self.dry_run {
            config.dry_run = true;
        }

        config.validate().context("invalid configuration")?;
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Text shown on failure. A failed git query is reported as git's own
/// diagnostics, unwrapped.
fn failure_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<CoreError>() {
        Some(CoreError::History(HistoryError::CommandFailed { stderr, .. })) => stderr.clone(),
        _ => format!("Error: {:#}\n", e),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if cli.print_config {
        print!("{}", SyncConfig::default_template());
        return Ok(());
    }

    let config = cli.resolve_config()?;
    let dry_run = config.dry_run;

    let updater = MailmapSync::open(&cli.repo, config)?;
    let report = updater.run()?;

    print_report(&report, dry_run);
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_report(report: &SyncReport, dry_run: bool) {
    let path = report.path.display();
    let count = report.added.len();
    let noun = if count == 1 { "identity" } else { "identities" };

    if dry_run {
        if count == 0 {
            println!("{}", style::dim(&format!("{} already up to date", path)));
            return;
        }
        println!("{}", style::header(&format!("Would add {} {} to {}:", count, noun, path)));
        for identity in &report.added {
            println!("  {}", style::added(identity));
        }
    } else if count > 0 {
        println!("{}", style::success(&format!("Added {} {} to {}", count, noun, path)));
    } else if report.written {
        println!("{}", style::success(&format!("Rewrote {}", path)));
    } else {
        println!("{}", style::dim(&format!("{} already up to date", path)));
    }
}
