use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};

use dedupe_core::progress::ProgressEvent;
use dedupe_core::{Config, Deduper, Mode, RunOutcome};

#[derive(Parser)]
#[command(name = "image-dedupe")]
#[command(about = "Find and resolve visually duplicate images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directories for duplicate images
    Scan(ScanArgs),

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "image-dedupe.json")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Directories to scan for duplicate images
    #[arg(required = true)]
    directories: Vec<PathBuf>,

    /// Maximum fingerprint distance for two images to count as duplicates
    #[arg(long)]
    threshold: Option<u32>,

    /// Run without making changes, overriding any configured mode
    #[arg(long, conflicts_with_all = ["delete", "move_to"])]
    dry_run: bool,

    /// Delete duplicates instead of flagging them
    #[arg(long, conflicts_with = "move_to")]
    delete: bool,

    /// Move duplicates into this directory instead of flagging them
    #[arg(long, value_name = "DIR")]
    move_to: Option<PathBuf>,

    /// Write a CSV report of every action taken
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Number of worker threads (0 = available CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Maximum directory depth for scanning
    #[arg(long)]
    max_depth: Option<usize>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Override file/default configuration with command line arguments.
/// `--dry-run` beats a configured delete or move mode.
fn apply_overrides(config: &mut Config, args: &ScanArgs) {
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = Some(max_depth);
    }
    if args.dry_run {
        config.mode = Mode::DryRun;
    } else if args.delete {
        config.mode = Mode::Delete;
    } else if let Some(target) = &args.move_to {
        config.mode = Mode::Move(target.clone());
    }
    if let Some(report) = &args.report {
        config.report_path = Some(report.clone());
    }
}

fn main() -> Result<(), anyhow::Error> {
    // File-only logging; the terminal belongs to the progress bar
    dedupe_core::logging::init_logger("logs")
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => {
            // Set log level based on verbosity
            match args.verbose {
                0 => {}
                1 => log::set_max_level(LevelFilter::Debug),
                _ => log::set_max_level(LevelFilter::Trace),
            }

            // Set up configuration
            let mut config = if let Some(config_path) = &args.config {
                Config::from_file(config_path)?
            } else {
                Config::default()
            };

            apply_overrides(&mut config, &args);

            let dry_run = config.mode.is_dry_run();
            let report_path = config.report_path.clone();

            // Initialize deduplicator; configuration errors are fatal here,
            // before anything touches the filesystem
            let deduper = Deduper::new(config)?.with_observer(render_progress());

            info!("Starting image deduplication...");
            let outcome = deduper.run(&args.directories)?;
            info!("Deduplication complete");

            print_summary(&outcome, dry_run, report_path.as_deref());
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

/// Observer that renders pipeline events as an indicatif bar
fn render_progress() -> impl Fn(ProgressEvent) + Send + Sync + 'static {
    let bar = Mutex::new(None::<ProgressBar>);

    move |event| {
        let mut bar = bar.lock().unwrap();
        match event {
            ProgressEvent::InspectStarted { total } => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                        .unwrap()
                        .progress_chars("##-"),
                );
                pb.set_message("Hashing images...");
                *bar = Some(pb);
            }
            ProgressEvent::Inspected { done } => {
                if let Some(pb) = bar.as_ref() {
                    pb.set_position(done as u64);
                }
            }
            ProgressEvent::Grouped { .. } => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
            ProgressEvent::Resolved { .. } => {}
        }
    }
}

fn print_summary(outcome: &RunOutcome, dry_run: bool, report_path: Option<&std::path::Path>) {
    let s = &outcome.summary;
    println!("Inspected: {}", s.inspected);
    println!("Skipped:   {}", s.skipped);
    println!("Duplicate groups: {}", s.groups);
    println!("Kept:      {}", s.kept);
    if dry_run {
        println!("Flagged:   {} (dry run, nothing changed)", s.actions);
    } else {
        println!("Resolved:  {} ({} failed)", s.actions, s.failed_actions);
    }

    for skip in &outcome.skipped {
        println!("  skipped {}: {}", skip.path.display(), skip.reason);
    }

    if let Some(path) = report_path {
        println!("Report written to {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_args() -> ScanArgs {
        ScanArgs {
            directories: vec![PathBuf::from(".")],
            threshold: None,
            dry_run: false,
            delete: false,
            move_to: None,
            report: None,
            threads: None,
            max_depth: None,
            verbose: 0,
            config: None,
        }
    }

    #[test]
    fn dry_run_flag_overrides_configured_delete_mode() {
        let mut config = Config {
            mode: Mode::Delete,
            ..Config::default()
        };
        let args = ScanArgs {
            dry_run: true,
            ..scan_args()
        };

        apply_overrides(&mut config, &args);
        assert_eq!(config.mode, Mode::DryRun);
    }

    #[test]
    fn dry_run_flag_overrides_configured_move_mode() {
        let mut config = Config {
            mode: Mode::Move(PathBuf::from("dupes")),
            ..Config::default()
        };
        let args = ScanArgs {
            dry_run: true,
            ..scan_args()
        };

        apply_overrides(&mut config, &args);
        assert_eq!(config.mode, Mode::DryRun);
    }

    #[test]
    fn delete_flag_overrides_default_mode() {
        let mut config = Config::default();
        let args = ScanArgs {
            delete: true,
            ..scan_args()
        };

        apply_overrides(&mut config, &args);
        assert_eq!(config.mode, Mode::Delete);
    }

    #[test]
    fn without_mode_flags_configured_mode_survives() {
        let mut config = Config {
            mode: Mode::Delete,
            threshold: 3,
            ..Config::default()
        };
        let args = ScanArgs {
            threshold: Some(10),
            ..scan_args()
        };

        apply_overrides(&mut config, &args);
        assert_eq!(config.mode, Mode::Delete);
        assert_eq!(config.threshold, 10);
    }

    #[test]
    fn dry_run_conflicts_with_delete_and_move() {
        use clap::CommandFactory;
        let result = Cli::command().try_get_matches_from([
            "image-dedupe",
            "scan",
            "pics",
            "--dry-run",
            "--delete",
        ]);
        assert!(result.is_err());

        let result = Cli::command().try_get_matches_from([
            "image-dedupe",
            "scan",
            "pics",
            "--dry-run",
            "--move-to",
            "dupes",
        ]);
        assert!(result.is_err());
    }
}
