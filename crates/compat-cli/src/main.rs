//! Binary entrypoint for the Samsung Internet inference tool.
use clap::{Parser, Subcommand};
use compat_cli::{git, run, RunOptions, DEFAULT_DATA_DIR, DEFAULT_REMOTE};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "compat-infer")]
#[command(about = "Infer Samsung Internet compat data from Chrome for Android")]
struct Cli {
    /// Log every record and field update
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update samsunginternet_android entries in place
    Infer {
        /// JSON files to process (defaults to every file in the checkout)
        paths: Vec<PathBuf>,
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
        #[arg(long, default_value = DEFAULT_REMOTE)]
        remote: String,
        /// YAML file overriding browsers and the mapping table
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Create one branch per top-level folder with that folder's changes
    SplitBranches {
        #[arg(default_value = "master")]
        target: String,
        /// Branch holding the changes (defaults to the current branch)
        source: Option<String>,
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    match cli.command {
        Commands::Infer {
            paths,
            data_dir,
            remote,
            config,
            dry_run,
        } => {
            let summary = run(&RunOptions {
                data_dir,
                remote,
                paths,
                config,
                dry_run,
            })?;
            println!(
                "{} files, {} updated, {} invalid",
                summary.files, summary.updated, summary.malformed
            );
        }
        Commands::SplitBranches {
            target,
            source,
            data_dir,
        } => {
            let summary = git::split_branches(&data_dir, &target, source.as_deref())?;
            for branch in &summary.committed {
                println!("{}", branch);
            }
        }
    }

    Ok(())
}
