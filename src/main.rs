use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use hk_rewrite::{
    load_from_path, ConversionError, ExclusionPolicy, FileRecord, HongKongTransform,
    ProgressSink, Summary, Transform, TreeRewriter,
};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hk-rewrite")]
#[command(
    about = "Convert Simplified Chinese text files to Traditional Chinese (Hong Kong) in place",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Directory to convert
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Dry run - report which files would change without writing them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,

    /// TOML file overriding the exclusion policy
    #[arg(short, long, env = "HK_REWRITE_CONFIG")]
    config: Option<PathBuf>,

    /// Log skipped files and pruned directories
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.root.is_dir() {
        anyhow::bail!("{} is not a valid directory", cli.root.display());
    }

    let policy = match &cli.config {
        Some(path) => load_from_path(path)?.to_policy(),
        None => ExclusionPolicy::default(),
    };

    let transform = HongKongTransform;
    cmd_convert(&cli, policy, &transform)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "hk_rewrite=debug" } else { "hk_rewrite=error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_convert(cli: &Cli, policy: ExclusionPolicy, transform: &dyn Transform) -> Result<()> {
    let absolute = cli
        .root
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", cli.root.display()))?;

    println!("Converting: {}", absolute.display());
    println!("Profile: {}", transform.name());
    if cli.dry_run {
        println!("{}", "[DRY RUN - no files will be written]".cyan());
    }
    println!("{}", "-".repeat(60).dimmed());

    let mut sink = ConsoleSink {
        dry_run: cli.dry_run,
        show_diff: cli.diff,
    };
    let summary = TreeRewriter::new(policy, transform)
        .dry_run(cli.dry_run)
        .run_with_sink(&cli.root, &mut sink)?;

    if summary.errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Coloured per-file progress on stdout, errors on stderr.
struct ConsoleSink {
    dry_run: bool,
    show_diff: bool,
}

impl ProgressSink for ConsoleSink {
    fn converted(&mut self, record: &FileRecord) {
        let verb = if self.dry_run { "Would convert" } else { "Converted" };
        println!("{} {}: {}", "✓".green(), verb, record.path.display());

        if self.show_diff {
            display_diff(&record.path, &record.original, &record.converted);
        }
    }

    fn failed(&mut self, error: &ConversionError) {
        eprintln!("{} {}", "✗".red(), error);
    }

    fn finished(&mut self, summary: &Summary) {
        println!();
        println!("{}", "Summary:".bold());
        println!("  {} converted", format!("{}", summary.converted).green());
        println!("  {} errors", format!("{}", summary.errors).red());
    }
}

/// Show unified diff between original and converted content
fn display_diff(file: &Path, original: &str, converted: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (converted)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, converted);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", line);
        if change.missing_newline() {
            println!();
        }
    }
}
