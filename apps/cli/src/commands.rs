//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use mdparts_core::run::ProgressReporter;
use mdparts_shared::{
    AppConfig, MdPartsError, MergeOptions, SortOrder, init_config, init_config_at, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mdparts — merge numbered markdown directories into single documents.
#[derive(Parser)]
#[command(
    name = "mdparts",
    version,
    about = "Merge the markdown files of each numbered directory into part_<NN>.md.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.mdparts/mdparts.toml.
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Defaults to `merge` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Merge every numbered directory under the scan root.
    Merge(MergeArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `merge`. Each one overrides the config file.
#[derive(Args, Default)]
pub(crate) struct MergeArgs {
    /// Directory to scan for numbered subdirectories.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Show what would be written without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep processing remaining directories after a failure.
    #[arg(long, conflicts_with = "no_keep_going")]
    pub keep_going: bool,

    /// Stop at the first failure even if the config enables keep_going.
    #[arg(long)]
    pub no_keep_going: bool,

    /// Order digit runs by value (2.md before 10.md).
    #[arg(long, conflicts_with = "lexical_sort")]
    pub natural_sort: bool,

    /// Plain ordinal ordering even if the config selects natural.
    #[arg(long)]
    pub lexical_sort: bool,

    /// Let an existing part_<NN>.md be read as one of its own inputs.
    #[arg(long, conflicts_with = "exclude_output")]
    pub include_output: bool,

    /// Leave part_<NN>.md out of its inputs even if the config includes it.
    #[arg(long)]
    pub exclude_output: bool,

    /// Leading part of merged file names (default: part_).
    #[arg(long)]
    pub output_prefix: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only the progress lines.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = format!("mdparts_cli={level},mdparts_core={level},mdparts_shared={level}");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_file;
    match cli.command {
        None => cmd_merge(config_path.as_deref(), &MergeArgs::default_root()),
        Some(Command::Merge(args)) => cmd_merge(config_path.as_deref(), &args),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(config_path.as_deref()),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

impl MergeArgs {
    /// Arguments equivalent to a bare `mdparts` invocation.
    fn default_root() -> Self {
        Self {
            root: PathBuf::from("."),
            ..Self::default()
        }
    }
}

/// Load the explicit config file, or the default one if present.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Layer CLI flags over the config file.
fn merge_options(config: &AppConfig, args: &MergeArgs) -> MergeOptions {
    let mut options = MergeOptions::from(config);
    if args.dry_run {
        options.dry_run = true;
    }
    if args.keep_going {
        options.keep_going = true;
    }
    if args.no_keep_going {
        options.keep_going = false;
    }
    if args.natural_sort {
        options.sort = SortOrder::Natural;
    }
    if args.lexical_sort {
        options.sort = SortOrder::Lexical;
    }
    if args.include_output {
        options.exclude_output = false;
    }
    if args.exclude_output {
        options.exclude_output = true;
    }
    if let Some(prefix) = &args.output_prefix {
        options.output_prefix = prefix.clone();
    }
    options
}

fn cmd_merge(config_path: Option<&Path>, args: &MergeArgs) -> Result<()> {
    let config = resolve_config(config_path)?;
    let options = merge_options(&config, args);

    info!(
        root = %args.root.display(),
        sort = %options.sort,
        dry_run = options.dry_run,
        keep_going = options.keep_going,
        "merging numbered directories"
    );

    let summary = mdparts_core::run::run(&args.root, &options, &ConsoleProgress)?;

    if !summary.is_clean() {
        return Err(eyre!(
            "{} of {} directories failed",
            summary.failures.len(),
            summary.failures.len() + summary.outcomes.len()
        ));
    }

    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(p) => {
            init_config_at(p)?;
            p.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Console progress reporter
// ---------------------------------------------------------------------------

/// Prints the human-readable progress lines to stdout.
struct ConsoleProgress;

/// Show paths under the current directory without a leading `./`.
fn shown(path: &Path) -> std::path::Display<'_> {
    path.strip_prefix(".").unwrap_or(path).display()
}

fn started_line(dir: &Path) -> String {
    format!("\nProcessing directory: {}", shown(dir))
}

fn created_line(output: &Path) -> String {
    format!("Created {}", shown(output))
}

fn skipped_line(dir: &Path) -> String {
    format!("No markdown files found in {}", shown(dir))
}

fn failed_line(dir: &Path, error: &MdPartsError) -> String {
    format!("Failed to merge {}: {error}", shown(dir))
}

impl ProgressReporter for ConsoleProgress {
    fn directory_started(&self, dir: &Path) {
        println!("{}", started_line(dir));
    }

    fn merged(&self, output: &Path, _sections: usize) {
        println!("{}", created_line(output));
    }

    fn skipped(&self, dir: &Path) {
        println!("{}", skipped_line(dir));
    }

    fn planned(&self, output: &Path, inputs: &[PathBuf]) {
        println!("Would create {} from {} file(s)", shown(output), inputs.len());
        for input in inputs {
            println!("  {}", shown(input));
        }
    }

    fn failed(&self, dir: &Path, error: &MdPartsError) {
        eprintln!("{}", failed_line(dir, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_defaults_to_merge() {
        let cli = Cli::try_parse_from(["mdparts"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn merge_flags_parse() {
        let cli = Cli::try_parse_from([
            "mdparts",
            "merge",
            "--root",
            "book",
            "--dry-run",
            "--natural-sort",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Merge(args)) => {
                assert_eq!(args.root, PathBuf::from("book"));
                assert!(args.dry_run);
                assert!(args.natural_sort);
                assert!(!args.keep_going);
            }
            _ => panic!("expected merge"),
        }
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        config.merge.output_prefix = "chapter_".into();
        config.merge.keep_going = true;

        let args = MergeArgs {
            include_output: true,
            natural_sort: true,
            ..MergeArgs::default_root()
        };
        let options = merge_options(&config, &args);
        assert_eq!(options.output_prefix, "chapter_");
        assert!(options.keep_going);
        assert!(!options.exclude_output);
        assert_eq!(options.sort, SortOrder::Natural);
        assert!(!options.dry_run);

        let args = MergeArgs {
            output_prefix: Some("part_".into()),
            ..MergeArgs::default_root()
        };
        assert_eq!(merge_options(&config, &args).output_prefix, "part_");
    }

    #[test]
    fn config_can_be_overridden_back() {
        let mut config = AppConfig::default();
        config.merge.keep_going = true;
        config.merge.exclude_output = false;
        config.merge.sort = SortOrder::Natural;

        let args = MergeArgs {
            no_keep_going: true,
            exclude_output: true,
            lexical_sort: true,
            ..MergeArgs::default_root()
        };
        let options = merge_options(&config, &args);
        assert!(!options.keep_going);
        assert!(options.exclude_output);
        assert_eq!(options.sort, SortOrder::Lexical);
    }

    #[test]
    fn contradictory_flags_are_rejected() {
        assert!(
            Cli::try_parse_from(["mdparts", "merge", "--keep-going", "--no-keep-going"]).is_err()
        );
        assert!(
            Cli::try_parse_from(["mdparts", "merge", "--include-output", "--exclude-output"])
                .is_err()
        );
    }

    #[test]
    fn progress_lines_are_exact() {
        let dir = Path::new(".").join("02-loops");
        assert_eq!(started_line(&dir), "\nProcessing directory: 02-loops");
        assert_eq!(
            created_line(&dir.join("part_02.md")),
            "Created 02-loops/part_02.md"
        );

        let empty = Path::new(".").join("03-empty");
        assert_eq!(skipped_line(&empty), "No markdown files found in 03-empty");

        let elsewhere = Path::new("book").join("02-loops");
        assert_eq!(started_line(&elsewhere), "\nProcessing directory: book/02-loops");
    }

    #[test]
    fn failure_line_names_directory_and_cause() {
        let dir = Path::new(".").join("01-bad");
        let error = MdPartsError::validation("bad input");
        assert_eq!(
            failed_line(&dir, &error),
            "Failed to merge 01-bad: validation error: bad input"
        );
    }

    #[test]
    fn shown_strips_current_dir() {
        let path = Path::new(".").join("01-intro").join("part_01.md");
        assert_eq!(shown(&path).to_string(), "01-intro/part_01.md");
        assert_eq!(shown(Path::new("/abs/01-x")).to_string(), "/abs/01-x");
    }
}
