use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

impl AppContext {
    /// Print a success status line to stderr unless --quiet
    pub fn success(&self, msg: &str) {
        if self.quiet {
            return;
        }
        if self.no_color {
            eprintln!("✓ {msg}");
        } else {
            eprintln!("{} {}", "✓".green(), msg.green());
        }
    }

    /// Print a warning to stderr; shown even with --quiet
    pub fn warn(&self, msg: &str) {
        if self.no_color {
            eprintln!("{msg}");
        } else {
            eprintln!("{}", msg.yellow());
        }
    }

    /// Plain informational line on stderr unless --quiet
    pub fn note(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{msg}");
        }
    }
}

#[derive(Parser)]
#[command(name = "cptools")]
#[command(about = "Competitive programming tools: bundle local headers into one submittable file")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress status messages (warnings are still shown)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand local #include "..." directives into a single file
    Bundle(BundleArgs),

    /// Manage the cptools configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Parser)]
#[command(group(
    clap::ArgGroup::new("sink")
        .args(["output", "in_place", "stdout"])
        .multiple(false)
))]
pub struct BundleArgs {
    /// Problem identifier; bundles <PROBLEM>.cpp in the current directory
    pub problem: String,

    /// Write the bundle to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the source file with its bundle
    #[arg(short, long)]
    pub in_place: bool,

    /// Print the bundle to stdout instead of copying it to the clipboard
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,

    /// Editor used when no subcommand is given
    #[arg(short, long)]
    pub editor: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Print the effective configuration as JSON
    Show,

    /// Write the default configuration file
    Init(ConfigInitArgs),

    /// Open the config file in an editor
    Edit(ConfigEditArgs),
}

#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ConfigEditArgs {
    /// Use this editor (overrides $EDITOR and the fallback chain)
    #[arg(short, long)]
    pub editor: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
