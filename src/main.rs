use anyhow::Result;
use clap::Parser;
use cptools::cli::{AppContext, Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color);

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Bundle(args) => cptools::core::bundle_run(args, &ctx),
        Commands::Config(args) => cptools::cli_ext::config_cmd::run(args, &ctx),
        Commands::Completions(args) => cptools::completion::run(args, &ctx),
    }
}

/// Logs go to stderr so bundled code on stdout stays clean.
/// `CPTOOLS_LOG` overrides the `-v` count.
fn init_logging(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("CPTOOLS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("cptools={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(!no_color),
        )
        .init();
}
