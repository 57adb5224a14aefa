use clap::Parser;
use cptools::cli::{BundleArgs, Cli, Commands, ConfigCommand};
use std::path::PathBuf;

#[test]
fn bundle_output_flag_parsing() {
    // Given
    let argv = vec!["cptools", "bundle", "A", "-o", "submit.cpp"];

    // When
    let cmd = Cli::parse_from(argv);

    // Then
    match cmd.command {
        Commands::Bundle(BundleArgs { problem, output, in_place, stdout }) => {
            assert_eq!(problem, "A");
            assert_eq!(output, Some(PathBuf::from("submit.cpp")));
            assert!(!in_place);
            assert!(!stdout);
        }
        _ => panic!("expected Bundle command"),
    }
}

#[test]
fn bundle_sinks_are_mutually_exclusive() {
    let res = Cli::try_parse_from(["cptools", "bundle", "A", "-i", "-o", "x.cpp"]);
    assert!(res.is_err());

    let res = Cli::try_parse_from(["cptools", "bundle", "A", "--in-place", "--stdout"]);
    assert!(res.is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cmd = Cli::parse_from(["cptools", "bundle", "B.cpp", "--quiet", "--dry-run", "-vv"]);

    assert!(cmd.quiet);
    assert!(cmd.dry_run);
    assert_eq!(cmd.verbose, 2);
}

#[test]
fn bare_config_opens_editor() {
    let cmd = Cli::parse_from(["cptools", "config", "-e", "nano"]);

    match cmd.command {
        Commands::Config(args) => {
            assert!(args.command.is_none());
            assert_eq!(args.editor.as_deref(), Some("nano"));
        }
        _ => panic!("expected Config command"),
    }
}

#[test]
fn config_init_force() {
    let cmd = Cli::parse_from(["cptools", "config", "init", "--force"]);

    match cmd.command {
        Commands::Config(args) => match args.command {
            Some(ConfigCommand::Init(init)) => assert!(init.force),
            other => panic!("expected init, got {other:?}"),
        },
        _ => panic!("expected Config command"),
    }
}
