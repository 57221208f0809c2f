//! Argument parsing and command dispatch through the library entry point.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use smart2mapeo::cli::{execute_command, Cli, Commands};
use smart2mapeo::exitcode;
use smart2mapeo::util::testing::{init_test_setup, write_sample_package};

#[rstest]
#[case(&["smart2mapeo", "convert", "pkg.zip"], 0)]
#[case(&["smart2mapeo", "-v", "convert", "pkg.zip"], 1)]
#[case(&["smart2mapeo", "-vvv", "inspect", "pkg.zip"], 3)]
fn given_verbose_flags_when_parsing_then_counted(#[case] args: &[&str], #[case] expected: u8) {
    let cli = Cli::try_parse_from(args).expect("parse");
    assert_eq!(cli.verbose, expected);
}

#[test]
fn given_convert_without_output_when_parsing_then_defaults_to_current_dir() {
    let cli = Cli::try_parse_from(["smart2mapeo", "convert", "pkg.zip", "--dump-model"])
        .expect("parse");

    match cli.command {
        Commands::Convert {
            source,
            output,
            dump_model,
            keep_work_dir,
        } => {
            assert_eq!(source, PathBuf::from("pkg.zip"));
            assert_eq!(output, PathBuf::from("."));
            assert!(dump_model);
            assert!(!keep_work_dir);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    assert!(Cli::try_parse_from(["smart2mapeo"]).is_err());
}

#[test]
fn given_convert_command_when_executed_then_writes_output() {
    // Arrange
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let package = temp.path().join("wildlife.zip");
    write_sample_package(&package).unwrap();
    let out = temp.path().join("out");
    let cli = Cli::try_parse_from([
        "smart2mapeo",
        "convert",
        package.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--dump-model",
    ])
    .expect("parse");

    // Act
    execute_command(&cli).expect("convert command");

    // Assert
    assert!(out.join("defaults.json").is_file());
    assert!(out.join("cm_model.json").is_file());
}

#[test]
fn given_missing_package_when_executed_then_exit_code_is_noinput() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent.zip");
    let cli = Cli::try_parse_from(["smart2mapeo", "inspect", missing.to_str().unwrap()])
        .expect("parse");

    let err = execute_command(&cli).expect_err("missing package");

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_invalid_model_when_executed_then_exit_code_is_dataerr() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let model = temp.path().join("cm_model.xml");
    fs::write(&model, "<Other/>").unwrap();
    let cli = Cli::try_parse_from(["smart2mapeo", "inspect", model.to_str().unwrap()])
        .expect("parse");

    let err = execute_command(&cli).expect_err("invalid model");

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}
