#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use tnexport::cli::app::{Cli, Command, RuntimeArgs};
use tnexport::cli::commands;
use tnexport::config::{ConfigError, DatabaseConfig, RuntimePaths, SmartsheetConfig};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_CONFIG_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    dotenvy::from_path(".env").ok();
    init_tracing();

    let command_name = cli.command.name();
    println!("tnexport: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("tnexport: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("tnexport: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(cli: Cli) -> Result<()> {
    let lookup = |name: &str| std::env::var(name).ok();
    match cli.command {
        Command::CalculatorSheets(args) => {
            let config = SmartsheetConfig::from_lookup(lookup)?;
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::sheets::run(&args, &runtime_paths, &config)
        }
        Command::CalculatorDb(args) => {
            let config = DatabaseConfig::from_lookup(lookup)?;
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::database::run(&args, &runtime_paths, &config)
        }
        Command::ProjectContacts(args) => {
            let config = DatabaseConfig::from_lookup(lookup)?;
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::contacts::run(&args, &runtime_paths, &config)
        }
        Command::Projects(args) => {
            let config = DatabaseConfig::from_lookup(lookup)?;
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::projects::run(&args, &runtime_paths, &config)
        }
        Command::Calculate(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::calculate::run(&args, &runtime_paths)
        }
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ConfigError>().is_some() {
        EXIT_CONFIG_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = args
        .home_dir
        .clone()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from));

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    tnexport::config::resolve_runtime_paths(home_dir.as_deref(), &cwd, args.out_dir.as_deref())
}
