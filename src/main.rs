//! docpipe CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use docpipe::cli::{CheckCommand, Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("docpipe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docpipe=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.no_color {
        console::set_colors_enabled(false);
    }
    let use_color = !cli.no_color && console::colors_enabled();

    let project_root = cli
        .project
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    match cli.command {
        Commands::Check(args) => {
            let command = CheckCommand::new(&project_root, args, use_color);
            match command.execute(&mut io::stdout()) {
                Ok(code) => ExitCode::from(code),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "docpipe", &mut io::stdout());
            ExitCode::SUCCESS
        }
    }
}
