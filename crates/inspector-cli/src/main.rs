//! Inspector CLI - browse and analyze published package distributions.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::Commands;
use commands::Session;
use commands::decompile::Mode;
use output::JsonFormatter;
use output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cli.json {
                JsonFormatter::format_error(operation(&cli.command), &err);
            } else {
                eprintln!("Error: {err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    match &cli.command {
        Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
        Commands::InspectFile(args) => {
            commands::inspect_file::execute(args, &cli.config().analysis, formatter)
        }
        Commands::Versions(args) => {
            commands::versions::execute(args, &Session::new(cli)?, formatter).await
        }
        Commands::Distributions(args) => {
            commands::distributions::execute(args, &Session::new(cli)?, formatter).await
        }
        Commands::Files(args) => commands::files::execute(args, &Session::new(cli)?, formatter).await,
        Commands::Show(args) => commands::show::execute(args, &Session::new(cli)?, formatter).await,
        Commands::Analyze(args) => {
            commands::analyze::execute(args, &Session::new(cli)?, formatter).await
        }
        Commands::Decompile(args) => {
            commands::decompile::execute(args, Mode::Decompile, &Session::new(cli)?, formatter)
                .await
        }
        Commands::Disassemble(args) => {
            commands::decompile::execute(args, Mode::Disassemble, &Session::new(cli)?, formatter)
                .await
        }
    }
}

const fn operation(command: &Commands) -> &'static str {
    match command {
        Commands::Versions(_) => "versions",
        Commands::Distributions(_) => "distributions",
        Commands::Files(_) => "files",
        Commands::Show(_) => "show",
        Commands::Analyze(_) => "analyze",
        Commands::Decompile(_) => "decompile",
        Commands::Disassemble(_) => "disassemble",
        Commands::InspectFile(_) => "inspect-file",
        Commands::Completion(_) => "completion",
    }
}
