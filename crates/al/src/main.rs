mod build_info;
mod cli;
mod commands;

use al_dispatch::Outcome;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, DispatchCommands};
use log::debug;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Runs before parsing; the arguments may belong to another version
    match dispatch() {
        Ok(Outcome::Dispatched(_)) => return,
        Ok(Outcome::Continue) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version_line());
        return;
    }

    let result = match cli.command {
        Some(Commands::Dispatch(DispatchCommands::Status { json })) => {
            commands::dispatch::execute_status(json)
        }
        None => Cli::command().print_help().map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch() -> Result<Outcome> {
    let args: Vec<_> = std::env::args_os().collect();
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    debug!("al {} in {}", build_info::VERSION, cwd.display());
    let outcome = al_dispatch::maybe_exec(&args, build_info::VERSION, &cwd, &|code| {
        std::process::exit(code)
    })?;
    Ok(outcome)
}
