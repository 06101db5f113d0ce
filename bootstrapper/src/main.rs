//! Entry point for the bootstrapper binary

use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use bootstrapper::{
    exit_status,
    services::{RealFileSystem, RealInterfaceSource, RealProcessRunner},
    Args, Bootstrapper, Outcome,
};
use shared::{logging, process_debug, ProcessId};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from .env only fill in variables that are not already set
    let _ = dotenv::dotenv();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    ProcessId::init_bootstrapper();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", Args::command().render_usage());
            return ExitCode::from(1);
        }
    };
    process_debug!(ProcessId::current(), "IPS: {:?}", config.peers());

    let bootstrapper = Bootstrapper::new(
        RealProcessRunner::new(),
        RealInterfaceSource::new(),
        RealFileSystem::new(),
    );

    match bootstrapper.run(&config).await {
        Ok(Outcome::Exited(code)) => ExitCode::from(exit_status(code)),
        Ok(Outcome::Provisioned) => ExitCode::SUCCESS,
        Ok(Outcome::DryRun(report)) => match report.to_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                logging::log_error(ProcessId::current(), "Dry run report", &err);
                ExitCode::from(1)
            }
        },
        Err(err) => {
            logging::log_error(ProcessId::current(), "Bootstrap", &err);
            ExitCode::from(1)
        }
    }
}
