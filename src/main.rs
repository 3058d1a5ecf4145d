use std::process::ExitCode;

use clap::Parser;
use paychase_lib::bootstrap::{self, tracing::init_tracing_subscriber};
use paychase_lib::cli::Cli;
use paychase_lib::commands;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let startup = match bootstrap::init::prepare(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("paychase: {err:#}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = init_tracing_subscriber(&startup.paths.logs_dir, cli.verbose) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let orchestrator = match bootstrap::wiring::wire_onboarding(&startup.config, &startup.paths) {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            tracing::error!(error = %err, "wiring failed");
            eprintln!("paychase: {err}");
            return ExitCode::from(2);
        }
    };

    match commands::run(cli.command, &orchestrator).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_json());
            ExitCode::from(err.exit_code())
        }
    }
}
