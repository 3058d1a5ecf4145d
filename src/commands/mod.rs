mod error;
pub mod onboarding;

pub use error::CommandError;

use pc_app::OnboardingOrchestrator;

use crate::cli::Command;

/// Runs one command and returns what should be printed on stdout.
pub async fn run(
    command: Command,
    orchestrator: &OnboardingOrchestrator,
) -> Result<String, CommandError> {
    match command {
        Command::Onboarding { command } => onboarding::run(command, orchestrator).await,
    }
}
