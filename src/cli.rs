use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pc_core::onboarding::OnboardingStep;

#[derive(Debug, Parser)]
#[command(name = "paychase")]
#[command(about = "Drive the Paychase signup and onboarding workflow")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to `<data dir>/config.toml`)
    #[arg(long, env = "PC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base directory for application data
    #[arg(long, env = "PC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Onboarding workflow operations
    Onboarding {
        #[command(subcommand)]
        command: OnboardingCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum OnboardingCommand {
    /// Print the current view, reconciling a return URL first when given
    Status {
        #[arg(long)]
        return_url: Option<String>,
    },
    /// Submit the welcome form
    Signup(SignupArgs),
    /// Complete a step and move to the next one
    Advance { step: OnboardingStep },
    /// Skip an optional step
    Skip { step: OnboardingStep },
    /// Return to the previous step
    Back,
    /// Discard all progress
    Reset,
    /// Leave the completion step
    Finish,
    /// Start checkout for a self-serve plan and print the checkout URL
    Checkout { plan_id: String },
    /// Choose the business track (email verification instead of checkout)
    BusinessPlan,
    /// Confirm the business track with the emailed code
    VerifyEmail { code: String },
    /// Print the accounting system authorization URL
    Authorize,
    /// Mark an additional integration as configured
    Integration { provider: String },
    /// Update reminder and notification toggles
    Notifications(NotificationArgs),
    /// Apply the URL an external system redirected back to
    Reconcile { return_url: String },
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub organization_name: String,
    /// NNNNNN-NNNN or ten digits
    #[arg(long)]
    pub registration_number: String,
    #[arg(long)]
    pub email: String,
    /// Kept in memory for this invocation only
    #[arg(long, env = "PC_SIGNUP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Unset flags keep their current value.
#[derive(Debug, Args)]
pub struct NotificationArgs {
    #[arg(long)]
    pub email_reminders: Option<bool>,
    #[arg(long)]
    pub sms_reminders: Option<bool>,
    #[arg(long)]
    pub payment_received: Option<bool>,
    #[arg(long)]
    pub weekly_summary: Option<bool>,
}
