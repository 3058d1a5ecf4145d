mod file_progress_store;
mod log_events;

pub use file_progress_store::{FileProgressStore, DEFAULT_PROGRESS_FILE};
pub use log_events::LogOnboardingEvents;
