pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{OpenAiClient, SuperFreteClient};
pub use config::AppConfig;
pub use core::consultation::{Consultation, ConsultationReport, FormInput, QuoteOutcome};
pub use utils::error::{AdvisorError, Result};
