pub mod advisor;
pub mod consultation;

pub use crate::domain::ports::{ChatCompletion, QuoteService};
pub use crate::utils::error::Result;
