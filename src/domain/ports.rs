use crate::domain::model::{Dimensions, PostalCode, ShippingOffer};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// One system instruction plus one user prompt, answered as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// The recommendation service. Implementations classify failures into
/// `RateLimited`, `QuotaExceeded`, `MalformedResponse` and friends instead of
/// leaving callers to sniff error text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete_json(&self, request: &ChatRequest) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRequest {
    pub origin: PostalCode,
    pub destination: PostalCode,
    pub dimensions: Dimensions,
    pub weight_kg: f64,
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<ShippingOffer>>;
}
