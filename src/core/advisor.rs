//! Advice Request Builder: turns a package (plus the heuristic's suggestion)
//! into a strict-JSON prompt, calls the recommendation service with one
//! bounded retry on rate limiting, and back-fills what the answer left blank.

use crate::config::AdvisorConfig;
use crate::domain::dimensions::{cubed_weight, round_kg};
use crate::domain::model::{Dimensions, Package, PackagingRecommendation};
use crate::domain::ports::{ChatCompletion, ChatRequest};
use crate::utils::error::{AdvisorError, Result};
use std::time::Duration;

/// Retries after the first attempt; only `RateLimited` qualifies.
pub const MAX_RETRIES: u32 = 1;

const OUTPUT_SCHEMA: &str = r#"{
  "recommended_box": {"description": "string", "dimensions_cm": "LxWxH", "rationale": "string"},
  "internal_protection": [{"type": "string", "suggested_quantity": "string", "note": "string"}],
  "seals_and_reinforcements": [{"type": "string", "note": "string"}],
  "cost_estimate": {"total_brl": "number", "notes": "string"},
  "risks_and_mitigations": [{"risk": "string", "mitigation": "string"}],
  "cubage_impact": {"comment": "string"},
  "best_practices": ["string", "string", "string"],
  "short_summary": "string"
}"#;

/// The rule-based suggestion passed along as a steering hint.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicHint {
    pub packaging_type: String,
    pub dimensions: Dimensions,
}

pub fn system_prompt(language: &str) -> String {
    format!(
        "You are a packaging consultant for small online merchants. \
         Always answer in {language}, in a didactic and direct tone. \
         Your answer MUST be ONLY a valid JSON object following exactly the schema provided. \
         Do not invent carrier-specific policies. Prefer low cost, adequate safety and reduced cubage. \
         When there are trade-offs, explain them briefly."
    )
}

pub fn user_prompt(package: &Package, hint: Option<&HeuristicHint>, divisor: f64) -> String {
    let dims = &package.dimensions;
    let cubed = round_kg(cubed_weight(dims.length, dims.width, dims.height, divisor));
    let product = if package.description.trim().is_empty() {
        "Produto não informado"
    } else {
        package.description.trim()
    };

    let mut prompt = String::new();
    prompt.push_str("Merchant data:\n");
    prompt.push_str(&format!("- Category: {}\n", package.category));
    prompt.push_str(&format!("- Product: {}\n", product));
    prompt.push_str(&format!(
        "- Fragility: {}\n",
        package.fragility.map(|f| f.label()).unwrap_or("não informada")
    ));
    prompt.push_str(&format!("- Dimensions (cm): {} (LxWxH)\n", dims));
    prompt.push_str(&format!("- Weight (kg): {}\n", round_kg(package.weight_kg)));
    prompt.push_str(&format!("- Cubed weight (kg, divisor {}): {}\n", divisor, cubed));
    prompt.push_str(&format!("- Quantity per shipment: {}\n", package.quantity));
    if let Some(region) = &package.destination_region {
        prompt.push_str(&format!("- Predominant destination: {}\n", region));
    }
    if let Some(budget) = package.budget_brl.filter(|b| *b > 0.0) {
        prompt.push_str(&format!("- Packaging budget per order (BRL): {:.2}\n", budget));
    }
    if !package.pain_points.is_empty() {
        prompt.push_str(&format!("- Pain points: {}\n", package.pain_points.join(", ")));
    }

    if let Some(hint) = hint {
        prompt.push_str(&format!(
            "\nSuggested packaging from our rules: {} with {} cm. \
             Prefer this suggestion unless it clearly conflicts with the safety of the item; \
             if you deviate, justify it in recommended_box.rationale.\n",
            hint.packaging_type, hint.dimensions
        ));
    }

    prompt.push_str("\nTask: produce packaging recommendations.\n\n");
    prompt.push_str("Output schema (strict JSON):\n");
    prompt.push_str(OUTPUT_SCHEMA);
    prompt.push_str(
        "\n\nConstraints:\n\
         - Return ONLY the JSON of the schema above.\n\
         - If data is missing, assume the conservative option and say so in cost_estimate.notes.\n",
    );
    prompt
}

/// Parses the model's text. Anything that isn't a JSON object is malformed.
pub fn parse_recommendation(text: &str) -> Result<PackagingRecommendation> {
    let malformed = |message: String| AdvisorError::MalformedResponse {
        service: "OpenAI".to_string(),
        message,
    };

    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

/// Fills an empty box type or size from the heuristic so neither is ever blank.
pub fn backfill(mut recommendation: PackagingRecommendation, hint: Option<&HeuristicHint>) -> PackagingRecommendation {
    let Some(hint) = hint else {
        return recommendation;
    };

    let rec_box = &mut recommendation.recommended_box;
    if rec_box.description.trim().is_empty() {
        tracing::debug!("Back-filling box description from heuristic");
        rec_box.description = hint.packaging_type.clone();
    }
    if rec_box.dimensions_cm.trim().is_empty() {
        tracing::debug!("Back-filling box dimensions from heuristic");
        rec_box.dimensions_cm = hint.dimensions.to_string();
    }
    recommendation
}

pub struct Advisor<C: ChatCompletion> {
    client: C,
    language: String,
    temperature: f32,
    retry_backoff: Duration,
    divisor: f64,
}

impl<C: ChatCompletion> Advisor<C> {
    pub fn new(client: C, config: &AdvisorConfig, divisor: f64) -> Self {
        Self {
            client,
            language: config.language.clone(),
            temperature: config.temperature,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            divisor,
        }
    }

    pub fn build_request(&self, package: &Package, hint: Option<&HeuristicHint>) -> ChatRequest {
        ChatRequest {
            system: system_prompt(&self.language),
            user: user_prompt(package, hint, self.divisor),
            temperature: self.temperature,
        }
    }

    pub async fn recommend(
        &self,
        package: &Package,
        hint: Option<&HeuristicHint>,
    ) -> Result<PackagingRecommendation> {
        let request = self.build_request(package, hint);
        let text = self.complete_with_retry(&request).await?;
        let recommendation = parse_recommendation(&text)?;
        Ok(backfill(recommendation, hint))
    }

    async fn complete_with_retry(&self, request: &ChatRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.client.complete_json(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                    let delay = self.retry_backoff * 2u32.pow(attempt);
                    tracing::warn!("⏳ {} - retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
