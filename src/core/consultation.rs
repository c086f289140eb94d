use crate::config::{AppConfig, PackagingConfig};
use crate::core::advisor::{Advisor, HeuristicHint};
use crate::domain::dimensions::{cubed_weight, parse_dimensions, quote_weight, round_kg};
use crate::domain::heuristics::{self, HeuristicSuggestion};
use crate::domain::model::{Dimensions, Fragility, Package, PackagingRecommendation, PostalCode, ShippingOffer};
use crate::domain::offers::{self, OfferSelection};
use crate::domain::ports::{ChatCompletion, QuoteRequest, QuoteService};
use crate::domain::postal::sanitize_postal_code;
use crate::utils::error::{AdvisorError, Result};
use serde::{Serialize, Serializer};

/// Raw form values, exactly as the merchant typed them.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub category: String,
    pub product: String,
    pub fragility: Option<Fragility>,
    /// `None` means "I don't know the dimensions".
    pub dimensions_text: Option<String>,
    pub size_hint: Option<String>,
    pub weight_kg: f64,
    pub quantity: u32,
    pub origin: String,
    pub destination: Option<String>,
    pub destination_region: Option<String>,
    pub budget_brl: Option<f64>,
    pub pain_points: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoDestination,
    NoShippingCredential,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Skipped {
        reason: SkipReason,
    },
    Quoted {
        request: QuoteRequest,
        offers: Vec<ShippingOffer>,
        selection: OfferSelection,
    },
    Failed {
        #[serde(serialize_with = "error_message")]
        error: AdvisorError,
    },
}

fn error_message<S: Serializer>(error: &AdvisorError, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// Everything one submission produced.
#[derive(Debug, Serialize)]
pub struct ConsultationReport {
    pub package: Package,
    pub origin: PostalCode,
    pub suggestion: HeuristicSuggestion,
    pub recommendation: PackagingRecommendation,
    pub cubed_weight_kg: f64,
    pub volumetric_divisor: f64,
    pub quote: QuoteOutcome,
}

struct ValidatedForm {
    package_dims: Option<Dimensions>,
    origin: PostalCode,
    destination: Option<PostalCode>,
}

/// Runs one form submission: validate → heuristic → advice → quote.
pub struct Consultation<C: ChatCompletion, Q: QuoteService> {
    advisor: Advisor<C>,
    quotes: Q,
    packaging: PackagingConfig,
    shipping_configured: bool,
}

impl<C: ChatCompletion, Q: QuoteService> Consultation<C, Q> {
    pub fn new(chat: C, quotes: Q, config: &AppConfig) -> Self {
        Self {
            advisor: Advisor::new(chat, &config.advisor, config.packaging.volumetric_divisor),
            quotes,
            packaging: config.packaging.clone(),
            shipping_configured: config.shipping.has_token(),
        }
    }

    fn validate(form: &FormInput) -> Result<ValidatedForm> {
        let package_dims = match &form.dimensions_text {
            Some(text) => Some(parse_dimensions(text).ok_or_else(|| AdvisorError::InvalidDimensions {
                input: text.clone(),
            })?),
            None => None,
        };

        if !form.weight_kg.is_finite() || form.weight_kg < 0.0 {
            return Err(AdvisorError::InvalidInput {
                field: "weight".to_string(),
                reason: "weight must be zero or more kilograms".to_string(),
            });
        }
        if form.quantity == 0 {
            return Err(AdvisorError::InvalidInput {
                field: "quantity".to_string(),
                reason: "at least one item per shipment".to_string(),
            });
        }

        let origin = sanitize_postal_code(&form.origin).ok_or_else(|| AdvisorError::InvalidPostalCode {
            field: "origem".to_string(),
            input: form.origin.clone(),
        })?;

        let destination = match form.destination.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                Some(sanitize_postal_code(raw).ok_or_else(|| AdvisorError::InvalidPostalCode {
                    field: "destino".to_string(),
                    input: raw.to_string(),
                })?)
            }
            _ => None,
        };

        Ok(ValidatedForm {
            package_dims,
            origin,
            destination,
        })
    }

    pub async fn run(&self, form: &FormInput) -> Result<ConsultationReport> {
        let validated = Self::validate(form)?;
        tracing::info!("✅ Form validated (origin {})", validated.origin);

        let suggestion = heuristics::suggest(
            &form.product,
            form.fragility,
            form.quantity,
            validated.package_dims,
            form.size_hint.as_deref(),
        );
        tracing::info!(
            "🧭 Heuristic: {} -> {} ({} cm box)",
            suggestion.family.as_str(),
            suggestion.packaging_type,
            suggestion.box_dimensions
        );

        let package = Package {
            category: form.category.clone(),
            description: form.product.clone(),
            fragility: form.fragility,
            dimensions: suggestion.item_dimensions,
            weight_kg: form.weight_kg,
            quantity: form.quantity,
            destination_region: form.destination_region.clone(),
            budget_brl: form.budget_brl,
            pain_points: form.pain_points.clone(),
        };

        let hint = HeuristicHint {
            packaging_type: suggestion.packaging_type.to_string(),
            dimensions: suggestion.box_dimensions,
        };

        tracing::info!("🤖 Requesting packaging recommendation");
        let recommendation = self.advisor.recommend(&package, Some(&hint)).await?;

        let divisor = self.packaging.volumetric_divisor;
        let dims = &package.dimensions;
        let cubed_weight_kg = round_kg(cubed_weight(dims.length, dims.width, dims.height, divisor));

        let quote = match validated.destination {
            None => {
                tracing::info!("ℹ️ No destination CEP - skipping shipping quote");
                QuoteOutcome::Skipped {
                    reason: SkipReason::NoDestination,
                }
            }
            Some(_) if !self.shipping_configured => {
                tracing::info!("ℹ️ No shipping credential - skipping shipping quote");
                QuoteOutcome::Skipped {
                    reason: SkipReason::NoShippingCredential,
                }
            }
            Some(destination) => {
                let chosen_box = chosen_box(&recommendation, &suggestion);
                let request = QuoteRequest {
                    origin: validated.origin.clone(),
                    destination,
                    dimensions: chosen_box,
                    weight_kg: round_kg(quote_weight(
                        package.weight_kg,
                        &chosen_box,
                        divisor,
                        self.packaging.packaging_allowance_kg,
                    )),
                };
                self.quote(request).await
            }
        };

        Ok(ConsultationReport {
            package,
            origin: validated.origin,
            suggestion,
            recommendation,
            cubed_weight_kg,
            volumetric_divisor: divisor,
            quote,
        })
    }

    async fn quote(&self, request: QuoteRequest) -> QuoteOutcome {
        match self.quotes.quote(&request).await {
            Ok(offers) => match offers::select(&offers) {
                Some(selection) => {
                    tracing::info!(
                        "💰 {} offers; cheapest {} {} at R$ {:.2}",
                        offers.len(),
                        selection.best_price.carrier,
                        selection.best_price.service,
                        selection.best_price.price
                    );
                    QuoteOutcome::Quoted {
                        request,
                        offers,
                        selection,
                    }
                }
                None => QuoteOutcome::Failed {
                    error: AdvisorError::NoOffers,
                },
            },
            Err(error) => {
                tracing::warn!("⚠️ Shipping quote failed: {}", error);
                QuoteOutcome::Failed { error }
            }
        }
    }
}

/// The recommended box when its size parses, otherwise the heuristic box.
pub fn chosen_box(recommendation: &PackagingRecommendation, suggestion: &HeuristicSuggestion) -> Dimensions {
    parse_dimensions(&recommendation.recommended_box.dimensions_cm).unwrap_or(suggestion.box_dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RecommendedBox;

    #[test]
    fn test_chosen_box_prefers_parseable_recommendation() {
        let suggestion = heuristics::suggest("livro", None, 1, None, None);
        let mut rec = PackagingRecommendation::default();
        assert_eq!(chosen_box(&rec, &suggestion), suggestion.box_dimensions);

        rec.recommended_box = RecommendedBox {
            description: "caixa".to_string(),
            dimensions_cm: "25 x 19 x 7".to_string(),
            rationale: String::new(),
        };
        assert_eq!(chosen_box(&rec, &suggestion), Dimensions::new(25.0, 19.0, 7.0).unwrap());
    }
}
