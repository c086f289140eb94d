use serde::{Deserialize, Serialize};
use std::fmt;

/// Length, width and height in centimeters, all strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Returns `None` unless every side is a finite number above zero.
    pub fn new(length: f64, width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(length) && valid(width) && valid(height) {
            Some(Self {
                length,
                width,
                height,
            })
        } else {
            None
        }
    }

    /// Whole centimeters, as the shipping API expects them. Never below 1 cm.
    pub fn rounded(&self) -> (u32, u32, u32) {
        let whole = |v: f64| (v.round() as u32).max(1);
        (whole(self.length), whole(self.width), whole(self.height))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (l, w, h) = self.rounded();
        write!(f, "{}x{}x{}", l, w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragility {
    Low,
    Medium,
    High,
}

impl Fragility {
    pub fn label(&self) -> &'static str {
        match self {
            Fragility::Low => "Baixa",
            Fragility::Medium => "Média",
            Fragility::High => "Alta",
        }
    }
}

impl std::str::FromStr for Fragility {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "low" | "baixa" => Ok(Fragility::Low),
            "medium" | "media" | "média" => Ok(Fragility::Medium),
            "high" | "alta" => Ok(Fragility::High),
            other => Err(format!(
                "unsupported fragility `{}` (expected low|medium|high)",
                other
            )),
        }
    }
}

/// An 8-digit CEP. Only the sanitizer in `domain::postal` builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(pub(crate) String);

impl PostalCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFamily {
    Textile,
    BookPaper,
    GlassCeramic,
    LightElectronics,
    Cosmetics,
    JewelryAccessories,
    Other,
}

impl ProductFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductFamily::Textile => "textile",
            ProductFamily::BookPaper => "book_paper",
            ProductFamily::GlassCeramic => "glass_ceramic",
            ProductFamily::LightElectronics => "light_electronics",
            ProductFamily::Cosmetics => "cosmetics",
            ProductFamily::JewelryAccessories => "jewelry_accessories",
            ProductFamily::Other => "other",
        }
    }
}

/// Everything the merchant told us about one shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub category: String,
    pub description: String,
    pub fragility: Option<Fragility>,
    pub dimensions: Dimensions,
    pub weight_kg: f64,
    pub quantity: u32,
    pub destination_region: Option<String>,
    pub budget_brl: Option<f64>,
    pub pain_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBox {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dimensions_cm: String,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionItem {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub suggested_quantity: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SealItem {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    #[serde(default, deserialize_with = "optional_amount")]
    pub total_brl: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMitigation {
    #[serde(default)]
    pub risk: String,
    #[serde(default)]
    pub mitigation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubageImpact {
    #[serde(default)]
    pub comment: String,
}

/// The advice shown to the merchant. Every field tolerates being absent in
/// the model's JSON; blanks are back-filled from the heuristic afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingRecommendation {
    #[serde(default)]
    pub recommended_box: RecommendedBox,
    #[serde(default)]
    pub internal_protection: Vec<ProtectionItem>,
    #[serde(default)]
    pub seals_and_reinforcements: Vec<SealItem>,
    #[serde(default)]
    pub cost_estimate: CostEstimate,
    #[serde(default)]
    pub risks_and_mitigations: Vec<RiskMitigation>,
    #[serde(default)]
    pub cubage_impact: CubageImpact,
    #[serde(default)]
    pub best_practices: Vec<String>,
    #[serde(default)]
    pub short_summary: String,
}

// Models answer "2" and 2 interchangeably for quantities and amounts.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn optional_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOffer {
    pub carrier: String,
    pub service: String,
    pub price: f64,
    pub delivery_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_reject_non_positive_sides() {
        assert!(Dimensions::new(20.0, 15.0, 10.0).is_some());
        assert!(Dimensions::new(0.0, 15.0, 10.0).is_none());
        assert!(Dimensions::new(20.0, -1.0, 10.0).is_none());
        assert!(Dimensions::new(20.0, 15.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_dimensions_display_rounds_to_whole_cm() {
        let dims = Dimensions::new(20.4, 15.6, 10.0).unwrap();
        assert_eq!(dims.to_string(), "20x16x10");
    }

    #[test]
    fn test_rounded_sides_never_reach_zero() {
        let thin = Dimensions::new(0.3, 0.4, 2.6).unwrap();
        assert_eq!(thin.rounded(), (1, 1, 3));
        assert_eq!(thin.to_string(), "1x1x3");
    }

    #[test]
    fn test_fragility_accepts_portuguese_labels() {
        assert_eq!("Alta".parse::<Fragility>().unwrap(), Fragility::High);
        assert_eq!("media".parse::<Fragility>().unwrap(), Fragility::Medium);
        assert_eq!("low".parse::<Fragility>().unwrap(), Fragility::Low);
        assert!("extreme".parse::<Fragility>().is_err());
    }

    #[test]
    fn test_recommendation_tolerates_missing_fields() {
        let rec: PackagingRecommendation =
            serde_json::from_str(r#"{"short_summary": "Use caixa"}"#).unwrap();
        assert_eq!(rec.short_summary, "Use caixa");
        assert!(rec.recommended_box.description.is_empty());
        assert!(rec.best_practices.is_empty());
    }

    #[test]
    fn test_recommendation_accepts_numeric_quantities_and_string_amounts() {
        let rec: PackagingRecommendation = serde_json::from_str(
            r#"{
                "internal_protection": [{"type": "plástico bolha", "suggested_quantity": 2}],
                "cost_estimate": {"total_brl": "3,50", "notes": "estimado"}
            }"#,
        )
        .unwrap();
        assert_eq!(rec.internal_protection[0].suggested_quantity, "2");
        assert_eq!(rec.cost_estimate.total_brl, Some(3.5));
    }
}
