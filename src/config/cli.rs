use crate::core::consultation::FormInput;
use crate::domain::model::Fragility;
use clap::Parser;
use std::path::PathBuf;

/// One form submission from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "pack-advisor")]
#[command(about = "Packaging advice and shipping quotes for a single shipment")]
pub struct CliArgs {
    /// Product category (Moda, Papelaria, Eletrônicos leves, ...)
    #[arg(long, default_value = "Outros")]
    pub category: String,

    /// Free-text product description, e.g. "caneca de porcelana"
    #[arg(long, default_value = "")]
    pub product: String,

    /// Fragility: low|medium|high (baixa|média|alta also accepted)
    #[arg(long)]
    pub fragility: Option<Fragility>,

    /// Item dimensions as LxWxH in centimeters, e.g. 20x15x10
    #[arg(long, conflicts_with = "unknown_dimensions")]
    pub dimensions: Option<String>,

    /// Estimate dimensions from the product description instead
    #[arg(long)]
    pub unknown_dimensions: bool,

    /// Clothing size hint used when dimensions are unknown (P, M, G, GG)
    #[arg(long)]
    pub size: Option<String>,

    /// Item weight in kg
    #[arg(long, default_value = "0.3")]
    pub weight: f64,

    /// Items per shipment
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub quantity: u32,

    /// Origin CEP (required)
    #[arg(long)]
    pub origin: String,

    /// Destination CEP; enables the shipping quote
    #[arg(long)]
    pub destination: Option<String>,

    /// Predominant destination region (Sudeste, Sul, ...)
    #[arg(long)]
    pub destination_region: Option<String>,

    /// Packaging budget per order in BRL
    #[arg(long)]
    pub budget: Option<f64>,

    /// Main pain point (repeatable): Avarias, Extravio, Devoluções, ...
    #[arg(long = "pain-point")]
    pub pain_points: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the consultation as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn to_form(&self) -> FormInput {
        FormInput {
            category: self.category.clone(),
            product: self.product.clone(),
            fragility: self.fragility,
            dimensions_text: if self.unknown_dimensions {
                None
            } else {
                Some(self.dimensions.clone().unwrap_or_default())
            },
            size_hint: self.size.clone(),
            weight_kg: self.weight,
            quantity: self.quantity,
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            destination_region: self.destination_region.clone(),
            budget_brl: self.budget,
            pain_points: self.pain_points.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_dimensions() {
        let args = CliArgs::try_parse_from([
            "pack-advisor",
            "--product",
            "caneca de porcelana",
            "--fragility",
            "alta",
            "--dimensions",
            "12x12x10",
            "--origin",
            "01001-000",
            "--pain-point",
            "Avarias",
            "--pain-point",
            "Extravio",
        ])
        .unwrap();

        let form = args.to_form();
        assert_eq!(form.fragility, Some(Fragility::High));
        assert_eq!(form.dimensions_text.as_deref(), Some("12x12x10"));
        assert_eq!(form.pain_points, vec!["Avarias", "Extravio"]);
        assert!(form.destination.is_none());
    }

    #[test]
    fn test_unknown_dimensions_toggle() {
        let args = CliArgs::try_parse_from([
            "pack-advisor",
            "--product",
            "camiseta",
            "--unknown-dimensions",
            "--size",
            "G",
            "--origin",
            "01001000",
        ])
        .unwrap();

        let form = args.to_form();
        assert!(form.dimensions_text.is_none());
        assert_eq!(form.size_hint.as_deref(), Some("G"));
    }

    #[test]
    fn test_dimensions_conflict_with_toggle() {
        let result = CliArgs::try_parse_from([
            "pack-advisor",
            "--dimensions",
            "1x1x1",
            "--unknown-dimensions",
            "--origin",
            "01001000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quantity_range() {
        let result = CliArgs::try_parse_from([
            "pack-advisor",
            "--origin",
            "01001000",
            "--quantity",
            "0",
        ]);
        assert!(result.is_err());
    }
}
