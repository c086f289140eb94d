use crate::domain::model::Dimensions;
use regex::Regex;
use std::sync::OnceLock;

/// Carrier default for converting cm³ to billable kg.
pub const DEFAULT_VOLUMETRIC_DIVISOR: f64 = 6000.0;

/// Estimated mass of the packaging material itself.
pub const PACKAGING_ALLOWANCE_KG: f64 = 0.05;

fn dimension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+(?:[.,]\d+)?)\s*[xX]\s*(\d+(?:[.,]\d+)?)\s*[xX]\s*(\d+(?:[.,]\d+)?)")
            .expect("dimension pattern is a valid regex")
    })
}

/// Finds the first `LxWxH` triple in free text ("20x15x10", "20,5 X 15 x 3.2").
///
/// Returns `None` when the text is empty, has no such pattern, or any side is zero.
/// Values are taken as centimeters; no unit conversion happens here.
pub fn parse_dimensions(text: &str) -> Option<Dimensions> {
    if text.trim().is_empty() {
        return None;
    }

    let caps = dimension_pattern().captures(text)?;
    let number = |i: usize| -> Option<f64> { caps.get(i)?.as_str().replace(',', ".").parse().ok() };

    let dims = Dimensions::new(number(1)?, number(2)?, number(3)?);
    match &dims {
        Some(d) => tracing::debug!("Parsed dimensions '{}' -> {:?}", text, d),
        None => tracing::debug!("Dimensions in '{}' are not all positive", text),
    }
    dims
}

/// `(length * width * height) / divisor`, in kg.
pub fn cubed_weight(length: f64, width: f64, height: f64, divisor: f64) -> f64 {
    (length * width * height) / divisor
}

/// Weight submitted for a quote: the heavier of the actual weight plus the
/// packaging allowance and the cubed weight of the chosen box.
pub fn quote_weight(actual_kg: f64, chosen_box: &Dimensions, divisor: f64, allowance_kg: f64) -> f64 {
    let cubed = cubed_weight(chosen_box.length, chosen_box.width, chosen_box.height, divisor);
    (actual_kg + allowance_kg).max(cubed)
}

/// Rounds to three decimals, the precision used for every weight on the wire.
pub fn round_kg(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(d: Dimensions) -> (f64, f64, f64) {
        (d.length, d.width, d.height)
    }

    #[test]
    fn test_parse_plain_triple() {
        assert_eq!(triple(parse_dimensions("20x15x10").unwrap()), (20.0, 15.0, 10.0));
    }

    #[test]
    fn test_parse_accepts_case_spacing_and_decimal_marks() {
        assert_eq!(
            triple(parse_dimensions("  20,5 X 15.25 x  3 ").unwrap()),
            (20.5, 15.25, 3.0)
        );
        assert_eq!(
            triple(parse_dimensions("caixa de 30X20X10 cm").unwrap()),
            (30.0, 20.0, 10.0)
        );
    }

    #[test]
    fn test_parse_rejects_missing_pattern() {
        assert!(parse_dimensions("").is_none());
        assert!(parse_dimensions("   ").is_none());
        assert!(parse_dimensions("20x15").is_none());
        assert!(parse_dimensions("vinte por quinze").is_none());
        assert!(parse_dimensions("20-15-10").is_none());
    }

    #[test]
    fn test_parse_rejects_zero_side() {
        assert!(parse_dimensions("0x15x10").is_none());
    }

    #[test]
    fn test_cubed_weight_reference_value() {
        assert!((cubed_weight(20.0, 15.0, 10.0, DEFAULT_VOLUMETRIC_DIVISOR) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cubed_weight_monotonicity() {
        let base = cubed_weight(20.0, 15.0, 10.0, 6000.0);
        assert!(cubed_weight(21.0, 15.0, 10.0, 6000.0) > base);
        assert!(cubed_weight(20.0, 16.0, 10.0, 6000.0) > base);
        assert!(cubed_weight(20.0, 15.0, 11.0, 6000.0) > base);
        assert!(cubed_weight(20.0, 15.0, 10.0, 5000.0) > base);
        assert!(cubed_weight(20.0, 15.0, 10.0, 7000.0) < base);
    }

    #[test]
    fn test_quote_weight_uses_heavier_candidate() {
        let small = Dimensions::new(10.0, 10.0, 10.0).unwrap();
        assert!((quote_weight(0.3, &small, 6000.0, PACKAGING_ALLOWANCE_KG) - 0.35).abs() < 1e-9);

        let bulky = Dimensions::new(60.0, 50.0, 40.0).unwrap();
        assert!((quote_weight(0.3, &bulky, 6000.0, PACKAGING_ALLOWANCE_KG) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_kg() {
        assert_eq!(round_kg(0.123456), 0.123);
        assert_eq!(round_kg(2.0), 2.0);
    }
}
