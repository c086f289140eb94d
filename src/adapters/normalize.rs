//! Maps the quote response shapes seen in the wild onto `ShippingOffer`.
//!
//! Offers arrive as a bare list or wrapped under `data`, `quotes` or
//! `results`, and each entry names its fields differently depending on the
//! integration. `Lenient` fills gaps with "-" / 0; `Strict` rejects entries
//! without a carrier or a parseable price.

use crate::domain::model::ShippingOffer;
use crate::utils::error::{AdvisorError, Result};
use serde_json::{Map, Value};

const WRAPPER_KEYS: &[&str] = &["data", "quotes", "results"];
const CARRIER_PATHS: &[&str] = &["company.name", "company", "carrier", "carrier_name", "transportadora"];
const SERVICE_PATHS: &[&str] = &["name", "service", "service_name", "servico"];
const PRICE_PATHS: &[&str] = &["price", "custom_price", "final_price", "valor", "preco"];
const DAYS_PATHS: &[&str] = &[
    "delivery_time",
    "delivery_range.max",
    "delivery.days",
    "delivery_days",
    "prazo",
];

pub const MISSING: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    Strict,
    #[default]
    Lenient,
}

impl NormalizeMode {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            NormalizeMode::Strict
        } else {
            NormalizeMode::Lenient
        }
    }
}

/// Extracts the offer entries; anything that isn't a list (bare or wrapped)
/// is an unrecognized shape.
pub fn offer_entries(body: &Value) -> Result<&[Value]> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(|items| items.as_slice())
            .ok_or_else(|| AdvisorError::UnrecognizedShape {
                message: format!(
                    "object without any of {:?} (keys: {:?})",
                    WRAPPER_KEYS,
                    map.keys().collect::<Vec<_>>()
                ),
            }),
        other => Err(AdvisorError::UnrecognizedShape {
            message: format!("expected list or object, got {}", type_name(other)),
        }),
    }
}

pub fn normalize_offers(body: &Value, mode: NormalizeMode) -> Result<Vec<ShippingOffer>> {
    let entries = offer_entries(body)?;
    let mut offers = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            if mode == NormalizeMode::Strict {
                return Err(AdvisorError::InvalidOffer {
                    index,
                    reason: format!("expected object, got {}", type_name(entry)),
                });
            }
            tracing::warn!("Skipping non-object offer at index {}", index);
            continue;
        };

        if let Some(reason) = unavailable_reason(obj) {
            tracing::debug!("Dropping unavailable offer at index {}: {}", index, reason);
            continue;
        }

        offers.push(normalize_entry(index, obj, mode)?);
    }

    if offers.is_empty() {
        return Err(AdvisorError::NoOffers);
    }

    tracing::debug!("Normalized {} offers", offers.len());
    Ok(offers)
}

fn normalize_entry(index: usize, obj: &Map<String, Value>, mode: NormalizeMode) -> Result<ShippingOffer> {
    let carrier = first_string(obj, CARRIER_PATHS);
    let service = first_string(obj, SERVICE_PATHS);
    let price = first_parsed(obj, PRICE_PATHS, parse_price);
    let delivery_days = first_parsed(obj, DAYS_PATHS, parse_days);

    if mode == NormalizeMode::Strict {
        if carrier.is_none() {
            return Err(AdvisorError::InvalidOffer {
                index,
                reason: "missing carrier name".to_string(),
            });
        }
        if price.is_none() {
            return Err(AdvisorError::InvalidOffer {
                index,
                reason: "missing or unparseable price".to_string(),
            });
        }
    }

    Ok(ShippingOffer {
        carrier: carrier.unwrap_or_else(|| MISSING.to_string()),
        service: service.unwrap_or_else(|| MISSING.to_string()),
        price: price.unwrap_or(0.0),
        delivery_days,
    })
}

// SuperFrete lists services the route can't use with an `error` message.
fn unavailable_reason(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lookup<'a>(obj: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = obj.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

// Blank or garbled fields fall through to the next alias.
fn first_parsed<T>(obj: &Map<String, Value>, paths: &[&str], parse: fn(&Value) -> Option<T>) -> Option<T> {
    paths
        .iter()
        .filter_map(|path| lookup(obj, path))
        .find_map(parse)
}

fn first_string(obj: &Map<String, Value>, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(obj, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numbers, or strings like "12.50", "12,50", "R$ 1.234,56", "1,234.56".
/// Negative is invalid.
pub fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_decimal(s)?,
        _ => return None,
    };
    (price.is_finite() && price >= 0.0).then_some(price)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    // Whichever separator comes last is the decimal mark.
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma < dot => cleaned.replace(',', ""),
        (Some(_), _) => cleaned.replace('.', "").replace(',', "."),
        (None, _) => cleaned,
    };
    normalized.parse().ok()
}

/// Days as a number, a numeric string, or nested under `days` / `max`.
/// Ranges resolve to their upper bound ("3 a 5 dias" is 5).
pub fn parse_days(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.ceil() as u64))
            .and_then(|d| u32::try_from(d).ok()),
        Value::String(s) => s
            .split(|c: char| !c.is_ascii_digit())
            .filter_map(|digits| digits.parse::<u32>().ok())
            .max(),
        Value::Object(map) => map
            .get("days")
            .or_else(|| map.get("max"))
            .and_then(parse_days),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
