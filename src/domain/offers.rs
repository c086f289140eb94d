use crate::domain::model::ShippingOffer;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferSelection {
    pub best_price: ShippingOffer,
    pub best_time: ShippingOffer,
}

/// Cheapest offer; ties keep the earliest in list order.
pub fn best_price(offers: &[ShippingOffer]) -> Option<&ShippingOffer> {
    offers.iter().fold(None, |best: Option<&ShippingOffer>, offer| match best {
        Some(current) if current.price <= offer.price => Some(current),
        _ => Some(offer),
    })
}

/// Fastest offer. Unknown delivery time ranks behind any known one, so it is
/// only picked when no offer has a delivery time (then the first offer wins).
pub fn best_time(offers: &[ShippingOffer]) -> Option<&ShippingOffer> {
    offers.iter().fold(None, |best: Option<&ShippingOffer>, offer| match best {
        Some(current) if days_rank(current) <= days_rank(offer) => Some(current),
        _ => Some(offer),
    })
}

fn days_rank(offer: &ShippingOffer) -> u64 {
    offer.delivery_days.map(u64::from).unwrap_or(u64::MAX)
}

pub fn select(offers: &[ShippingOffer]) -> Option<OfferSelection> {
    Some(OfferSelection {
        best_price: best_price(offers)?.clone(),
        best_time: best_time(offers)?.clone(),
    })
}

/// Delivery time for display; unknown shows as "-".
pub fn format_days(days: Option<u32>) -> String {
    match days {
        Some(1) => "1 dia útil".to_string(),
        Some(d) => format!("{} dias úteis", d),
        None => "-".to_string(),
    }
}
