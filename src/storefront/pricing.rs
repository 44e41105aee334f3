//! Variant pricing table.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::aggregates::{Product, Variant};
use crate::domain::value_objects::{format_number, DeliveryMode, Price, PriceField};

/// Used whenever a product has no usable variant.
pub const DEFAULT_TIERS: [(&str, u32, u32); 5] = [
    ("5g", 40, 50),
    ("10g", 70, 90),
    ("25g", 110, 140),
    ("50g", 220, 250),
    ("100g", 440, 470),
];

/// Card label when the first variant is unpriced.
pub const DEFAULT_CARD_LABEL: &str = "5g 40€ / 50€";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PriceTier {
    pub meetup: Price,
    pub livraison: Price,
}

impl PriceTier {
    pub fn new(meetup: u32, livraison: u32) -> Self {
        Self { meetup: Price::new(meetup), livraison: Price::new(livraison) }
    }

    pub fn price(&self, mode: DeliveryMode) -> Price {
        match mode {
            DeliveryMode::Meetup => self.meetup,
            DeliveryMode::Livraison => self.livraison,
        }
    }
}

/// Name → tier mapping plus the order names were offered in.
///
/// `ordered_names` keeps one entry per accepted variant, so a name repeated in
/// the input shows up repeatedly here while the mapping holds the last tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingTable {
    tiers: HashMap<String, PriceTier>,
    ordered_names: Vec<String>,
    is_default: bool,
}

impl PricingTable {
    pub fn from_variants(variants: &[Variant]) -> Self {
        let mut tiers = HashMap::new();
        let mut ordered_names = Vec::new();

        for variant in variants {
            let Some(name) = variant.name.as_deref().filter(|n| !n.is_empty()) else { continue };
            let (Some(meetup), Some(livraison)) = (&variant.meetup_price, &variant.livraison_price) else { continue };
            if !meetup.is_present() || !livraison.is_present() {
                continue;
            }
            tiers.insert(name.to_string(), PriceTier { meetup: meetup.to_price(), livraison: livraison.to_price() });
            ordered_names.push(name.to_string());
        }

        if ordered_names.is_empty() {
            return Self::default_table();
        }
        Self { tiers, ordered_names, is_default: false }
    }

    pub fn for_product(product: &Product) -> Self { Self::from_variants(&product.variants) }

    pub fn default_table() -> Self {
        let tiers = DEFAULT_TIERS.iter().map(|(name, m, l)| (name.to_string(), PriceTier::new(*m, *l))).collect();
        let ordered_names = DEFAULT_TIERS.iter().map(|(name, _, _)| name.to_string()).collect();
        Self { tiers, ordered_names, is_default: true }
    }

    pub fn ordered_names(&self) -> &[String] { &self.ordered_names }
    pub fn first_name(&self) -> Option<&str> { self.ordered_names.first().map(String::as_str) }
    pub fn tier(&self, name: &str) -> Option<&PriceTier> { self.tiers.get(name) }
    pub fn contains(&self, name: &str) -> bool { self.tiers.contains_key(name) }
    pub fn is_default(&self) -> bool { self.is_default }

    /// Missing names resolve to zero.
    pub fn price(&self, name: &str, mode: DeliveryMode) -> Price {
        self.tier(name).map(|t| t.price(mode)).unwrap_or(Price::ZERO)
    }

    /// Rows in offer order, for rendering the quantity picker.
    pub fn rows(&self) -> Vec<PricingRow> {
        self.ordered_names
            .iter()
            .map(|name| {
                let tier = self.tiers.get(name).copied().unwrap_or_default();
                PricingRow { name: name.clone(), meetup: tier.meetup, livraison: tier.livraison }
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PricingRow {
    pub name: String,
    pub meetup: Price,
    pub livraison: Price,
}

/// Short price shown on product cards, taken from the first variant only.
pub fn card_price_label(product: &Product) -> String {
    match product.variants.first() {
        Some(first) if first.has_both_prices() => {
            format!("{}€ / {}€", as_entered(&first.meetup_price), as_entered(&first.livraison_price))
        }
        _ => DEFAULT_CARD_LABEL.to_string(),
    }
}

// Cards echo the price as typed in the back-office.
fn as_entered(field: &Option<PriceField>) -> String {
    match field {
        Some(PriceField::Text(s)) => s.clone(),
        Some(PriceField::Int(n)) => n.to_string(),
        Some(PriceField::Float(f)) => format_number(*f),
        None => String::new(),
    }
}
