//! Product Aggregate
//!
//! `ProductRow` is what the store holds; `Product` is the normalized snapshot the
//! storefront logic works on. Everything except `id` and `name` is optional and
//! anything malformed collapses to an empty default at this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use validator::Validate;

use crate::domain::value_objects::{loose_text, EntityId, PriceField};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<EntityId>,
    pub farm: Option<EntityId>,
    pub price: Option<String>,
    pub photo: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub medias: Option<Json<Value>>,
    pub variants: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<EntityId>,
    #[serde(default)]
    pub farm: Option<EntityId>,
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub price: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default, deserialize_with = "deserialize_medias")]
    pub medias: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_variants")]
    pub variants: Vec<Variant>,
}

/// A quantity tier with its two prices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub name: Option<String>,
    #[serde(default)]
    pub meetup_price: Option<PriceField>,
    #[serde(default)]
    pub livraison_price: Option<PriceField>,
}

impl Variant {
    pub fn new(name: impl Into<String>, meetup: u32, livraison: u32) -> Self {
        Self {
            name: Some(name.into()),
            meetup_price: Some(PriceField::Int(meetup.into())),
            livraison_price: Some(PriceField::Int(livraison.into())),
        }
    }

    /// Both prices filled in; the name is checked separately by the pricing table.
    pub fn has_both_prices(&self) -> bool {
        self.meetup_price.as_ref().is_some_and(PriceField::is_present)
            && self.livraison_price.as_ref().is_some_and(PriceField::is_present)
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category.filter(|id| !id.is_empty()),
            farm: row.farm.filter(|id| !id.is_empty()),
            price: row.price,
            photo: row.photo,
            image: row.image,
            video: row.video,
            medias: row.medias.map(|Json(v)| media_list(&v)).unwrap_or_default(),
            variants: row.variants.map(|Json(v)| variant_list(&v)).unwrap_or_default(),
        }
    }
}

/// Media entries from a JSON array, or from a string holding one. Non-string
/// entries are dropped.
pub fn media_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        Value::String(raw) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_array)
            .map(|v| media_list(&v))
            .unwrap_or_default(),
        _ => vec![],
    }
}

/// Variants from a JSON array, or from a string holding one. Entries that are
/// not objects of the expected shape are dropped.
pub fn variant_list(value: &Value) -> Vec<Variant> {
    match value {
        Value::Array(items) => items.iter().filter_map(|v| serde_json::from_value(v.clone()).ok()).collect(),
        Value::String(raw) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_array)
            .map(|v| variant_list(&v))
            .unwrap_or_default(),
        _ => vec![],
    }
}

fn deserialize_medias<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.map(|v| media_list(&v)).unwrap_or_default())
}

fn deserialize_variants<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Variant>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.map(|v| variant_list(&v)).unwrap_or_default())
}

/// Admin create/update body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<EntityId>,
    pub farm: Option<EntityId>,
    #[serde(default, deserialize_with = "loose_text::deserialize")]
    pub price: Option<String>,
    pub photo: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub medias: Option<Value>,
    pub variants: Option<Value>,
}

/// Column values ready to bind, blanks stored as NULL.
#[derive(Debug, Clone)]
pub struct ProductColumns {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<EntityId>,
    pub farm: Option<EntityId>,
    pub price: Option<String>,
    pub photo: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub medias: Option<Json<Vec<String>>>,
    pub variants: Option<Json<Vec<Variant>>>,
}

impl ProductPayload {
    pub fn into_columns(self) -> ProductColumns {
        let medias = self.medias.as_ref().map(media_list).unwrap_or_default();
        let variants = self.variants.as_ref().map(variant_list).unwrap_or_default();
        ProductColumns {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            category: self.category.filter(|id| !id.is_empty()),
            farm: self.farm.filter(|id| !id.is_empty()),
            price: non_blank(self.price),
            photo: non_blank(self.photo),
            image: non_blank(self.image),
            video: non_blank(self.video),
            medias: (!medias.is_empty()).then_some(Json(medias)),
            variants: (!variants.is_empty()).then_some(Json(variants)),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_from_untrusted_json() {
        let p: Product = serde_json::from_value(json!({
            "id": 7,
            "name": "Tomate",
            "category": 3,
            "price": 12,
            "medias": ["a.jpg", 5, "b.mp4"],
            "variants": [{"name": "5g", "meetupPrice": "40", "livraisonPrice": 50}, "junk"],
            "unknown": true
        })).unwrap();
        assert_eq!(p.id.as_str(), "7");
        assert_eq!(p.category, Some(EntityId::from("3")));
        assert_eq!(p.price.as_deref(), Some("12"));
        assert_eq!(p.medias, vec!["a.jpg", "b.mp4"]);
        assert_eq!(p.variants.len(), 1);
        assert!(p.variants[0].has_both_prices());
    }

    #[test]
    fn test_medias_as_encoded_string() {
        let p: Product = serde_json::from_value(json!({"id": "x", "medias": "[\"a.jpg\"]", "variants": null})).unwrap();
        assert_eq!(p.medias, vec!["a.jpg"]);
        assert!(p.variants.is_empty());
        let p: Product = serde_json::from_value(json!({"id": "x", "medias": ""})).unwrap();
        assert!(p.medias.is_empty());
    }

    #[test]
    fn test_variant_missing_price() {
        let v: Variant = serde_json::from_value(json!({"name": "5g", "meetupPrice": 40})).unwrap();
        assert!(!v.has_both_prices());
    }

    #[test]
    fn test_payload_blanks_become_null() {
        let payload: ProductPayload = serde_json::from_value(json!({
            "name": " Miel ", "description": "", "photo": "  ", "medias": "", "variants": "", "price": ""
        })).unwrap();
        let cols = payload.into_columns();
        assert_eq!(cols.name, "Miel");
        assert_eq!(cols.description, None);
        assert_eq!(cols.photo, None);
        assert_eq!(cols.price, None);
        assert!(cols.medias.is_none());
        assert!(cols.variants.is_none());
    }

    #[test]
    fn test_payload_validation() {
        let payload: ProductPayload = serde_json::from_value(json!({"name": ""})).unwrap();
        assert!(payload.validate().is_err());
    }
}
