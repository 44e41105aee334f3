//! Value Objects for the storefront

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical entity identifier.
///
/// Records written by older clients carry numeric ids while newer ones carry
/// strings; both deserialize to the same canonical text so lookups compare a
/// single representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into().trim().to_string()) }
    pub fn generate() -> Self { Self(Uuid::now_v7().to_string()) }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for EntityId { fn from(value: &str) -> Self { Self::new(value) } }
impl From<String> for EntityId { fn from(value: String) -> Self { Self::new(value) } }
impl From<i64> for EntityId { fn from(value: i64) -> Self { Self(value.to_string()) } }

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Loose::deserialize(deserializer)? {
            Loose::Text(s) => Ok(Self::new(s)),
            Loose::Int(n) => Ok(Self::from(n)),
            Loose::Float(f) => Ok(Self(format_number(f))),
            Loose::Bool(b) => Ok(Self(b.to_string())),
        }
    }
}

/// Whole-euro amount. Prices never go below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    pub const ZERO: Price = Price(0);
    pub const fn new(euros: u32) -> Self { Self(euros) }
    pub fn euros(&self) -> u32 { self.0 }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}€", self.0) }
}

/// The two price tiers a variant is sold at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    #[default]
    Meetup,
    Livraison,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Meetup => "meetup", Self::Livraison => "livraison" }
    }

    /// Customer-facing label used in order messages.
    pub fn label(&self) -> &'static str {
        match self { Self::Meetup => "Meet up", Self::Livraison => "Livraison" }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

impl FromStr for DeliveryMode {
    type Err = DeliveryModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meetup" => Ok(Self::Meetup),
            "livraison" => Ok(Self::Livraison),
            other => Err(DeliveryModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub struct DeliveryModeError(pub String);
impl std::error::Error for DeliveryModeError {}
impl fmt::Display for DeliveryModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "unknown delivery mode: {}", self.0) }
}

/// A price as it arrives from the back-office: number, numeric text, or junk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Int(i64),
    Float(f64),
    Text(String),
}

impl PriceField {
    /// Blank text and a literal zero count as "not filled in".
    pub fn is_present(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Integer-prefix parse; anything unparseable or negative is zero.
    pub fn to_price(&self) -> Price {
        let parsed = match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(s) => parse_int_prefix(s),
        };
        parsed.and_then(|n| u32::try_from(n).ok()).map(Price::new).unwrap_or(Price::ZERO)
    }
}

/// Leading-integer parse: `" 12€"` is 12, `"abc"` is `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 { return None; }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

pub(crate) fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 { format!("{}", f as i64) } else { f.to_string() }
}

/// Serde helper for scalar columns that older clients sent as numbers.
pub mod loose_text {
    use super::{format_number, Loose};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Loose>::deserialize(deserializer)?.map(|raw| match raw {
            Loose::Text(s) => s,
            Loose::Int(n) => n.to_string(),
            Loose::Float(f) => format_number(f),
            Loose::Bool(b) => b.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_numeric_and_text_agree() {
        let a: EntityId = serde_json::from_str("42").unwrap();
        let b: EntityId = serde_json::from_str("\"42\"").unwrap();
        let c: EntityId = serde_json::from_str("42.0").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "42");
    }

    #[test]
    fn test_entity_id_trims() { assert_eq!(EntityId::new("  abc ").as_str(), "abc"); }

    #[test]
    fn test_price_display() { assert_eq!(Price::new(90).to_string(), "90€"); }

    #[test]
    fn test_delivery_mode() {
        assert_eq!("Livraison".parse::<DeliveryMode>().unwrap(), DeliveryMode::Livraison);
        assert_eq!(DeliveryMode::Meetup.label(), "Meet up");
        assert!("pickup".parse::<DeliveryMode>().is_err());
        let json = serde_json::to_string(&DeliveryMode::Livraison).unwrap();
        assert_eq!(json, "\"livraison\"");
    }

    #[test]
    fn test_price_field_presence() {
        assert!(PriceField::Text("0".into()).is_present());
        assert!(!PriceField::Text(String::new()).is_present());
        assert!(!PriceField::Int(0).is_present());
        assert!(PriceField::Int(40).is_present());
    }

    #[test]
    fn test_price_field_parse() {
        assert_eq!(PriceField::Text("70".into()).to_price(), Price::new(70));
        assert_eq!(PriceField::Text(" 12€".into()).to_price(), Price::new(12));
        assert_eq!(PriceField::Text("abc".into()).to_price(), Price::ZERO);
        assert_eq!(PriceField::Text("-5".into()).to_price(), Price::ZERO);
        assert_eq!(PriceField::Float(49.9).to_price(), Price::new(49));
    }

    #[test]
    fn test_loose_text() {
        #[derive(Deserialize)]
        struct Row { #[serde(default, deserialize_with = "loose_text::deserialize")] price: Option<String> }
        let row: Row = serde_json::from_str(r#"{"price": 15}"#).unwrap();
        assert_eq!(row.price.as_deref(), Some("15"));
        let row: Row = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(row.price, None);
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.price, None);
    }
}
