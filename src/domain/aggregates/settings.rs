//! Store settings: a flat key/value table read once per page.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const ORDER_LINK: &str = "orderLink";
pub const ORDER_BUTTON_TEXT: &str = "orderButtonText";
pub const STORE_NAME: &str = "storeName";

/// Button text when the back-office never set one.
pub const FALLBACK_ORDER_BUTTON_TEXT: &str = "Commander";

/// Seeded by the init route.
pub const DEFAULT_SETTINGS: [(&str, &str); 8] = [
    ("storeName", "E-Commerce Store"),
    ("storeDescription", "Votre boutique en ligne premium"),
    ("storeEmail", "contact@store.com"),
    ("storePhone", "+33123456789"),
    ("orderLink", "https://wa.me/33123456789"),
    ("orderButtonText", "Commander maintenant"),
    ("currency", "EUR"),
    ("language", "fr"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    pub fn order_link(&self) -> Option<&str> { self.get(ORDER_LINK) }

    pub fn order_button_text(&self) -> &str {
        self.get(ORDER_BUTTON_TEXT).unwrap_or(FALLBACK_ORDER_BUTTON_TEXT)
    }

    pub fn store_name(&self) -> Option<&str> { self.get(STORE_NAME) }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<(String, String)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

/// Settings update body. Values may arrive as any JSON scalar; null clears to "".
pub fn settings_from_json(body: BTreeMap<String, Value>) -> Settings {
    body.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let settings: Settings = [("orderLink".to_string(), "https://wa.me/1".to_string()), ("orderButtonText".to_string(), " ".to_string())]
            .into_iter()
            .collect();
        assert_eq!(settings.order_link(), Some("https://wa.me/1"));
        assert_eq!(settings.order_button_text(), "Commander");
        assert_eq!(settings.store_name(), None);
    }

    #[test]
    fn test_settings_from_json() {
        let body: BTreeMap<String, Value> = serde_json::from_value(json!({"storeName": "Ferme", "delay": 5, "x": null})).unwrap();
        let settings = settings_from_json(body);
        assert_eq!(settings.get("storeName"), Some("Ferme"));
        assert_eq!(settings.get("delay"), Some("5"));
        assert_eq!(settings.get("x"), None);
        assert_eq!(settings.len(), 3);
    }
}
