//! Order messages and the links that carry them.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;

use crate::domain::aggregates::{Product, Settings};
use crate::domain::value_objects::{DeliveryMode, Price};

const MESSAGING_MARKERS: [&str; 2] = ["wa.me", "whatsapp"];
const UNSET_LINK: &str = "#";

/// Same escaping as a browser's `encodeURIComponent`.
pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderLinkError {
    #[error("Lien de commande non configuré. Contactez l'administrateur.")]
    NotConfigured,
}

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

pub fn compose_order_message(product: &Product, quantity: &str, delivery: DeliveryMode, price: Price) -> String {
    format!(
        "Bonjour, je voudrais commander:\n\n{}\n{} - {} - {}",
        product.name,
        quantity,
        delivery.label(),
        price
    )
}

pub fn is_messaging_link(link: &str) -> bool {
    MESSAGING_MARKERS.iter().any(|marker| link.contains(marker))
}

/// Link to open for an order. Messaging-app links carry the message as a
/// `text` parameter; any other link is returned untouched.
pub fn order_url(link: &str, message: &str) -> String {
    if !is_messaging_link(link) {
        return link.to_string();
    }
    let separator = if link.contains('?') { '&' } else { '?' };
    format!("{link}{separator}text={}", encode_component(message))
}

/// The configured order link, or an error when the back-office left it unset.
pub fn configured_order_link(settings: &Settings) -> Result<&str, OrderLinkError> {
    match settings.order_link().map(str::trim) {
        Some(link) if link != UNSET_LINK => Ok(link),
        _ => Err(OrderLinkError::NotConfigured),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderIntent {
    pub message: String,
    pub url: String,
    pub quantity: String,
    pub delivery: DeliveryMode,
    pub price: Price,
}

/// Message plus outbound URL for the current selection.
pub fn prepare_order(
    product: &Product,
    settings: &Settings,
    quantity: &str,
    delivery: DeliveryMode,
    price: Price,
) -> Result<OrderIntent, OrderLinkError> {
    let link = configured_order_link(settings)?;
    let message = compose_order_message(product, quantity, delivery, price);
    let url = order_url(link, &message);
    Ok(OrderIntent { message, url, quantity: quantity.to_string(), delivery, price })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomate() -> Product {
        Product { id: "t".into(), name: "Tomate".into(), ..Default::default() }
    }

    fn settings_with_link(link: &str) -> Settings {
        [("orderLink".to_string(), link.to_string())].into_iter().collect()
    }

    #[test]
    fn test_message_template() {
        let msg = compose_order_message(&tomate(), "5g", DeliveryMode::Meetup, Price::new(40));
        assert_eq!(msg, "Bonjour, je voudrais commander:\n\nTomate\n5g - Meet up - 40€");
    }

    #[test]
    fn test_whatsapp_link_embeds_message() {
        let msg = compose_order_message(&tomate(), "10g", DeliveryMode::Livraison, Price::new(90));
        let url = order_url("https://wa.me/33600000000", &msg);
        assert!(url.starts_with("https://wa.me/33600000000?text="));
        assert!(url.contains("10g"));
        assert!(url.contains("90%E2%82%AC"));
        assert!(url.contains("Livraison"));
        assert!(url.contains("%0A"));
    }

    #[test]
    fn test_existing_query_uses_ampersand() {
        let url = order_url("https://api.whatsapp.com/send?phone=336", "hi there");
        assert_eq!(url, "https://api.whatsapp.com/send?phone=336&text=hi%20there");
    }

    #[test]
    fn test_other_links_unchanged() {
        assert_eq!(order_url("https://t.me/ferme", "hello"), "https://t.me/ferme");
    }

    #[test]
    fn test_unconfigured_link() {
        assert_eq!(configured_order_link(&Settings::default()), Err(OrderLinkError::NotConfigured));
        assert_eq!(configured_order_link(&settings_with_link("#")), Err(OrderLinkError::NotConfigured));
        let err = prepare_order(&tomate(), &settings_with_link("#"), "5g", DeliveryMode::Meetup, Price::new(40)).unwrap_err();
        assert!(err.to_string().starts_with("Lien de commande non configuré"));
    }

    #[test]
    fn test_prepare_order() {
        let intent = prepare_order(&tomate(), &settings_with_link("https://wa.me/1"), "25g", DeliveryMode::Meetup, Price::new(110)).unwrap();
        assert!(intent.url.contains("text=Bonjour%2C%20je%20voudrais%20commander"));
        assert_eq!(intent.price, Price::new(110));
    }

    #[test]
    fn test_encode_component_keeps_unreserved() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
    }
}
