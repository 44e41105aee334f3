//! Product detail view model.

use serde::Serialize;

use crate::domain::aggregates::{display_label, Category, Farm, Product, Settings};
use crate::storefront::media::{gallery, MediaItem, PLACEHOLDER};
use crate::storefront::pricing::{PricingRow, PricingTable};
use crate::storefront::selector::{PricingSelector, Selection};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub product: Product,
    pub gallery: Vec<MediaItem>,
    /// Set only when the gallery is empty.
    pub placeholder: Option<&'static str>,
    pub pricing: Vec<PricingRow>,
    pub default_pricing: bool,
    pub selection: Selection,
    pub category: Option<String>,
    pub farm: Option<String>,
    pub order_button_text: String,
}

impl ProductPage {
    pub fn build(product: Product, categories: &[Category], farms: &[Farm], settings: &Settings) -> Self {
        let table = PricingTable::for_product(&product);
        let media = gallery(&product);
        let selection = PricingSelector::with_table(table.clone()).selection();

        Self {
            placeholder: media.is_empty().then_some(PLACEHOLDER),
            gallery: media,
            pricing: table.rows(),
            default_pricing: table.is_default(),
            selection,
            category: display_label(categories, product.category.as_ref()),
            farm: display_label(farms, product.farm.as_ref()),
            order_button_text: settings.order_button_text().to_string(),
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DeliveryMode, Price};

    #[test]
    fn test_page_without_media_or_variants() {
        let product = Product { id: "p".into(), name: "Oeufs".into(), farm: Some("4".into()), ..Default::default() };
        let page = ProductPage::build(product, &[], &[], &Settings::default());
        assert!(page.gallery.is_empty());
        assert_eq!(page.placeholder, Some("🎁"));
        assert!(page.default_pricing);
        assert_eq!(page.pricing.len(), 5);
        assert_eq!(page.selection.quantity.as_deref(), Some("5g"));
        assert_eq!(page.selection.delivery, DeliveryMode::Meetup);
        assert_eq!(page.selection.price, Price::new(40));
        assert_eq!(page.farm.as_deref(), Some("4"));
        assert_eq!(page.order_button_text, "Commander");
    }

    #[test]
    fn test_page_with_media() {
        let product = Product { id: "p".into(), photo: Some("a.jpg".into()), ..Default::default() };
        let settings: Settings = [("orderButtonText".to_string(), "Commander maintenant".to_string())].into_iter().collect();
        let page = ProductPage::build(product, &[], &[], &settings);
        assert_eq!(page.gallery.len(), 1);
        assert_eq!(page.placeholder, None);
        assert_eq!(page.order_button_text, "Commander maintenant");
    }
}
