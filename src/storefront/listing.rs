//! Public catalog listing: filtering and card projection.

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{display_label, Category, Farm, Product};
use crate::domain::value_objects::EntityId;
use crate::storefront::media::{primary_media, MediaItem};
use crate::storefront::pricing::card_price_label;

/// Listing filters. All optional, combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<EntityId>,
    #[serde(default)]
    pub farm: Option<EntityId>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && matches_reference(self.category.as_ref(), product.category.as_ref())
            && matches_reference(self.farm.as_ref(), product.farm.as_ref())
    }

    fn matches_search(&self, product: &Product) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        product.name.to_lowercase().contains(&term)
            || product.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&term))
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

fn matches_reference(wanted: Option<&EntityId>, actual: Option<&EntityId>) -> bool {
    match wanted.filter(|id| !id.is_empty()) {
        Some(wanted) => actual == Some(wanted),
        None => true,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: EntityId,
    pub name: String,
    pub category: Option<String>,
    pub farm: Option<String>,
    pub media: Option<MediaItem>,
    pub price_label: String,
}

impl ProductCard {
    pub fn build(product: &Product, categories: &[Category], farms: &[Farm]) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: display_label(categories, product.category.as_ref()),
            farm: display_label(farms, product.farm.as_ref()),
            media: primary_media(product),
            price_label: card_price_label(product),
        }
    }
}

pub fn product_cards(products: &[Product], filter: &ProductFilter, categories: &[Category], farms: &[Farm]) -> Vec<ProductCard> {
    filter
        .apply(products)
        .into_iter()
        .map(|p| ProductCard::build(p, categories, farms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Variant;
    use crate::storefront::media::MediaKind;
    use chrono::Utc;

    fn product(id: &str, name: &str, category: Option<&str>, farm: Option<&str>) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            category: category.map(EntityId::from),
            farm: farm.map(EntityId::from),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            Product { description: Some("Récoltées le matin".into()), ..product("1", "Tomates cerises", Some("1"), Some("10")) },
            product("2", "Miel de lavande", Some("2"), Some("10")),
            product("3", "Fraises", Some("1"), Some("11")),
        ]
    }

    fn ids(products: Vec<&Product>) -> Vec<&str> {
        products.into_iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let products = catalog();
        assert_eq!(ProductFilter::default().apply(&products).len(), 3);
    }

    #[test]
    fn test_search_name_or_description() {
        let products = catalog();
        let filter = ProductFilter { search: Some("MIEL".into()), ..Default::default() };
        assert_eq!(ids(filter.apply(&products)), vec!["2"]);
        let filter = ProductFilter { search: Some("matin".into()), ..Default::default() };
        assert_eq!(ids(filter.apply(&products)), vec!["1"]);
    }

    #[test]
    fn test_filters_combine() {
        let products = catalog();
        let filter = ProductFilter { category: Some(EntityId::from(1_i64)), farm: Some("10".into()), search: None };
        assert_eq!(ids(filter.apply(&products)), vec!["1"]);
        let filter = ProductFilter { category: Some("1".into()), search: Some("miel".into()), farm: None };
        assert!(filter.apply(&products).is_empty());
    }

    #[test]
    fn test_card_projection() {
        let categories = vec![Category { id: "1".into(), name: "Légumes".into(), icon: None, description: None, created_at: Utc::now() }];
        let p = Product {
            photo: Some("t.jpg".into()),
            variants: vec![Variant::new("5g", 35, 45)],
            ..product("1", "Tomates", Some("1"), Some("99"))
        };
        let card = ProductCard::build(&p, &categories, &[]);
        assert_eq!(card.category.as_deref(), Some("Légumes"));
        assert_eq!(card.farm.as_deref(), Some("99"));
        assert_eq!(card.media.map(|m| m.kind), Some(MediaKind::Image));
        assert_eq!(card.price_label, "35€ / 45€");
    }
}
