//! Quantity / delivery-mode selection for one product view.

use serde::Serialize;
use std::fmt;

use crate::domain::value_objects::{DeliveryMode, Price};
use crate::storefront::pricing::PricingTable;

/// What the selector reports after every change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub quantity: Option<String>,
    pub delivery: DeliveryMode,
    pub price: Price,
}

type Subscriber = Box<dyn FnMut(&Selection) + Send>;

pub struct PricingSelector {
    table: Option<PricingTable>,
    quantity: Option<String>,
    delivery: DeliveryMode,
    subscriber: Option<Subscriber>,
}

impl PricingSelector {
    /// A selector whose table has not been resolved yet.
    pub fn new() -> Self {
        Self { table: None, quantity: None, delivery: DeliveryMode::Meetup, subscriber: None }
    }

    pub fn with_table(table: PricingTable) -> Self {
        let mut selector = Self::new();
        selector.set_table(table);
        selector
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Selection) + Send + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    /// Install the resolved table. The first offered quantity is picked when
    /// nothing is selected yet; no change is emitted.
    pub fn set_table(&mut self, table: PricingTable) {
        if self.quantity.is_none() {
            self.quantity = table.first_name().map(str::to_string);
        }
        self.table = Some(table);
    }

    pub fn table(&self) -> Option<&PricingTable> { self.table.as_ref() }
    pub fn quantity(&self) -> Option<&str> { self.quantity.as_deref() }
    pub fn delivery(&self) -> DeliveryMode { self.delivery }

    /// Unknown names are ignored and nothing is emitted.
    pub fn select_quantity(&mut self, name: &str) -> Option<Selection> {
        if !self.table.as_ref().is_some_and(|t| t.contains(name)) {
            return None;
        }
        self.quantity = Some(name.to_string());
        Some(self.emit())
    }

    pub fn select_delivery(&mut self, mode: DeliveryMode) -> Selection {
        self.delivery = mode;
        self.emit()
    }

    /// Zero whenever the table, the quantity or the tier is missing.
    pub fn current_price(&self) -> Price {
        match (&self.table, &self.quantity) {
            (Some(table), Some(quantity)) => table.price(quantity, self.delivery),
            _ => Price::ZERO,
        }
    }

    pub fn selection(&self) -> Selection {
        Selection { quantity: self.quantity.clone(), delivery: self.delivery, price: self.current_price() }
    }

    fn emit(&mut self) -> Selection {
        let selection = self.selection();
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(&selection);
        }
        selection
    }
}

impl Default for PricingSelector {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for PricingSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PricingSelector")
            .field("quantity", &self.quantity)
            .field("delivery", &self.delivery)
            .field("subscribed", &self.subscriber.is_some())
            .finish()
    }
}
