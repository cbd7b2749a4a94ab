use serde::Serialize;

use crate::domain::product::Product;

/// A product together with the quantity requested by the shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Shopping cart assembled at checkout time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`, merging with an existing line for the same product.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { product, quantity }),
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// Delivery details collected by the checkout form.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
}

/// Order hand-off produced at checkout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderMessage {
    /// Plain-text order summary.
    pub message: String,
    /// Messaging deep link carrying the summary.
    pub url: String,
    pub total: f64,
}
