//! Cart DTOs for the Communication API.
//!
//! # Design
//! `Product` mirrors the backend's wire record field for field. Field order
//! matters: serde emits keys in declaration order, and the probe promises the
//! same bytes the backend's own clients send
//! (`id, name, description, category, quantity`).
//!
//! The category→partition table is the one the API layer uses to fan a cart
//! out to backend partitions. The probe only consults it to warn about carts
//! the backend will reject.

use serde::{Deserialize, Serialize};

/// A single cart line as the backend expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: i32,
}

impl Product {
    pub fn new(id: i32, name: &str, category: &str, quantity: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: "string".to_string(),
            category: category.to_string(),
            quantity,
        }
    }
}

/// Category names in partition order.
pub const CATEGORIES: [&str; 3] = ["Alimentos", "Bebidas", "Tecno"];

/// Partition that owns `category`, if any.
pub fn partition_of(category: &str) -> Option<u32> {
    CATEGORIES
        .iter()
        .position(|c| *c == category)
        .map(|idx| idx as u32)
}

/// Categories in `cart` with no owning partition, deduplicated, in first-seen order.
pub fn unknown_categories(cart: &[Product]) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for product in cart {
        if partition_of(&product.category).is_none() && !unknown.contains(&product.category) {
            unknown.push(product.category.clone());
        }
    }
    unknown
}

/// One loaf of bread. Used by the single-shot purchase probe.
pub fn single_cart() -> Vec<Product> {
    vec![Product::new(0, "Pan", "Alimentos", 1)]
}

/// One product per partition. Every batch unit sends this cart.
pub fn triple_cart() -> Vec<Product> {
    vec![
        Product::new(0, "Pan", "Alimentos", 30),
        Product::new(1, "CocaCola", "Bebidas", 0),
        Product::new(2, "Notebook", "Tecno", 0),
    ]
}
