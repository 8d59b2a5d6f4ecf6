//! Cart entity - line items bound to a single restaurant
//!
//! Pure data and derived values; no I/O. Mutation helpers are crate-private so
//! that only the use-case layer changes a cart.

use crate::constants::MAX_LINE_QUANTITY;
use serde::{Deserialize, Serialize};

/// One purchasable quantity of a single menu item within a cart.
///
/// `id` identifies the line itself and is distinct from `menu_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    pub menu_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    pub restaurant_id: String,
    #[serde(default)]
    pub restaurant_name: String,
}

impl CartLineItem {
    /// Unit price times quantity
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Read-only summary of the restaurant a cart is bound to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInfo {
    pub id: String,
    pub name: String,
    pub delivery_fee: f64,
}

impl RestaurantInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, delivery_fee: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            delivery_fee,
        }
    }
}

/// The cart aggregate.
///
/// A non-empty cart holds lines from exactly one restaurant; the bound
/// restaurant is set by the first line and cleared when the last line goes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub(crate) items: Vec<CartLineItem>,
    pub(crate) restaurant_id: Option<String>,
    pub(crate) restaurant_name: Option<String>,
    pub(crate) delivery_fee: f64,
}

impl Cart {
    /// Create a new empty cart
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        items: Vec<CartLineItem>,
        restaurant_id: Option<String>,
        restaurant_name: Option<String>,
        delivery_fee: f64,
    ) -> Self {
        Self {
            items,
            restaurant_id,
            restaurant_name,
            delivery_fee,
        }
    }

    /// Borrow the lines in insertion order
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Copy of the lines; callers can't reach the cart's own collection
    pub fn cart_items(&self) -> Vec<CartLineItem> {
        self.items.clone()
    }

    pub fn restaurant_id(&self) -> Option<&str> {
        self.restaurant_id.as_deref()
    }

    pub fn restaurant_name(&self) -> Option<&str> {
        self.restaurant_name.as_deref()
    }

    pub fn delivery_fee(&self) -> f64 {
        self.delivery_fee
    }

    /// Sum of quantities across all lines, saturating at `u32::MAX`
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Sum of price times quantity across all lines
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.delivery_fee
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Bound restaurant, reported only when both id and name are set
    pub fn restaurant_info(&self) -> Option<RestaurantInfo> {
        match (&self.restaurant_id, &self.restaurant_name) {
            (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => Some(RestaurantInfo {
                id: id.clone(),
                name: name.clone(),
                delivery_fee: self.delivery_fee,
            }),
            _ => None,
        }
    }

    /// True if the cart is empty or already bound to `restaurant_id`.
    ///
    /// Does not mutate; callers check before adding.
    pub fn can_add_item(&self, restaurant_id: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        self.restaurant_id.as_deref() == Some(restaurant_id)
    }

    /// Line holding the given menu item, searched by menu identity
    pub fn find_item(&self, menu_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.menu_id == menu_id)
    }

    /// Line with the given line identity
    pub fn find_line(&self, line_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == line_id)
    }

    pub fn get_item_quantity(&self, menu_id: &str) -> u32 {
        self.find_item(menu_id).map_or(0, |item| item.quantity)
    }

    pub(crate) fn find_item_mut(&mut self, menu_id: &str) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.menu_id == menu_id)
    }

    pub(crate) fn find_line_mut(&mut self, line_id: &str) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id == line_id)
    }

    pub(crate) fn bind_restaurant(&mut self, restaurant: &RestaurantInfo) {
        self.restaurant_id = Some(restaurant.id.clone());
        self.restaurant_name = Some(restaurant.name.clone());
        self.delivery_fee = restaurant.delivery_fee;
    }

    pub(crate) fn unbind_restaurant(&mut self) {
        self.restaurant_id = None;
        self.restaurant_name = None;
        self.delivery_fee = 0.0;
    }

    /// Drops the line with `line_id`; unbinds the restaurant if the cart ends up empty.
    /// Returns whether a line was removed.
    pub(crate) fn remove_line(&mut self, line_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != line_id);
        if self.items.is_empty() {
            self.unbind_restaurant();
        }
        self.items.len() != before
    }

    /// Restores the entity invariants on data read back from storage.
    ///
    /// Lines with quantity 0 are dropped and oversized quantities are capped at
    /// `MAX_LINE_QUANTITY`. An empty cart is unbound; a non-empty cart with no
    /// bound restaurant takes the binding from its first line. Returns the number
    /// of dropped lines, or `None` if the lines don't all belong to the bound
    /// restaurant.
    pub(crate) fn normalize(&mut self) -> Option<usize> {
        let before = self.items.len();
        self.items.retain(|item| item.quantity > 0);
        let dropped = before - self.items.len();
        for item in &mut self.items {
            item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
        }

        if self.items.is_empty() {
            self.unbind_restaurant();
            return Some(dropped);
        }
        if self.restaurant_id.is_none() {
            let first = &self.items[0];
            self.restaurant_id = Some(first.restaurant_id.clone());
            if self.restaurant_name.is_none() && !first.restaurant_name.is_empty() {
                self.restaurant_name = Some(first.restaurant_name.clone());
            }
        }

        let bound = self.restaurant_id.as_deref();
        if self.items.iter().any(|item| Some(item.restaurant_id.as_str()) != bound) {
            return None;
        }
        Some(dropped)
    }
}
