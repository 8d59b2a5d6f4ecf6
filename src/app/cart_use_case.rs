use crate::app::ports::CartRepositoryPort;
use crate::constants;
use crate::domain::{Cart, CartLineItem, MenuItem, RestaurantInfo};
use crate::error::Result;
use crate::metrics;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything needed to put a menu item into the cart
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCartParams {
    pub menu_id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub delivery_fee: f64,
    /// 0 is treated as 1; anything above `MAX_LINE_QUANTITY` is capped
    pub quantity: u32,
}

impl AddToCartParams {
    pub fn new(item: &MenuItem, restaurant: &RestaurantInfo) -> Self {
        Self {
            menu_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            restaurant_id: restaurant.id.clone(),
            restaurant_name: restaurant.name.clone(),
            delivery_fee: restaurant.delivery_fee,
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    fn effective_quantity(&self) -> u32 {
        self.quantity.clamp(1, constants::MAX_LINE_QUANTITY)
    }

    fn has_valid_prices(&self) -> bool {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        valid(self.price) && valid(self.delivery_fee)
    }

    fn restaurant(&self) -> RestaurantInfo {
        RestaurantInfo::new(&self.restaurant_id, &self.restaurant_name, self.delivery_fee)
    }

    fn new_line(&self) -> CartLineItem {
        CartLineItem {
            id: generate_line_id(&self.menu_id),
            menu_id: self.menu_id.clone(),
            name: self.name.clone(),
            price: self.price,
            quantity: self.effective_quantity(),
            image: self.image.clone(),
            restaurant_id: self.restaurant_id.clone(),
            restaurant_name: self.restaurant_name.clone(),
        }
    }
}

/// Line identity: the menu id plus a random v4 UUID, unique for every add.
pub fn generate_line_id(menu_id: &str) -> String {
    format!("{}_{}", menu_id, Uuid::new_v4().simple())
}

/// Why an add was refused. These are expected outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DifferentRestaurant,
    InvalidPrice,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::DifferentRestaurant => constants::DIFFERENT_RESTAURANT,
            RejectReason::InvalidPrice => constants::INVALID_PRICE,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddToCartOutcome {
    Added(Cart),
    /// Nothing was mutated or persisted; `cart` is the cart as loaded.
    Rejected { reason: RejectReason, cart: Cart },
}

impl AddToCartOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AddToCartOutcome::Added(_))
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            AddToCartOutcome::Added(_) => None,
            AddToCartOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }

    pub fn cart(&self) -> &Cart {
        match self {
            AddToCartOutcome::Added(cart) => cart,
            AddToCartOutcome::Rejected { cart, .. } => cart,
        }
    }

    pub fn into_cart(self) -> Cart {
        match self {
            AddToCartOutcome::Added(cart) => cart,
            AddToCartOutcome::Rejected { cart, .. } => cart,
        }
    }
}

/// Use cases for every cart mutation.
///
/// Each operation loads the persisted cart, applies one rule, saves, and
/// returns the new cart; no cart is kept between calls. Operations are
/// serialized through a fair mutex so two concurrent calls can't both load the
/// same snapshot and overwrite each other's save.
pub struct CartUseCases {
    repository: Arc<dyn CartRepositoryPort>,
    mutation_gate: Mutex<()>,
}

impl CartUseCases {
    pub fn new(repository: Arc<dyn CartRepositoryPort>) -> Self {
        Self {
            repository,
            mutation_gate: Mutex::new(()),
        }
    }

    pub async fn add_to_cart(&self, params: &AddToCartParams) -> Result<AddToCartOutcome> {
        let _guard = self.mutation_gate.lock().await;
        let mut cart = self.repository.get_cart().await?;

        if !params.has_valid_prices() {
            debug!(
                menu_id = %params.menu_id,
                price = params.price,
                "rejecting add with invalid price"
            );
            metrics::cart::add_rejected(RejectReason::InvalidPrice.code());
            return Ok(AddToCartOutcome::Rejected {
                reason: RejectReason::InvalidPrice,
                cart,
            });
        }

        if !cart.can_add_item(&params.restaurant_id) {
            debug!(
                bound = cart.restaurant_id().unwrap_or_default(),
                requested = %params.restaurant_id,
                "rejecting add from a different restaurant"
            );
            metrics::cart::add_rejected(RejectReason::DifferentRestaurant.code());
            return Ok(AddToCartOutcome::Rejected {
                reason: RejectReason::DifferentRestaurant,
                cart,
            });
        }

        let quantity = params.effective_quantity();
        if let Some(existing) = cart.find_item_mut(&params.menu_id) {
            existing.quantity = existing
                .quantity
                .saturating_add(quantity)
                .min(constants::MAX_LINE_QUANTITY);
            metrics::cart::quantity_merged(quantity);
        } else {
            cart.items.push(params.new_line());
            if cart.items.len() == 1 {
                cart.bind_restaurant(&params.restaurant());
            }
            metrics::cart::line_added();
        }

        self.repository.save_cart(&cart).await?;
        info!(
            menu_id = %params.menu_id,
            quantity,
            item_count = cart.item_count(),
            "added to cart"
        );
        Ok(AddToCartOutcome::Added(cart))
    }

    /// Sets a line's quantity (absolute, not a delta), capped at `MAX_LINE_QUANTITY`.
    /// Zero or below removes the line.
    /// An unknown line id leaves the cart unchanged.
    pub async fn update_quantity(&self, line_id: &str, quantity: i64) -> Result<Cart> {
        let _guard = self.mutation_gate.lock().await;
        if quantity <= 0 {
            return self.remove_item_locked(line_id).await;
        }

        let mut cart = self.repository.get_cart().await?;
        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(constants::MAX_LINE_QUANTITY);
        match cart.find_line_mut(line_id) {
            Some(line) => {
                line.quantity = quantity;
                metrics::cart::quantity_updated();
            }
            None => debug!(line_id, "quantity update for unknown line ignored"),
        }

        self.repository.save_cart(&cart).await?;
        Ok(cart)
    }

    /// Removes a line by its own identity; unbinds the restaurant when the cart empties.
    pub async fn remove_item(&self, line_id: &str) -> Result<Cart> {
        let _guard = self.mutation_gate.lock().await;
        self.remove_item_locked(line_id).await
    }

    async fn remove_item_locked(&self, line_id: &str) -> Result<Cart> {
        let mut cart = self.repository.get_cart().await?;
        if cart.remove_line(line_id) {
            metrics::cart::line_removed();
        } else {
            debug!(line_id, "removal of unknown line ignored");
        }
        self.repository.save_cart(&cart).await?;
        Ok(cart)
    }

    /// Deletes the persisted snapshot and returns a fresh empty cart.
    pub async fn clear_cart(&self) -> Result<Cart> {
        let _guard = self.mutation_gate.lock().await;
        self.repository.clear_cart().await?;
        metrics::cart::cleared();
        info!("cart cleared");
        Ok(Cart::new())
    }

    pub async fn get_cart(&self) -> Result<Cart> {
        let _guard = self.mutation_gate.lock().await;
        self.repository.get_cart().await
    }
}
