//! Process-wide holder of the current cart.
//!
//! The provider owns the only "current" `Cart`, mediates confirmations the
//! use-cases must not know about, and turns infrastructure failures into
//! notices. State is published over a `watch` channel so a UI can subscribe.

use crate::app::cart_use_case::{AddToCartOutcome, AddToCartParams, CartUseCases, RejectReason};
use crate::app::ports::{ConfirmationPort, ConfirmationRequest, Notice, NoticePort};
use crate::domain::{Cart, CartLineItem, MenuItem, RestaurantInfo};
use crate::error::CartError;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, OnceCell};
use tracing::{error, info, warn};

const GENERIC_ERROR_NOTICE: &str = "Something went wrong";
const CART_CLEARED_NOTICE: &str = "Cart cleared";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The persisted cart has not been read yet
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    pub status: LoadStatus,
    pub cart: Cart,
}

impl CartState {
    fn loading() -> Self {
        Self {
            status: LoadStatus::Loading,
            cart: Cart::new(),
        }
    }
}

/// What happened to a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The use-case result was committed to provider state
    Applied,
    /// The user declined a confirmation
    Cancelled,
    /// Nothing to do (e.g. decrementing an item that isn't in the cart)
    Unchanged,
    /// The operation failed; provider state keeps its last known-good cart
    Failed,
}

pub struct CartProvider {
    use_cases: Arc<CartUseCases>,
    confirmation: Arc<dyn ConfirmationPort>,
    notices: Arc<dyn NoticePort>,
    state: watch::Sender<CartState>,
    loaded: OnceCell<()>,
    // Held for a whole action (use-case call plus commit) so commits land in order.
    action_gate: Mutex<()>,
}

impl CartProvider {
    pub fn new(
        use_cases: Arc<CartUseCases>,
        confirmation: Arc<dyn ConfirmationPort>,
        notices: Arc<dyn NoticePort>,
    ) -> Self {
        let (state, _) = watch::channel(CartState::loading());
        Self {
            use_cases,
            confirmation,
            notices,
            state,
            loaded: OnceCell::new(),
            action_gate: Mutex::new(()),
        }
    }

    /// Loads the persisted cart. Runs at most once; later calls wait for the first.
    pub async fn activate(&self) {
        self.loaded
            .get_or_init(|| async {
                let _guard = self.action_gate.lock().await;
                match self.use_cases.get_cart().await {
                    Ok(cart) => {
                        info!(lines = cart.line_count(), "cart loaded");
                        self.state.send_modify(|state| {
                            state.cart = cart;
                            state.status = LoadStatus::Ready;
                        });
                    }
                    Err(e) => {
                        error!("Error loading cart: {}", e);
                        self.state.send_modify(|state| state.status = LoadStatus::Ready);
                    }
                }
            })
            .await;
    }

    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    pub fn is_loading(&self) -> bool {
        self.status() == LoadStatus::Loading
    }

    pub fn cart(&self) -> Cart {
        self.state.borrow().cart.clone()
    }

    // Derived values are recomputed from the held cart on every read.

    pub fn item_count(&self) -> u32 {
        self.state.borrow().cart.item_count()
    }

    pub fn subtotal(&self) -> f64 {
        self.state.borrow().cart.subtotal()
    }

    pub fn delivery_fee(&self) -> f64 {
        self.state.borrow().cart.delivery_fee()
    }

    pub fn total(&self) -> f64 {
        self.state.borrow().cart.total()
    }

    pub fn cart_items(&self) -> Vec<CartLineItem> {
        self.state.borrow().cart.cart_items()
    }

    pub fn restaurant_info(&self) -> Option<RestaurantInfo> {
        self.state.borrow().cart.restaurant_info()
    }

    pub fn get_item_quantity(&self, menu_id: &str) -> u32 {
        self.state.borrow().cart.get_item_quantity(menu_id)
    }

    /// Adds a menu item. If the cart belongs to another restaurant the user is
    /// asked whether to clear it; on yes the cart is cleared and the same add is
    /// issued again as a separate call.
    pub async fn add_to_cart(
        &self,
        item: &MenuItem,
        restaurant: &RestaurantInfo,
        quantity: u32,
    ) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        let params = AddToCartParams::new(item, restaurant).with_quantity(quantity);
        self.add_locked(&params).await
    }

    pub async fn update_quantity(&self, line_id: &str, quantity: i64) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        self.update_locked(line_id, quantity).await
    }

    pub async fn remove_from_cart(&self, line_id: &str) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        self.remove_locked(line_id).await
    }

    /// Clears the cart after the user confirms.
    pub async fn clear_cart(&self) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        if !self.confirmation.confirm(&ConfirmationRequest::ClearCart).await {
            return ActionOutcome::Cancelled;
        }
        let outcome = self.clear_locked().await;
        if outcome == ActionOutcome::Applied {
            self.notices.show(Notice::success(CART_CLEARED_NOTICE));
        }
        outcome
    }

    /// Restaurant-screen "+": bumps the existing line or adds a new one.
    pub async fn increase_menu_item(
        &self,
        item: &MenuItem,
        restaurant: &RestaurantInfo,
    ) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        let existing = self.state.borrow().cart.find_item(&item.id).cloned();
        match existing {
            Some(line) if line.restaurant_id == restaurant.id => {
                self.update_locked(&line.id, i64::from(line.quantity) + 1).await
            }
            Some(_) => ActionOutcome::Unchanged,
            None => {
                let params = AddToCartParams::new(item, restaurant);
                self.add_locked(&params).await
            }
        }
    }

    /// Restaurant-screen "-": decrements, removing the line at quantity 1.
    pub async fn decrease_menu_item(&self, menu_id: &str) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        let existing = self.state.borrow().cart.find_item(menu_id).cloned();
        match existing {
            Some(line) => self.step_down_locked(&line).await,
            None => ActionOutcome::Unchanged,
        }
    }

    /// Cart-screen "+" on a line
    pub async fn increment_line(&self, line_id: &str) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        let existing = self.state.borrow().cart.find_line(line_id).cloned();
        match existing {
            Some(line) => self.update_locked(&line.id, i64::from(line.quantity) + 1).await,
            None => ActionOutcome::Unchanged,
        }
    }

    /// Cart-screen "-" on a line
    pub async fn decrement_line(&self, line_id: &str) -> ActionOutcome {
        let _guard = self.action_gate.lock().await;
        let existing = self.state.borrow().cart.find_line(line_id).cloned();
        match existing {
            Some(line) => self.step_down_locked(&line).await,
            None => ActionOutcome::Unchanged,
        }
    }

    async fn step_down_locked(&self, line: &CartLineItem) -> ActionOutcome {
        if line.quantity > 1 {
            self.update_locked(&line.id, i64::from(line.quantity) - 1).await
        } else {
            self.remove_locked(&line.id).await
        }
    }

    async fn add_locked(&self, params: &AddToCartParams) -> ActionOutcome {
        let outcome = match self.use_cases.add_to_cart(params).await {
            Ok(outcome) => outcome,
            Err(e) => return self.report_failure("adding to cart", e),
        };

        let cart = match outcome {
            AddToCartOutcome::Added(cart) => {
                self.commit(cart);
                return ActionOutcome::Applied;
            }
            AddToCartOutcome::Rejected {
                reason: RejectReason::InvalidPrice,
                ..
            } => {
                warn!(menu_id = %params.menu_id, "refusing item with invalid price");
                self.notices
                    .show(Notice::error(format!("\"{}\" can't be added to the cart", params.name)));
                return ActionOutcome::Failed;
            }
            AddToCartOutcome::Rejected {
                reason: RejectReason::DifferentRestaurant,
                cart,
            } => cart,
        };

        let request = ConfirmationRequest::ReplaceRestaurant {
            current_restaurant: cart.restaurant_name().map(str::to_string),
            requested_restaurant: params.restaurant_name.clone(),
        };
        if !self.confirmation.confirm(&request).await {
            return ActionOutcome::Cancelled;
        }

        if self.clear_locked().await == ActionOutcome::Failed {
            return ActionOutcome::Failed;
        }
        match self.use_cases.add_to_cart(params).await {
            Ok(AddToCartOutcome::Added(cart)) => {
                self.commit(cart);
                ActionOutcome::Applied
            }
            Ok(AddToCartOutcome::Rejected { reason, .. }) => {
                warn!(%reason, "add rejected again after clearing the cart");
                self.notices.show(Notice::error(GENERIC_ERROR_NOTICE));
                ActionOutcome::Failed
            }
            Err(e) => self.report_failure("adding to cart", e),
        }
    }

    async fn update_locked(&self, line_id: &str, quantity: i64) -> ActionOutcome {
        match self.use_cases.update_quantity(line_id, quantity).await {
            Ok(cart) => {
                self.commit(cart);
                ActionOutcome::Applied
            }
            Err(e) => self.report_failure("updating quantity", e),
        }
    }

    async fn remove_locked(&self, line_id: &str) -> ActionOutcome {
        match self.use_cases.remove_item(line_id).await {
            Ok(cart) => {
                self.commit(cart);
                ActionOutcome::Applied
            }
            Err(e) => self.report_failure("removing from cart", e),
        }
    }

    // Clear without a prompt; used directly by the replace-restaurant flow.
    async fn clear_locked(&self) -> ActionOutcome {
        match self.use_cases.clear_cart().await {
            Ok(cart) => {
                self.commit(cart);
                ActionOutcome::Applied
            }
            Err(e) => self.report_failure("clearing cart", e),
        }
    }

    fn commit(&self, cart: Cart) {
        self.state.send_modify(|state| state.cart = cart);
    }

    fn report_failure(&self, action: &str, err: CartError) -> ActionOutcome {
        error!("Error {}: {}", action, err);
        self.notices.show(Notice::error(GENERIC_ERROR_NOTICE));
        ActionOutcome::Failed
    }
}
