//! Cart snapshot persistence over a key-value store.
//!
//! The snapshot is a JSON object with `items`, `restaurantId`, `restaurantName`
//! and `deliveryFee`. Reads are lenient: an absent, unreadable or malformed
//! snapshot becomes an empty cart. Writes propagate their errors.

use crate::app::ports::KeyValueStorePort;
use crate::domain::{Cart, CartLineItem};
use crate::error::Result;
use crate::metrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartSnapshot {
    #[serde(default)]
    items: Option<Vec<CartLineItem>>,
    #[serde(default)]
    restaurant_id: Option<String>,
    #[serde(default)]
    restaurant_name: Option<String>,
    #[serde(default)]
    delivery_fee: Option<f64>,
}

impl CartSnapshot {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            items: Some(cart.cart_items()),
            restaurant_id: cart.restaurant_id().map(str::to_string),
            restaurant_name: cart.restaurant_name().map(str::to_string),
            delivery_fee: Some(cart.delivery_fee()),
        }
    }

    /// `None` when the stored lines break the single-restaurant rule
    fn into_cart(self) -> Option<Cart> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let delivery_fee = self
            .delivery_fee
            .filter(|fee| fee.is_finite() && *fee >= 0.0)
            .unwrap_or(0.0);
        let mut cart = Cart::from_parts(
            self.items.unwrap_or_default(),
            non_empty(self.restaurant_id),
            non_empty(self.restaurant_name),
            delivery_fee,
        );
        let dropped = cart.normalize()?;
        if dropped > 0 {
            warn!("Dropped {} stored cart lines with zero quantity", dropped);
        }
        Some(cart)
    }
}

pub struct LocalCartDataSource {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
}

impl LocalCartDataSource {
    pub fn new(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Never fails; anything unusable in storage reads as an empty cart.
    pub async fn load(&self) -> Cart {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored cart under {}", self.key);
                metrics::snapshot::load_fallback("absent");
                return Cart::new();
            }
            Err(e) => {
                warn!("Error loading cart from storage: {}", e);
                metrics::snapshot::load_fallback("unreadable");
                return Cart::new();
            }
        };

        match serde_json::from_str::<CartSnapshot>(&raw) {
            Ok(snapshot) => match snapshot.into_cart() {
                Some(cart) => cart,
                None => {
                    warn!("Stored cart mixes restaurants, starting empty");
                    metrics::snapshot::load_fallback("corrupt");
                    Cart::new()
                }
            },
            Err(e) => {
                warn!("Stored cart is corrupt, starting empty: {}", e);
                metrics::snapshot::load_fallback("corrupt");
                Cart::new()
            }
        }
    }

    pub async fn save(&self, cart: &Cart) -> Result<()> {
        let json = serde_json::to_string(&CartSnapshot::from_cart(cart))?;
        if let Err(e) = self.store.set(&self.key, &json).await {
            error!("Error saving cart to storage: {}", e);
            metrics::snapshot::write_error();
            return Err(e);
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        if let Err(e) = self.store.remove(&self.key).await {
            error!("Error clearing cart from storage: {}", e);
            metrics::snapshot::write_error();
            return Err(e);
        }
        Ok(())
    }
}
