use crate::domain::Cart;
use crate::error::Result;
use async_trait::async_trait;

/// Durable string key-value store holding serialized snapshots
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Load/save/clear contract the cart use-cases depend on
#[async_trait]
pub trait CartRepositoryPort: Send + Sync {
    async fn get_cart(&self) -> Result<Cart>;
    async fn save_cart(&self, cart: &Cart) -> Result<()>;
    async fn clear_cart(&self) -> Result<()>;
}

// Presentation-side ports, used only by the cart provider

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationRequest {
    /// The cart holds another restaurant's items; offer to clear it and retry the add.
    ReplaceRestaurant {
        current_restaurant: Option<String>,
        requested_restaurant: String,
    },
    /// Destructive clear of the whole cart
    ClearCart,
}

impl ConfirmationRequest {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmationRequest::ReplaceRestaurant { .. } => "Different restaurant",
            ConfirmationRequest::ClearCart => "Clear cart",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfirmationRequest::ReplaceRestaurant {
                current_restaurant,
                requested_restaurant,
            } => format!(
                "Your cart already has items from \"{}\".\n\
                 Clear the cart and order from \"{}\" instead?",
                current_restaurant.as_deref().unwrap_or("another restaurant"),
                requested_restaurant
            ),
            ConfirmationRequest::ClearCart => "Remove every item from your cart?".to_string(),
        }
    }
}

#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Returns true when the user accepts the destructive option.
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Transient informational notices (toasts)
pub trait NoticePort: Send + Sync {
    fn show(&self, notice: Notice);
}
