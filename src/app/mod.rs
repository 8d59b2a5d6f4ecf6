pub mod ports;
pub mod cart_use_case;
pub mod cart_provider;

pub use cart_provider::{ActionOutcome, CartProvider, CartState, LoadStatus};
pub use cart_use_case::{AddToCartOutcome, AddToCartParams, CartUseCases, RejectReason};
