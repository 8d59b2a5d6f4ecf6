pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;

// Domain data shapes shared across layers
pub mod domain;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub use app::{ActionOutcome, CartProvider, CartState, CartUseCases, LoadStatus};
pub use domain::{Cart, CartLineItem, MenuItem, RestaurantInfo};
pub use error::{CartError, Result};
