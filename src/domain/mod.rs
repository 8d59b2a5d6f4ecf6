// Core business types and rules. Kept pure and free of I/O concerns.

pub mod cart;
pub mod menu;

pub use cart::{Cart, CartLineItem, RestaurantInfo};
pub use menu::MenuItem;
