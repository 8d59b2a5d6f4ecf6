/// Storage key under which the cart snapshot is persisted
pub const CART_STORAGE_KEY: &str = "@food_delivery_cart";

/// Reason codes carried by rejected add-to-cart results
pub const DIFFERENT_RESTAURANT: &str = "DIFFERENT_RESTAURANT";
pub const INVALID_PRICE: &str = "INVALID_PRICE";

/// Largest quantity a single cart line can hold
pub const MAX_LINE_QUANTITY: u32 = 999;

// Storage backend names accepted by configuration and the CLI
pub const BACKEND_FILE: &str = "file";
pub const BACKEND_SQLITE: &str = "sqlite";
pub const BACKEND_MEMORY: &str = "memory";

/// File name of the SQLite database inside the data root
pub const SQLITE_FILE_NAME: &str = "cart.db";

/// Get all supported storage backend names
pub fn get_supported_backends() -> Vec<&'static str> {
    vec![BACKEND_FILE, BACKEND_SQLITE, BACKEND_MEMORY]
}
