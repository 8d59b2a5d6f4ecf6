pub mod cart_data_source;
pub mod cart_repository;
pub mod kv_file_adapter;
pub mod kv_memory_adapter;
pub mod kv_sqlite_adapter;
pub mod notice_adapter;
pub mod prompt_adapter;
pub mod store_factory;

pub use cart_data_source::LocalCartDataSource;
pub use cart_repository::CartRepository;
pub use store_factory::{build_cart_provider, build_key_value_store};
