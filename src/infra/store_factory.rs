use crate::app::ports::{ConfirmationPort, KeyValueStorePort, NoticePort};
use crate::app::{CartProvider, CartUseCases};
use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use crate::infra::cart_data_source::LocalCartDataSource;
use crate::infra::cart_repository::CartRepository;
use crate::infra::kv_file_adapter::FileKeyValueStore;
use crate::infra::kv_memory_adapter::InMemoryKeyValueStore;
use crate::infra::kv_sqlite_adapter::SqliteKeyValueStore;
use std::sync::Arc;
use tracing::info;

/// Builds the key-value store selected by configuration
pub fn build_key_value_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorePort>> {
    info!(
        backend = %config.backend,
        data_root = %config.data_root.display(),
        "opening cart storage"
    );
    let store: Arc<dyn KeyValueStorePort> = match config.backend {
        StorageBackend::File => Arc::new(FileKeyValueStore::new(&config.data_root)),
        StorageBackend::Sqlite => Arc::new(SqliteKeyValueStore::open_at_root(&config.data_root)?),
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
    };
    Ok(store)
}

/// Wires store -> data source -> repository -> use-cases -> provider.
/// The provider is returned unactivated.
pub fn build_cart_provider(
    config: &StorageConfig,
    confirmation: Arc<dyn ConfirmationPort>,
    notices: Arc<dyn NoticePort>,
) -> Result<CartProvider> {
    let store = build_key_value_store(config)?;
    let data_source = LocalCartDataSource::new(store, config.cart_key.clone());
    let repository = Arc::new(CartRepository::new(data_source));
    let use_cases = Arc::new(CartUseCases::new(repository));
    Ok(CartProvider::new(use_cases, confirmation, notices))
}
