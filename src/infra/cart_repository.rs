use crate::app::ports::CartRepositoryPort;
use crate::domain::Cart;
use crate::error::Result;
use crate::infra::cart_data_source::LocalCartDataSource;
use async_trait::async_trait;

/// Cart repository delegating to the local snapshot store
pub struct CartRepository {
    data_source: LocalCartDataSource,
}

impl CartRepository {
    pub fn new(data_source: LocalCartDataSource) -> Self {
        Self { data_source }
    }
}

#[async_trait]
impl CartRepositoryPort for CartRepository {
    async fn get_cart(&self) -> Result<Cart> {
        Ok(self.data_source.load().await)
    }

    async fn save_cart(&self, cart: &Cart) -> Result<()> {
        self.data_source.save(cart).await
    }

    async fn clear_cart(&self) -> Result<()> {
        self.data_source.clear().await
    }
}
