use async_trait::async_trait;

use crate::domain::orders::order::{NewOrder, Order};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Order>>;

    // Inserts the order; the store assigns id, audit timestamps and version
    async fn save(&self, order: &NewOrder) -> anyhow::Result<Order>;

    async fn ping(&self) -> anyhow::Result<()>;
}
