use async_trait::async_trait;

use super::{NewProduct, Product};
use crate::domain::DomainResult;
use crate::shared::PageRequest;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert all products in one transaction.
    ///
    /// Either every row is written or none is. A barcode collision, with an
    /// existing row or inside the batch, yields `DomainError::Conflict`.
    async fn insert_batch(&self, products: Vec<NewProduct>) -> DomainResult<u64>;

    /// Case-insensitive substring match on the name, in insertion order.
    /// An empty term matches every product.
    async fn search_by_name(&self, term: &str, page: PageRequest) -> DomainResult<Vec<Product>>;

    /// Size of the whole product table.
    async fn count_all(&self) -> DomainResult<u64>;
}
