use async_trait::async_trait;

use super::{NewReview, Review, ReviewWithAuthor};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: NewReview) -> DomainResult<Review>;

    /// Newest reviews for a barcode, at most `limit`, each with its author's
    /// name. Reviews whose author no longer exists are skipped.
    async fn latest_for_barcode(
        &self,
        barcode: i64,
        limit: u64,
    ) -> DomainResult<Vec<ReviewWithAuthor>>;
}
