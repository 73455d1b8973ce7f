//! Review submission

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainResult, NewReview, RepositoryProvider, Review};

pub struct ReviewService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReviewService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Store a review. Neither the barcode nor the user id is checked against
    /// existing rows.
    pub async fn add_review(&self, review: NewReview) -> DomainResult<Review> {
        let created = self.repos.reviews().create(review).await?;
        info!(
            review_id = created.id,
            barcode = created.barcode,
            user_id = %created.user_id,
            "Review added"
        );
        Ok(created)
    }
}
