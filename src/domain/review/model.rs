use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub user_id: String,
    pub barcode: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: String,
    pub barcode: i64,
    pub review: String,
}

/// A review joined with its author's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewWithAuthor {
    pub review: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}
