//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::db_err;
use crate::domain::{DomainResult, NewReview, Review, ReviewRepository, ReviewWithAuthor};
use crate::infrastructure::database::entities::{review, user};

#[derive(Debug, FromQueryResult)]
struct ReviewAuthorRow {
    review: String,
    name: String,
    created_at: DateTime<Utc>,
}

fn entity_to_domain(r: review::Model) -> Review {
    Review {
        id: r.id,
        user_id: r.user_id,
        barcode: r.barcode,
        review: r.review,
        created_at: r.created_at,
        updated_at: r.updated_at,
    }
}

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn create(&self, new_review: NewReview) -> DomainResult<Review> {
        let now = Utc::now();
        let model = review::ActiveModel {
            id: NotSet,
            user_id: Set(new_review.user_id),
            barcode: Set(new_review.barcode),
            review: Set(new_review.review),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await.map_err(db_err)?;
        Ok(entity_to_domain(created))
    }

    async fn latest_for_barcode(
        &self,
        barcode: i64,
        limit: u64,
    ) -> DomainResult<Vec<ReviewWithAuthor>> {
        // Inner join: a review whose author is gone never shows up.
        let rows = review::Entity::find()
            .select_only()
            .column(review::Column::Review)
            .column(review::Column::CreatedAt)
            .column_as(user::Column::Name, "name")
            .join(JoinType::InnerJoin, review::Relation::User.def())
            .filter(review::Column::Barcode.eq(barcode))
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .limit(limit)
            .into_model::<ReviewAuthorRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| ReviewWithAuthor {
                review: row.review,
                author_name: row.name,
                created_at: row.created_at,
            })
            .collect())
    }
}
