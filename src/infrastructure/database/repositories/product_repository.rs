//! SeaORM implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveValue::NotSet, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::{db_err, is_unique_violation};
use crate::domain::{DomainError, DomainResult, NewProduct, Product, ProductRepository};
use crate::infrastructure::database::entities::product;
use crate::shared::PageRequest;

/// Rows per INSERT statement; keeps the bound-parameter count well below
/// SQLite's limit for large files.
const INSERT_CHUNK: usize = 500;

fn entity_to_domain(p: product::Model) -> Product {
    Product {
        id: p.id,
        name: p.name,
        barcode: p.barcode,
        brand: p.brand,
        description: p.description,
        price: p.price,
        available: p.available,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

/// Case folding shared by the stored search column and the search term.
/// SQLite's `lower()` only folds ASCII, so folding happens here instead.
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escape LIKE metacharacters so the term is matched literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in fold_case(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert_batch(&self, products: Vec<NewProduct>) -> DomainResult<u64> {
        if products.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let total = products.len() as u64;
        let models: Vec<product::ActiveModel> = products
            .into_iter()
            .map(|p| product::ActiveModel {
                id: NotSet,
                search_name: Set(fold_case(&p.name)),
                name: Set(p.name),
                barcode: Set(p.barcode),
                brand: Set(p.brand),
                description: Set(p.description),
                price: Set(p.price),
                available: Set(p.available),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .collect();

        let insert_err = |e: sea_orm::DbErr| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Duplicate products not allowed".to_string())
            } else {
                db_err(e)
            }
        };

        // Dropping the transaction without commit rolls every chunk back.
        let txn = self.db.begin().await.map_err(db_err)?;
        for chunk in models.chunks(INSERT_CHUNK) {
            product::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await
                .map_err(insert_err)?;
        }
        txn.commit().await.map_err(db_err)?;

        debug!(rows = total, "Product batch committed");
        Ok(total)
    }

    async fn search_by_name(&self, term: &str, page: PageRequest) -> DomainResult<Vec<Product>> {
        let mut query = product::Entity::find();

        if !term.is_empty() {
            query = query.filter(
                Expr::col(product::Column::SearchName)
                    .like(LikeExpr::new(like_pattern(term)).escape('\\')),
            );
        }

        let models = query
            .order_by_asc(product::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn count_all(&self) -> DomainResult<u64> {
        product::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
