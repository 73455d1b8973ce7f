//! Product search with the latest reviews of every hit.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{DomainResult, Product, RepositoryProvider, ReviewWithAuthor};
use crate::shared::PageRequest;

/// Reviews attached to each product in a search result.
pub const REVIEWS_PER_PRODUCT: u64 = 2;

#[derive(Debug, Clone)]
pub struct ProductWithReviews {
    pub product: Product,
    /// Newest first, at most [`REVIEWS_PER_PRODUCT`].
    pub reviews: Vec<ReviewWithAuthor>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Size of the whole product table, not of the match set.
    pub total_count: u64,
    pub products: Vec<ProductWithReviews>,
}

pub struct ProductSearch {
    repos: Arc<dyn RepositoryProvider>,
}

impl ProductSearch {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn search(&self, term: &str, page: PageRequest) -> DomainResult<SearchResult> {
        let products = self.repos.products().search_by_name(term, page).await?;

        let mut hits = Vec::with_capacity(products.len());
        for product in products {
            let reviews = self
                .repos
                .reviews()
                .latest_for_barcode(product.barcode, REVIEWS_PER_PRODUCT)
                .await?;
            hits.push(ProductWithReviews { product, reviews });
        }

        let total_count = self.repos.products().count_all().await?;

        debug!(term, page = page.page, hits = hits.len(), total_count, "Product search");
        Ok(SearchResult {
            total_count,
            products: hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateUserDto, Gender, NewProduct, NewReview, UserRole};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
    use crate::shared::SEARCH_PAGE_SIZE;
    use sea_orm_migration::MigratorTrait;

    async fn repos() -> Arc<dyn RepositoryProvider> {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(SeaOrmRepositoryProvider::new(db))
    }

    fn product(name: &str, barcode: i64) -> NewProduct {
        NewProduct {
            name: name.into(),
            barcode,
            brand: "Acme".into(),
            description: "desc".into(),
            price: 1.0,
            available: true,
        }
    }

    async fn author(repos: &Arc<dyn RepositoryProvider>, name: &str) -> String {
        repos
            .users()
            .create_user(CreateUserDto {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "x".into(),
                gender: Gender::M,
                phonenumber: 1,
                role: UserRole::Client,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn page_two_skips_exactly_one_page_in_insertion_order() {
        let repos = repos().await;
        let batch = (0..25).map(|i| product(&format!("Item {i:02}"), 100 + i)).collect();
        repos.products().insert_batch(batch).await.unwrap();

        let search = ProductSearch::new(repos);
        let first = search.search("", PageRequest::new(None, SEARCH_PAGE_SIZE)).await.unwrap();
        let second = search.search("", PageRequest::new(Some(2), SEARCH_PAGE_SIZE)).await.unwrap();

        assert_eq!(first.products.len(), 10);
        assert_eq!(first.products[0].product.barcode, 100);
        assert_eq!(second.products[0].product.barcode, 110);
        assert_eq!(second.total_count, 25);
    }

    #[tokio::test]
    async fn match_is_case_insensitive_and_count_covers_the_whole_table() {
        let repos = repos().await;
        repos
            .products()
            .insert_batch(vec![
                product("Whole Milk", 1),
                product("Oat milk", 2),
                product("Bread", 3),
            ])
            .await
            .unwrap();

        let search = ProductSearch::new(repos);
        let result = search.search("MILK", PageRequest::new(None, 10)).await.unwrap();
        assert_eq!(result.products.len(), 2);
        assert_eq!(result.total_count, 3);

        let none = search.search("caviar", PageRequest::new(None, 10)).await.unwrap();
        assert!(none.products.is_empty());
        assert_eq!(none.total_count, 3);
    }

    #[tokio::test]
    async fn wildcards_in_the_term_match_literally() {
        let repos = repos().await;
        repos
            .products()
            .insert_batch(vec![product("100% Juice", 1), product("1000 Juice", 2)])
            .await
            .unwrap();

        let search = ProductSearch::new(repos);
        let result = search.search("100%", PageRequest::new(None, 10)).await.unwrap();
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].product.barcode, 1);
    }

    #[tokio::test]
    async fn keeps_the_two_newest_reviews_with_known_authors() {
        let repos = repos().await;
        repos.products().insert_batch(vec![product("Milk", 7)]).await.unwrap();
        let ann = author(&repos, "Ann").await;

        for text in ["first", "second", "third"] {
            repos
                .reviews()
                .create(NewReview {
                    user_id: ann.clone(),
                    barcode: 7,
                    review: text.into(),
                })
                .await
                .unwrap();
        }
        repos
            .reviews()
            .create(NewReview {
                user_id: "no-such-user".into(),
                barcode: 7,
                review: "orphan".into(),
            })
            .await
            .unwrap();

        let search = ProductSearch::new(repos);
        let result = search.search("milk", PageRequest::new(None, 10)).await.unwrap();
        let reviews = &result.products[0].reviews;

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].review, "third");
        assert_eq!(reviews[1].review, "second");
        assert!(reviews.iter().all(|r| r.author_name == "Ann"));
    }
}
