//! Product DTOs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::application::{ProductWithReviews, SearchResult};
use crate::domain::ReviewWithAuthor;
use crate::interfaces::http::common::{is_digits, string_or_number};

/// Multipart form of the import endpoint
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ImportProductsForm {
    /// CSV with the columns name, barcode, brand, description, price, available
    #[schema(value_type = String, format = Binary)]
    pub productsfile: Vec<u8>,
}

/// Search request body
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SearchRequest {
    /// Case-insensitive name fragment; absent or empty matches every product
    #[serde(default, rename = "searchText")]
    pub search_text: Option<String>,
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// 1-based page number; anything else means the first page
    pub page: Option<String>,
}

/// Review as shown inside a search hit
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    pub review: String,
    /// Author's display name
    pub name: String,
}

impl From<ReviewWithAuthor> for ReviewDto {
    fn from(r: ReviewWithAuthor) -> Self {
        Self {
            review: r.review,
            name: r.author_name,
        }
    }
}

/// Product as shown in search results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub name: String,
    pub brand: String,
    pub barcode: i64,
    pub price: f64,
    pub description: String,
    pub available: bool,
    /// Newest first, at most two
    pub reviews: Vec<ReviewDto>,
}

impl From<ProductWithReviews> for ProductDto {
    fn from(hit: ProductWithReviews) -> Self {
        let p = hit.product;
        Self {
            name: p.name,
            brand: p.brand,
            barcode: p.barcode,
            price: p.price,
            description: p.description,
            available: p.available,
            reviews: hit.reviews.into_iter().map(ReviewDto::from).collect(),
        }
    }
}

/// Search response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Number of products in the whole store
    pub total_count: u64,
    pub products: Vec<ProductDto>,
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            total_count: result.total_count,
            products: result.products.into_iter().map(ProductDto::from).collect(),
        }
    }
}

/// Review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[serde(default, rename = "userId")]
    #[validate(length(min = 1, message = "user id is required"))]
    pub user_id: String,

    /// Product barcode; a JSON number or a digit string
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(custom(function = "validate_barcode"))]
    pub barcode: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Review is required"))]
    pub review: String,
}

fn validate_barcode(value: &str) -> Result<(), ValidationError> {
    let message = if value.is_empty() {
        "Product barcode id is required"
    } else if !is_digits(value) {
        "Product barcode must be a number"
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new("barcode");
    err.message = Some(Cow::Borrowed(message));
    Err(err)
}
