//! Product API handlers

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    Extension, Json,
};
use tracing::debug;

use super::dto::{
    CreateReviewRequest, ImportProductsForm, SearchParams, SearchRequest, SearchResponse,
};
use crate::application::{ImportError, ProductImporter, ProductSearch, ReviewService, TempUpload};
use crate::domain::{DomainError, NewReview};
use crate::interfaces::http::common::{ApiError, ErrorResponse, MessageResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::{PageRequest, SEARCH_PAGE_SIZE};

/// Multipart field carrying the products file
pub const PRODUCTS_FILE_FIELD: &str = "productsfile";

/// Product handler state
#[derive(Clone)]
pub struct ProductHandlerState {
    pub importer: Arc<ProductImporter>,
    pub search: Arc<ProductSearch>,
    pub reviews: Arc<ReviewService>,
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::new(e.status(), e.body_text())
}

/// Spool the first `productsfile` file part into a temp upload.
async fn receive_upload(
    importer: &ProductImporter,
    multipart: &mut Multipart,
) -> Result<Option<TempUpload>, ApiError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PRODUCTS_FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let mut upload = importer.begin_upload(file_name)?;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            upload.write_chunk(&chunk).map_err(ImportError::from)?;
        }
        return Ok(Some(upload));
    }
    Ok(None)
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("auth_token" = [])),
    request_body(content = ImportProductsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Products imported", body = MessageResponse),
        (status = 400, description = "Missing, non-csv or malformed file", body = ErrorResponse),
        (status = 401, description = "Missing/invalid token or not an admin", body = ErrorResponse),
        (status = 500, description = "Duplicate barcode or server error", body = ErrorResponse)
    )
)]
pub async fn import_products(
    State(state): State<ProductHandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ImportError::MissingFile.into());
    };

    let upload = receive_upload(&state.importer, &mut multipart)
        .await?
        .ok_or(ImportError::MissingFile)?;

    state.importer.import(upload).await?;
    Ok(Json(MessageResponse::new("Products added successfully")))
}

#[utoipa::path(
    post,
    path = "/products/review",
    tag = "Products",
    security(("auth_token" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing/invalid token or not a client", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn create_review(
    State(state): State<ProductHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let barcode = request
        .barcode
        .parse::<i64>()
        .map_err(|_| DomainError::InvalidField {
            field: "barcode",
            message: "Product barcode is out of range".to_string(),
        })?;

    state
        .reviews
        .add_review(NewReview {
            user_id: request.user_id,
            barcode,
            review: request.review,
        })
        .await?;

    Ok(Json(MessageResponse::new("Review added successfully")))
}

#[utoipa::path(
    post,
    path = "/products/search",
    tag = "Products",
    security(("auth_token" = [])),
    params(SearchParams),
    request_body = SearchRequest,
    responses(
        (status = 200, description = "One page of matching products", body = SearchResponse),
        (status = 401, description = "Missing/invalid token or not a client", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn search_products(
    State(state): State<ProductHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(params): Query<SearchParams>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let page = PageRequest::from_query(params.page.as_deref(), SEARCH_PAGE_SIZE);
    let term = request.search_text.unwrap_or_default();

    let result = state.search.search(&term, page).await?;
    debug!(caller = %caller.id, hits = result.products.len(), "Search served");
    Ok(Json(SearchResponse::from(result)))
}
