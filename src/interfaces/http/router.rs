//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ProductImporter, ProductSearch, ReviewService, UserService};
use crate::domain::{Operation, RepositoryProvider};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ErrorMessage, ErrorResponse, MessageResponse};
use crate::interfaces::http::middleware::{
    auth_middleware, require_permission, AuthState, AUTH_TOKEN_HEADER,
};
use crate::interfaces::http::modules::request_id::{request_id_middleware, request_span};

use super::modules::{health, products, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    AUTH_TOKEN_HEADER,
                    "Token returned by /users/login",
                ))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::welcome,
        health::health_check,
        // Users
        users::register,
        users::login,
        users::list_users,
        // Products
        products::import_products,
        products::create_review,
        products::search_products,
    ),
    components(
        schemas(
            // Common
            ErrorMessage,
            ErrorResponse,
            MessageResponse,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Users
            users::UserDto,
            users::RegisterRequest,
            users::LoginRequest,
            users::LoginResponse,
            // Products
            products::ImportProductsForm,
            products::SearchRequest,
            products::SearchResponse,
            products::ProductDto,
            products::ReviewDto,
            products::CreateReviewRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Greeting and health check"),
        (name = "Users", description = "Registration, login (token issuance) and user listing"),
        (name = "Products", description = "CSV product import, product search and reviews"),
    ),
    info(
        title = "Grocery Store API",
        version = "1.0.0",
        description = "Users, bulk product import, product search with reviews",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Services and settings the router is built from.
#[derive(Clone)]
pub struct ApiServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub user_service: Arc<UserService>,
    pub importer: Arc<ProductImporter>,
    pub search: Arc<ProductSearch>,
    pub reviews: Arc<ReviewService>,
    /// Request body cap of the import endpoint
    pub max_upload_bytes: usize,
}

impl ApiServices {
    /// Wire every service on top of one repository provider.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        upload_dir: impl Into<std::path::PathBuf>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(repos.clone(), jwt_config.clone())),
            importer: Arc::new(ProductImporter::new(repos.clone(), upload_dir)),
            search: Arc::new(ProductSearch::new(repos.clone())),
            reviews: Arc::new(ReviewService::new(repos.clone())),
            repos,
            jwt_config,
            max_upload_bytes,
        }
    }

    /// Rebuild the user service with a different bcrypt work factor.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.user_service = Arc::new(
            UserService::new(self.repos.clone(), self.jwt_config.clone()).with_password_cost(cost),
        );
        self
    }
}

/// Create the API router with all routes
pub fn create_api_router(services: ApiServices) -> Router {
    let auth_state = AuthState {
        jwt_config: services.jwt_config.clone(),
        repos: services.repos.clone(),
    };

    let user_state = users::UserHandlerState {
        user_service: services.user_service.clone(),
    };

    let product_state = products::ProductHandlerState {
        importer: services.importer.clone(),
        search: services.search.clone(),
        reviews: services.reviews.clone(),
    };

    let health_state = health::HealthState {
        repos: services.repos.clone(),
        started_at: Arc::new(Instant::now()),
    };

    // User routes (public)
    let user_public_routes = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .with_state(user_state.clone());

    // User routes (protected)
    let user_protected_routes = Router::new()
        .route(
            "/users",
            get(users::list_users).route_layer(middleware::from_fn_with_state(
                Operation::ListUsers,
                require_permission,
            )),
        )
        // Identity runs before the per-route role gate.
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state);

    // Product routes (protected)
    let product_routes = Router::new()
        .route(
            "/products",
            post(products::import_products)
                .route_layer(middleware::from_fn_with_state(
                    Operation::ImportProducts,
                    require_permission,
                ))
                .layer(DefaultBodyLimit::max(services.max_upload_bytes)),
        )
        .route(
            "/products/review",
            post(products::create_review).route_layer(middleware::from_fn_with_state(
                Operation::CreateReview,
                require_permission,
            )),
        )
        .route(
            "/products/search",
            post(products::search_products).route_layer(middleware::from_fn_with_state(
                Operation::SearchProducts,
                require_permission,
            )),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(product_state);

    let health_routes = Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .with_state(health_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Greeting + health
        .merge(health_routes)
        // Users
        .merge(user_public_routes)
        .merge(user_protected_routes)
        // Products
        .merge(product_routes)
        // Middleware; the request id is assigned before the trace span opens
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
}
