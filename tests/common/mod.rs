//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use grocery_store::domain::{CreateUserDto, Gender, RepositoryProvider, UserRole};
use grocery_store::infrastructure::crypto::jwt::{create_token, JwtConfig};
use grocery_store::infrastructure::database::migrator::Migrator;
use grocery_store::{
    create_api_router, init_database, ApiServices, DatabaseConfig, SeaOrmRepositoryProvider,
};

pub const TOKEN_HEADER: &str = "x-auth-token";
pub const PRODUCTS_HEADER: &str = "name,barcode,brand,description,price,available\n";
const BOUNDARY: &str = "grocery-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt: JwtConfig,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let jwt = JwtConfig {
            secret: "integration-secret".to_string(),
            expiration_secs: 3600,
            issuer: "grocery-store".to_string(),
        };
        let upload_dir = tempfile::tempdir().unwrap();

        let services = ApiServices::new(
            repos.clone(),
            jwt.clone(),
            upload_dir.path(),
            1024 * 1024,
        )
        .with_password_cost(4);

        Self {
            router: create_api_router(services),
            repos,
            jwt,
            upload_dir,
        }
    }

    /// Send a request and decode the body as JSON (or a JSON string for text).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    /// Insert a user straight into the store and return its id.
    pub async fn create_user(&self, name: &str, role: UserRole) -> String {
        self.repos
            .users()
            .create_user(CreateUserDto {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: bcrypt::hash("password", 4).unwrap(),
                gender: Gender::M,
                phonenumber: 5550100,
                role,
            })
            .await
            .unwrap()
            .id
    }

    pub fn token_for(&self, user_id: &str, role: UserRole) -> String {
        create_token(user_id, role.as_str(), &self.jwt).unwrap()
    }

    /// Create a user with the role and return a valid token for it.
    pub async fn login_as(&self, name: &str, role: UserRole) -> (String, String) {
        let id = self.create_user(name, role).await;
        let token = self.token_for(&id, role);
        (id, token)
    }

    pub async fn import(&self, token: &str, file_name: &str, csv: &str) -> (StatusCode, Value) {
        self.send(multipart_request("/products", Some(token), file_name, csv))
            .await
    }

    pub async fn search(&self, token: &str, query: &str, body: Value) -> (StatusCode, Value) {
        let uri = if query.is_empty() {
            "/products/search".to_string()
        } else {
            format!("/products/search?{query}")
        };
        self.send(json_request(Method::POST, &uri, Some(token), body))
            .await
    }

    /// Files currently spooled in the upload directory.
    pub fn upload_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn multipart_request(
    uri: &str,
    token: Option<&str>,
    file_name: &str,
    contents: &str,
) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"productsfile\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    );
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }
    builder.body(Body::from(body)).unwrap()
}

/// `msg` of every entry of an error envelope.
pub fn error_messages(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["msg"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// CSV body with the standard header and one row per (name, barcode).
pub fn products_csv(rows: &[(&str, i64)]) -> String {
    let mut csv = PRODUCTS_HEADER.to_string();
    for (name, barcode) in rows {
        csv.push_str(&format!("{name},{barcode},Acme,{name} description,1.99,true\n"));
    }
    csv
}
