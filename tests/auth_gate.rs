mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{error_messages, get_request, json_request, TestApp};
use grocery_store::domain::UserRole;

#[tokio::test]
async fn missing_token_is_denied() {
    let app = TestApp::new().await;

    for request in [
        get_request("/users", None),
        json_request(Method::POST, "/products/search", None, json!({})),
        json_request(Method::POST, "/products/review", None, json!({})),
    ] {
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_messages(&body), vec!["No token, authorization denied"]);
    }
}

#[tokio::test]
async fn garbage_token_is_not_valid() {
    let app = TestApp::new().await;
    let (status, body) = app.send(get_request("/users", Some("not-a-jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_messages(&body), vec!["Token is not valid"]);
}

#[tokio::test]
async fn token_of_unknown_user_is_not_valid() {
    let app = TestApp::new().await;
    let token = app.token_for("no-such-user", UserRole::Admin);

    let (status, body) = app.send(get_request("/users", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_messages(&body), vec!["Token is not valid"]);
}

#[tokio::test]
async fn wrong_role_is_not_allowed() {
    let app = TestApp::new().await;
    let (_, admin) = app.login_as("Admin", UserRole::Admin).await;
    let (_, client) = app.login_as("Client", UserRole::Client).await;

    let cases = [
        json_request(Method::POST, "/products/search", Some(&admin), json!({})),
        json_request(Method::POST, "/products", Some(&client), json!({})),
    ];
    for request in cases {
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_messages(&body), vec!["Not allowed to perform this operation"]);
    }
}

#[tokio::test]
async fn role_gate_runs_before_body_validation() {
    let app = TestApp::new().await;
    let (_, admin) = app.login_as("Admin", UserRole::Admin).await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/products/review",
            Some(&admin),
            json!({"barcode": "not-digits"}),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_messages(&body), vec!["Not allowed to perform this operation"]);
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = TestApp::new().await;

    let (status, _) = app.send(get_request("/", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/users/login",
            None,
            json!({"email": "nobody@example.com", "password": "x"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_messages(&body), vec!["Invalid email or password"]);
}
