//! Authentication middleware for Axum
//!
//! Two layers guard protected routes:
//!
//! 1. [`auth_middleware`] resolves the `x-auth-token` header to an
//!    [`AuthenticatedUser`] and stores it in the request extensions.
//! 2. [`require_permission`] is attached per route with the route's
//!    [`Operation`] as state and checks the caller's role against
//!    [`Operation::permits`].

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::{Operation, RepositoryProvider, UserRole};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::ApiError;

/// Header carrying the access token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authentication error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token, authorization denied")]
    MissingToken,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Not allowed to perform this operation")]
    NotPermitted,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::unauthorized(e.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Authentication state containing JWT config and the user store
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Identity attached to every authenticated request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub role: UserRole,
}

/// Token authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&auth_state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

async fn authenticate(
    auth_state: &AuthState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = headers
        .get(AUTH_TOKEN_HEADER)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let claims = verify_token(token, &auth_state.jwt_config).map_err(|e| {
        debug!(error = %e, "Token rejected");
        AuthError::InvalidToken
    })?;

    let role = UserRole::parse(&claims.user.role).ok_or(AuthError::InvalidToken)?;

    // The token alone is not enough: its user must still exist.
    match auth_state.repos.users().get_user_by_id(&claims.user.id).await {
        Ok(Some(_)) => Ok(AuthenticatedUser {
            id: claims.user.id,
            role,
        }),
        Ok(None) => {
            debug!(user_id = %claims.user.id, "Token for unknown user");
            Err(AuthError::InvalidToken)
        }
        Err(e) => {
            error!(error = %e, "User lookup failed during authentication");
            Err(AuthError::InvalidToken)
        }
    }
}

/// Per-route role gate. Must run inside [`auth_middleware`].
pub async fn require_permission(
    State(operation): State<Operation>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return AuthError::MissingToken.into_response();
    };

    if !operation.permits(user.role) {
        debug!(
            user_id = %user.id,
            role = user.role.as_str(),
            operation = operation.as_str(),
            "Operation not permitted"
        );
        return AuthError::NotPermitted.into_response();
    }

    next.run(request).await
}
