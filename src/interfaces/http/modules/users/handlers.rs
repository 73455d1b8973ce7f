//! User API handlers
//!
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::debug;

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserDto};
use crate::application::identity::{RegisterUser, UserService};
use crate::domain::{DomainError, Gender, UserRole};
use crate::interfaces::http::common::{ApiError, ErrorResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

fn invalid_field(field: &'static str, message: &str) -> DomainError {
    DomainError::InvalidField {
        field,
        message: message.to_string(),
    }
}

impl TryFrom<RegisterRequest> for RegisterUser {
    type Error = DomainError;

    fn try_from(req: RegisterRequest) -> Result<Self, Self::Error> {
        let gender = Gender::parse(&req.gender)
            .ok_or_else(|| invalid_field("gender", "Gender can only be: M or F"))?;
        let role = UserRole::parse(&req.role)
            .ok_or_else(|| invalid_field("role", "Role can only be: admin or client"))?;
        let phonenumber = req
            .phonenumber
            .parse::<i64>()
            .map_err(|_| invalid_field("phonenumber", "Phone number is too long"))?;

        Ok(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
            gender,
            phonenumber,
            role,
        })
    }
}

#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = UserDto),
        (status = 400, description = "Validation error or user already exists", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let input = RegisterUser::try_from(request)?;
    let user = state.user_service.register(input).await?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token", body = LoginResponse),
        (status = 400, description = "Validation error or invalid credentials", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let auth = state
        .user_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: auth.token,
        expires_in: auth.expires_in,
    }))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
        (status = 401, description = "Missing/invalid token or not an admin", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.user_service.list_users().await?;
    debug!(caller = %caller.id, count = users.len(), "Listed users");
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}
