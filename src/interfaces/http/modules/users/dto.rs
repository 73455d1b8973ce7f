//! User DTOs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{Gender, User, UserRole};
use crate::interfaces::http::common::{is_digits, string_or_number};

/// User API representation. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    /// `M` or `F`
    pub gender: String,
    pub phonenumber: i64,
    /// `admin` or `client`
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            gender: u.gender.as_str().to_string(),
            phonenumber: u.phonenumber,
            role: u.role.as_str().to_string(),
            created_at: u.created_at,
        }
    }
}

/// Register request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// `M` or `F`
    #[serde(default)]
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,

    /// Digits only; a JSON number is accepted too
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(custom(function = "validate_phonenumber"))]
    #[schema(example = "971501234567")]
    pub phonenumber: String,

    /// `admin` or `client`
    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    match Gender::parse(value) {
        Some(_) => Ok(()),
        None => Err(invalid("gender", "Gender can only be: M or F")),
    }
}

fn validate_phonenumber(value: &str) -> Result<(), ValidationError> {
    if is_digits(value) {
        Ok(())
    } else {
        Err(invalid("phonenumber", "Phone number cannot have characters"))
    }
}

fn validate_role(value: &str) -> Result<(), ValidationError> {
    match UserRole::parse(value) {
        Some(_) => Ok(()),
        None => Err(invalid("role", "Role can only be: admin or client")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(json: serde_json::Value) -> RegisterRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn well_formed_registration_passes() {
        let req = register(serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": "pw",
            "gender": "F",
            "phonenumber": 971501234567i64,
            "role": "client"
        }));
        assert!(req.validate().is_ok());
        assert_eq!(req.phonenumber, "971501234567");
    }

    #[test]
    fn every_bad_field_is_reported() {
        let req = register(serde_json::json!({
            "email": "not-an-email",
            "gender": "X",
            "phonenumber": "12ab",
            "role": "operator"
        }));
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "email", "password", "gender", "phonenumber", "role"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn user_projection_uses_camel_case_and_hides_the_hash() {
        let now = Utc::now();
        let dto = UserDto::from(User {
            id: "u1".into(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$2b$12$hash".into(),
            gender: Gender::F,
            phonenumber: 42,
            role: UserRole::Client,
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "client");
    }
}
