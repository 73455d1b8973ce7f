//! User management service
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Gender, RepositoryProvider, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password, DEFAULT_COST};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

/// Already validated registration input.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub phonenumber: i64,
    pub role: UserRole,
}

/// Orchestrates the identity use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    password_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            repos,
            jwt_config,
            password_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor used for new passwords.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a signed token.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().get_user_by_email(email).await? else {
            return Err(DomainError::Validation(INVALID_CREDENTIALS.into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
            warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
            false
        });
        if !valid {
            return Err(DomainError::Validation(INVALID_CREDENTIALS.into()));
        }

        let token = create_token(&user.id, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        info!(user_id = %user.id, role = user.role.as_str(), "User logged in");
        Ok(AuthResult {
            token,
            expires_in: self.jwt_config.expiration_secs,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user. An already registered email is rejected before
    /// anything is written.
    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        if self
            .repos
            .users()
            .get_user_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(DomainError::Validation("User already exists".into()));
        }

        let password_hash = hash_password(&input.password, self.password_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                name: input.name,
                email: input.email,
                password_hash,
                gender: input.gender,
                phonenumber: input.phonenumber,
                role: input.role,
            })
            .await?;

        info!(user_id = %user.id, role = user.role.as_str(), "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list_users().await
    }

    /// Create an admin account when the user table is empty.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> DomainResult<bool> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(false);
        }

        let admin = self
            .register(RegisterUser {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                gender: Gender::M,
                phonenumber: 0,
                role: UserRole::Admin,
            })
            .await?;

        info!(user_id = %admin.id, email = %admin.email, "Seeded admin account");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
    use sea_orm_migration::MigratorTrait;

    async fn service() -> UserService {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let jwt = JwtConfig {
            secret: "identity-test".into(),
            expiration_secs: 600,
            issuer: "grocery-store".into(),
        };
        UserService::new(Arc::new(SeaOrmRepositoryProvider::new(db)), jwt).with_password_cost(4)
    }

    fn client(email: &str) -> RegisterUser {
        RegisterUser {
            name: "Jane".into(),
            email: email.into(),
            password: "secret".into(),
            gender: Gender::F,
            phonenumber: 5551234,
            role: UserRole::Client,
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_token_for_stored_identity() {
        let service = service().await;
        let user = service.register(client("jane@example.com")).await.unwrap();
        assert_ne!(user.password_hash, "secret");

        let auth = service.login("jane@example.com", "secret").await.unwrap();
        assert_eq!(auth.expires_in, 600);

        let claims = verify_token(&auth.token, service.jwt_config()).unwrap();
        assert_eq!(claims.user.id, user.id);
        assert_eq!(claims.user.role, "client");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_writing() {
        let service = service().await;
        service.register(client("dup@example.com")).await.unwrap();

        let err = service.register(client("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "User already exists"));
        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let service = service().await;
        service.register(client("who@example.com")).await.unwrap();

        let wrong = service.login("who@example.com", "nope").await.unwrap_err();
        let unknown = service.login("ghost@example.com", "secret").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn admin_is_seeded_only_into_an_empty_store() {
        let service = service().await;
        assert!(service.ensure_admin("Root", "root@example.com", "pw").await.unwrap());
        assert!(!service.ensure_admin("Root", "other@example.com", "pw").await.unwrap());

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, UserRole::Admin);
    }
}
