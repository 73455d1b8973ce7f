use super::{Gender, UserRole};

/// Fields of a user about to be persisted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Gender,
    pub phonenumber: i64,
    pub role: UserRole,
}
