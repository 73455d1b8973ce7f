//! Password hashing (bcrypt)

pub use bcrypt::DEFAULT_COST;

/// Hash a password with the given bcrypt work factor (4..=31).
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a password against a stored hash. The cost is read from the hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
