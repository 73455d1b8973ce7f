use chrono::{DateTime, Utc};

/// Product as stored. `id` is internal and never leaves the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub barcode: i64,
    pub brand: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product parsed from an import file, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub barcode: i64,
    pub brand: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
}
