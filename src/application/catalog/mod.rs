//! Product catalog: bulk CSV import and search.

pub mod csv_reader;
pub mod importer;
pub mod search;

pub use importer::{ImportError, ProductImporter, TempUpload};
pub use search::{ProductSearch, ProductWithReviews, SearchResult, REVIEWS_PER_PRODUCT};
