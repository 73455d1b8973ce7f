//! Bulk product import.
//!
//! An upload lands in a [`TempUpload`] under the configured upload directory.
//! The importer owns the upload for the whole run, so the file is removed
//! when `import` returns, whatever the outcome.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use super::csv_reader::parse_products;
use crate::domain::{DomainError, RepositoryProvider};

/// Import failures, from upload handling to the final batch insert.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Products file is required")]
    MissingFile,

    #[error("Products file should of type csv")]
    InvalidFileType,

    #[error("Row {row}, column '{column}': {message}")]
    Parse {
        row: u64,
        column: String,
        message: String,
    },

    #[error("Products file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("upload I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Duplicate products not allowed")]
    DuplicateProducts,

    #[error("store error: {0}")]
    Store(DomainError),
}

/// An uploaded file held in a scoped temp file.
///
/// Dropping the value deletes the file.
pub struct TempUpload {
    file: NamedTempFile,
    original_name: String,
}

impl TempUpload {
    /// Create an empty temp file inside `dir`, creating the directory if needed.
    pub fn create_in(dir: &Path, original_name: impl Into<String>) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let file = NamedTempFile::new_in(dir)?;
        Ok(Self {
            file,
            original_name: original_name.into(),
        })
    }

    pub fn write_chunk(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.as_file_mut().write_all(bytes)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name as sent by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Case-insensitive `.csv` check on the client-side file name.
    pub fn has_csv_extension(&self) -> bool {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

pub struct ProductImporter {
    repos: Arc<dyn RepositoryProvider>,
    upload_dir: PathBuf,
}

impl ProductImporter {
    pub fn new(repos: Arc<dyn RepositoryProvider>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            repos,
            upload_dir: upload_dir.into(),
        }
    }

    /// Directory new uploads are spooled into.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Start a new upload for a client file name.
    pub fn begin_upload(&self, original_name: impl Into<String>) -> Result<TempUpload, ImportError> {
        Ok(TempUpload::create_in(&self.upload_dir, original_name)?)
    }

    /// Validate, parse and insert an uploaded products file as one batch.
    ///
    /// Returns the number of inserted products.
    pub async fn import(&self, upload: TempUpload) -> Result<u64, ImportError> {
        if !upload.has_csv_extension() {
            debug!(file = upload.original_name(), "Rejected non-csv upload");
            return Err(ImportError::InvalidFileType);
        }

        let path = upload.path().to_path_buf();
        let products = tokio::task::spawn_blocking(move || -> Result<_, ImportError> {
            parse_products(File::open(path)?)
        })
        .await
        .map_err(|e| ImportError::Io(io::Error::other(e)))??;

        let inserted = match self.repos.products().insert_batch(products).await {
            Ok(n) => n,
            Err(DomainError::Conflict(_)) => return Err(ImportError::DuplicateProducts),
            Err(e) => return Err(ImportError::Store(e)),
        };

        info!(file = upload.original_name(), inserted, "Products imported");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
    use sea_orm_migration::MigratorTrait;

    const HEADER: &str = "name,barcode,brand,description,price,available\n";

    async fn importer(dir: &Path) -> (ProductImporter, Arc<dyn RepositoryProvider>) {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        (ProductImporter::new(repos.clone(), dir), repos)
    }

    fn upload(importer: &ProductImporter, name: &str, body: &str) -> (TempUpload, PathBuf) {
        let mut upload = importer.begin_upload(name).unwrap();
        upload.write_chunk(body.as_bytes()).unwrap();
        let path = upload.path().to_path_buf();
        (upload, path)
    }

    #[test]
    fn extension_check_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        for (name, ok) in [
            ("products.csv", true),
            ("PRODUCTS.CSV", true),
            ("products.txt", false),
            ("csv", false),
            ("", false),
        ] {
            let upload = TempUpload::create_in(dir.path(), name).unwrap();
            assert_eq!(upload.has_csv_extension(), ok, "{name}");
        }
    }

    #[tokio::test]
    async fn successful_import_removes_the_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (importer, repos) = importer(dir.path()).await;
        let body = format!("{HEADER}Milk,1001,Acme,Whole milk,2.5,true\nTea,1002,Leaf,Green,4,false\n");
        let (upload, path) = upload(&importer, "products.csv", &body);

        assert_eq!(importer.import(upload).await.unwrap(), 2);
        assert!(!path.exists());
        assert_eq!(repos.products().count_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn wrong_extension_is_rejected_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let (importer, repos) = importer(dir.path()).await;
        let body = format!("{HEADER}Milk,1001,Acme,Whole milk,2.5,true\n");
        let (upload, path) = upload(&importer, "products.xlsx", &body);

        let err = importer.import(upload).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidFileType));
        assert!(!path.exists());
        assert_eq!(repos.products().count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_within_file_rejects_the_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let (importer, repos) = importer(dir.path()).await;
        let body = format!(
            "{HEADER}Milk,1001,Acme,Whole milk,2.5,true\nMilk 2,1001,Acme,Skim,2.0,true\n"
        );
        let (upload, path) = upload(&importer, "products.csv", &body);

        let err = importer.import(upload).await.unwrap_err();
        assert!(matches!(err, ImportError::DuplicateProducts));
        assert!(!path.exists());
        assert_eq!(repos.products().count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn parse_failure_removes_the_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (importer, _) = importer(dir.path()).await;
        let body = format!("{HEADER}Milk,1001,Acme,Whole milk,cheap,true\n");
        let (upload, path) = upload(&importer, "products.csv", &body);

        let err = importer.import(upload).await.unwrap_err();
        assert!(matches!(err, ImportError::Parse { row: 2, .. }));
        assert!(!path.exists());
    }
}
