use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, resolving or querying translation catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog is not a well-formed TS document
    #[error("Failed to parse catalog {file} at byte {position}:\n{reason}\n\nTip: Verify the file is a Qt Linguist .ts document (open it in Linguist or run `xmllint --noout`)")]
    Parse {
        file: PathBuf,
        position: u64,
        reason: String,
    },

    /// No catalog file exists for the requested locale
    #[error("No catalog found for locale '{locale}'.\n\nTried: {tried}\n\nTip: Check the catalog prefix or pass --locale explicitly")]
    CatalogNotFound { locale: String, tried: String },

    /// No catalogs were found below a directory
    #[error("No translation catalogs found in {dir}.\n\nTip: Catalogs must use the .ts extension and start with a <TS> root element")]
    NoCatalogs { dir: PathBuf },

    /// Invalid regular expression supplied as a search pattern
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize output
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogError {
    /// Create a Parse error for a file at a byte offset
    pub fn parse(file: impl Into<PathBuf>, position: u64, reason: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Create a CatalogNotFound error from the list of paths that were tried
    pub fn catalog_not_found(locale: impl Into<String>, tried: &[PathBuf]) -> Self {
        let tried = tried
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::CatalogNotFound {
            locale: locale.into(),
            tried,
        }
    }

    /// Create a NoCatalogs error
    pub fn no_catalogs(dir: impl Into<PathBuf>) -> Self {
        Self::NoCatalogs { dir: dir.into() }
    }
}

/// Result type alias for CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;
