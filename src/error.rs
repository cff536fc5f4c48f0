use thiserror::Error;

/// Errors raised by the index model and its stores.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Package {0} already exists")]
    PackageExists(String),

    #[error("Package {0} not found")]
    PackageNotFound(String),

    #[error("Release {package} {version} already exists")]
    ReleaseExists { package: String, version: String },

    #[error("Release {package} {version} not found")]
    ReleaseNotFound { package: String, version: String },

    #[error("Release file {filename} ({file_type}, {python_version}) already exists for {release}")]
    ReleaseFileExists {
        release: String,
        file_type: String,
        python_version: String,
        filename: String,
    },

    #[error("Release file {filename} not found for {release}")]
    ReleaseFileNotFound { release: String, filename: String },

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Runtime(#[from] anyhow::Error),
}

impl IndexError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        IndexError::Validation {
            field,
            message: message.into(),
        }
    }

    /// True for unique-constraint violations.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            IndexError::PackageExists(_)
                | IndexError::ReleaseExists { .. }
                | IndexError::ReleaseFileExists { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            IndexError::PackageNotFound(_)
                | IndexError::ReleaseNotFound { .. }
                | IndexError::ReleaseFileNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
