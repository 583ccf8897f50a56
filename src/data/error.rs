use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong turning a resource into a [`Table`](super::model::Table).
///
/// All variants are fatal to the current render pass: the dashboard shows the
/// message instead of partial aggregates.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error("sheet '{sheet}' not found in {}", resource.display())]
    SheetNotFound { resource: PathBuf, sheet: String },

    #[error("sheet '{sheet}' does not match the expected layout: {reason}")]
    SchemaMismatch { sheet: String, reason: String },

    #[error("unsupported resource format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {}: {message}", resource.display())]
    Read { resource: PathBuf, message: String },
}

impl DataError {
    pub(crate) fn read(resource: &std::path::Path, err: anyhow::Error) -> Self {
        DataError::Read {
            resource: resource.to_path_buf(),
            message: format!("{err:#}"),
        }
    }
}
