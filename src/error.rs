use std::path::PathBuf;

use thiserror::Error;

/// Failures at the file boundary. These abort the run; field-level problems
/// inside a record never surface here.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("ingestion: cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ingestion: {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ingestion: unexpected shape in {}: {}", .path.display(), .reason)]
    Shape { path: PathBuf, reason: String },

    #[error("output: cannot write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output: cannot serialize {}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
