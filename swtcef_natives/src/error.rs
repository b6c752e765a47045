use std::{io, path::PathBuf};

use crate::manifest::ManifestError;

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("Could not load {path}")]
    MissingManifest { path: String },

    #[error("Invalid native manifest {path}")]
    InvalidManifest {
        path: String,
        #[source]
        source: ManifestError,
    },

    #[error("Could not load /{path}")]
    MissingBundledFile { path: String },

    #[error("Failed to read bundled resource /{path}")]
    ReadResource {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move extracted natives to {}", path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not determine the user's home directory")]
    NoHomeDirectory,
}
