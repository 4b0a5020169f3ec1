//! Error type shared by the manifest I/O and command-line layers.
//!
//! The merge engine itself never fails: anomalies such as missing maps or
//! malformed versions resolve to keeping existing values.

use std::path::PathBuf;

use ortho_config::OrthoError;
use thiserror::Error;

/// Errors returned by library functions.
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions, reason = "re-exported at the crate root")]
pub enum PmergeError {
    #[error("no directory to scan for {manifest_name} files specified (use --path)")]
    MissingPath { manifest_name: String },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {} at `{location}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialise merged manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot compare versions '{left}' and '{right}'")]
    IncomparableVersions { left: String, right: String },
    #[error("configuration error: {0}")]
    Config(Box<OrthoError>),
}

impl From<OrthoError> for PmergeError {
    fn from(err: OrthoError) -> Self {
        Self::Config(Box::new(err))
    }
}
