//! Merge `package.json` manifests, keeping the newest dependency versions.
//!
//! The merge engine lives in [`merge`] and relies on the comparator in
//! [`version`]. The remaining modules are the command-line glue around it.

pub mod cli_args;
pub mod commands;
pub mod config;
mod error;
pub mod manifest;
pub mod merge;
pub mod report;
pub mod version;

pub use error::PmergeError;
pub use manifest::{Author, Manifest};
pub use merge::{MergeOptions, MergeOutcome, Merger, merge};
pub use version::{SegmentOrder, compare_versions, compare_versions_with};
