//! Command-line argument structures.
//!
//! Isolates clap derivations so lint expectations remain scoped, keeping
//! `main.rs` focused on runtime logic.
// Imports are referenced by derives; no suppression required.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::merge::MergeOptions;
use crate::version::SegmentOrder;

/// File name, and discovery suffix, of a package manifest.
pub const DEFAULT_MANIFEST_NAME: &str = "package.json";

/// Log filter applied when neither `RUST_LOG` nor `--log-level` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "pmerge",
    version,
    about = "Merge package.json files, keeping the newest dependency versions"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge manifests found in a directory into the main manifest
    Merge(MergeArgs),
    /// Compare two version strings the way `merge` does
    Compare(CompareArgs),
}

/// Global options that apply to every sub-command.
#[derive(Parser, Deserialize, Serialize, Default, Debug, OrthoConfig, Clone)]
#[ortho_config(prefix = "PMERGE")]
pub struct GlobalArgs {
    /// File-name suffix identifying manifests when scanning a directory
    #[arg(long, value_name = "NAME")]
    pub manifest_name: Option<String>,
    /// Log filter used when `RUST_LOG` is unset, e.g. `debug`
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    /// Merge another instance into `self`, overwriting only fields that are
    /// currently `None`.
    ///
    /// CLI flags have higher priority than configuration sources.
    pub fn merge(&mut self, other: Self) {
        self.manifest_name = other.manifest_name.or_else(|| self.manifest_name.take());
        self.log_level = other.log_level.or_else(|| self.log_level.take());
    }

    #[must_use]
    pub fn manifest_name(&self) -> &str {
        self.manifest_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_MANIFEST_NAME)
    }

    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Parameters accepted by the `merge` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "merge")]
#[ortho_config(prefix = "PMERGE")]
pub struct MergeArgs {
    /// Main manifest to merge into [default: ./package.json]
    #[arg(short = 'm', long, value_name = "FILE")]
    pub main_file: Option<PathBuf>,
    /// Directory scanned for additional manifests
    #[arg(short = 'p', long, value_name = "DIR")]
    // Not marked required so the directory can come from configuration.
    pub path: Option<PathBuf>,
    /// Output file; the main manifest is overwritten when omitted
    #[arg(short = 't', long, value_name = "FILE")]
    pub target_file: Option<PathBuf>,
    /// Merge authors from all manifests
    #[arg(short = 'a', long)]
    // `is_false` stops false CLI defaults overriding env or config values.
    #[serde(default, skip_serializing_if = "is_false")]
    pub author_merge: bool,
    /// Merge scripts from all manifests, renaming conflicting ones
    #[arg(short = 's', long)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub script_merge: bool,
    /// Compare version segments as numbers rather than strings
    #[arg(short = 'n', long)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub numeric_versions: bool,
    /// Print the merged manifest instead of writing it
    #[arg(long)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub dry_run: bool,
}

impl MergeArgs {
    /// Engine options selected by these arguments.
    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            author_merge: self.author_merge,
            script_merge: self.script_merge,
            segment_order: segment_order(self.numeric_versions),
        }
    }
}

/// Parameters accepted by the `compare` sub-command.
#[derive(Parser, Debug, Clone)]
#[command(name = "compare")]
pub struct CompareArgs {
    /// Left-hand version, e.g. `^1.2.0`
    pub left: String,
    /// Right-hand version
    pub right: String,
    /// Compare version segments as numbers rather than strings
    #[arg(short = 'n', long)]
    pub numeric: bool,
}

impl CompareArgs {
    #[must_use]
    pub fn segment_order(&self) -> SegmentOrder {
        segment_order(self.numeric)
    }
}

fn segment_order(numeric: bool) -> SegmentOrder {
    if numeric {
        SegmentOrder::Numeric
    } else {
        SegmentOrder::Lexicographic
    }
}
