//! Manifest merge engine.
//!
//! Folds a primary manifest and any number of secondary manifests into one.
//! The primary always leads the input sequence, so its values seed every
//! sub-merge before any secondary is considered. Sub-mergers run one after the
//! other on a single owned target; conflicts are collected in a [`ConflictLog`]
//! threaded through each of them.

mod authors;
mod dependencies;
mod scripts;

use std::iter;

use log::info;

pub use authors::merge_authors;
pub use dependencies::merge_dependencies;
pub use scripts::{Clock, SystemClock, merge_scripts};

use crate::manifest::{Author, Manifest};
use crate::version::SegmentOrder;

/// Selects the optional sub-mergers and the version ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Replace the target's author with every input's author joined by `,`.
    pub author_merge: bool,
    /// Fold scripts, renaming conflicting definitions instead of dropping them.
    pub script_merge: bool,
    pub segment_order: SegmentOrder,
}

/// Names that collided while merging, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictLog {
    dependencies: Vec<String>,
    scripts: Vec<String>,
}

impl ConflictLog {
    /// Record a dependency that was upgraded; repeated names are kept once.
    pub fn record_dependency(&mut self, name: &str) {
        if !self.dependencies.iter().any(|seen| seen == name) {
            self.dependencies.push(name.to_owned());
        }
    }

    /// Record the alias a conflicting script was stored under.
    pub fn record_script(&mut self, alias: String) {
        self.scripts.push(alias);
    }

    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[must_use]
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }
}

/// The merged manifest together with everything that needs human review.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub manifest: Manifest,
    pub conflicting_dependencies: Vec<String>,
    /// Aliases under which conflicting scripts were stored.
    pub conflicting_scripts: Vec<String>,
}

/// Runs the sub-mergers selected by [`MergeOptions`].
pub struct Merger<'c> {
    options: MergeOptions,
    clock: &'c dyn Clock,
}

impl Merger<'static> {
    #[must_use]
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            clock: &SystemClock,
        }
    }
}

impl Merger<'_> {
    /// Use `clock` to timestamp conflicting script aliases.
    #[must_use]
    pub fn with_clock<'n>(self, clock: &'n dyn Clock) -> Merger<'n> {
        Merger {
            options: self.options,
            clock,
        }
    }

    /// Merge `secondaries` into a copy of `primary`.
    ///
    /// Dependencies are always merged. Authors and scripts are merged only
    /// when enabled. The inputs are left untouched.
    #[must_use]
    pub fn merge(&self, primary: &Manifest, secondaries: &[Manifest]) -> MergeOutcome {
        if secondaries.is_empty() {
            info!("no secondary manifests supplied; the primary is merged on its own");
        }
        let inputs: Vec<&Manifest> = iter::once(primary).chain(secondaries).collect();
        let mut target = primary.clone();
        let mut conflicts = ConflictLog::default();

        if self.options.author_merge {
            if let Some(author) = merge_authors(&inputs) {
                target.author = Some(Author::Name(author));
            }
        }
        if self.options.script_merge {
            merge_scripts(&mut target, &inputs, self.clock, &mut conflicts);
        }
        merge_dependencies(
            &mut target,
            &inputs,
            self.options.segment_order,
            &mut conflicts,
        );

        let ConflictLog {
            dependencies,
            scripts,
        } = conflicts;
        MergeOutcome {
            manifest: target,
            conflicting_dependencies: dependencies,
            conflicting_scripts: scripts,
        }
    }
}

/// Merge `secondaries` into `primary` using the system clock.
///
/// # Examples
///
/// ```
/// use pmerge::{Manifest, MergeOptions, merge};
///
/// let primary: Manifest =
///     serde_json::from_str(r#"{ "dependencies": { "a": "1.0.0" } }"#).unwrap();
/// let secondary: Manifest =
///     serde_json::from_str(r#"{ "dependencies": { "a": "2.0.0", "b": "1.0.0" } }"#).unwrap();
///
/// let outcome = merge(&primary, &[secondary], &MergeOptions::default());
/// let deps = outcome.manifest.dependencies.unwrap();
/// assert_eq!(deps["a"], "2.0.0");
/// assert_eq!(deps["b"], "1.0.0");
/// assert_eq!(outcome.conflicting_dependencies, ["a"]);
/// ```
#[must_use]
pub fn merge(primary: &Manifest, secondaries: &[Manifest], options: &MergeOptions) -> MergeOutcome {
    Merger::new(*options).merge(primary, secondaries)
}

#[cfg(test)]
mod tests;
