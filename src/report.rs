//! Conflict reporting for merged manifests.
//!
//! Lists the dependencies that were upgraded and the scripts that were renamed
//! so a human can check the merged manifest before relying on it.

use std::io::{ErrorKind, Write};

use log::error;
use serde_json::Value;

use crate::merge::MergeOutcome;

/// Write the conflict report to any writer.
///
/// Each upgraded dependency is listed with the version it ended up at. Script
/// aliases are listed only when `include_scripts` is set.
///
/// # Errors
///
/// Returns an error if writing to the provided output fails.
///
/// # Examples
///
/// ```
/// use pmerge::{Manifest, MergeOptions, merge};
/// use pmerge::report::write_conflict_report;
///
/// let outcome = merge(&Manifest::default(), &[], &MergeOptions::default());
/// let mut out = Vec::new();
/// write_conflict_report(&mut out, &outcome, false).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "No conflicting dependencies found\n");
/// ```
pub fn write_conflict_report<W: Write>(
    mut out: W,
    outcome: &MergeOutcome,
    include_scripts: bool,
) -> std::io::Result<()> {
    if outcome.conflicting_dependencies.is_empty() {
        writeln!(out, "No conflicting dependencies found")?;
    } else {
        writeln!(
            out,
            "The following dependencies were conflicting, check them for errors:"
        )?;
        let resolved = outcome.manifest.dependencies.as_ref();
        for name in &outcome.conflicting_dependencies {
            match resolved.and_then(|deps| deps.get(name)) {
                Some(Value::String(version)) => writeln!(out, "    {name} -> {version}")?,
                Some(other) => writeln!(out, "    {name} -> {other}")?,
                None => writeln!(out, "    {name}")?,
            }
        }
    }

    if include_scripts && !outcome.conflicting_scripts.is_empty() {
        writeln!(
            out,
            "The following scripts were conflicting and have been renamed, check them for errors:"
        )?;
        for alias in &outcome.conflicting_scripts {
            writeln!(out, "    {alias}")?;
        }
    }
    Ok(())
}

/// Print the conflict report to a terminal stream such as stdout or stderr.
///
/// A closed pipe is ignored; other write failures are logged.
pub fn print_conflict_report<W: Write>(out: W, outcome: &MergeOutcome, include_scripts: bool) {
    if let Err(e) = write_conflict_report(out, outcome, include_scripts) {
        if e.kind() == ErrorKind::BrokenPipe {
            return;
        }
        error!("failed to write conflict report: {e}");
    }
}
