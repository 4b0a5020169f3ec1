//! Command execution helpers for `pmerge`.
//!
//! This module owns the runtime flow for each sub-command: reading manifests,
//! running the merge engine, writing the result and reporting conflicts.

use std::cmp::Ordering;
use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::PmergeError;
use crate::cli_args::{CompareArgs, GlobalArgs, MergeArgs};
use crate::manifest::{
    discover_manifests, read_manifest, read_manifest_or_default, to_pretty_json, write_manifest,
};
use crate::merge::{MergeOutcome, merge};
use crate::report::print_conflict_report;
use crate::version::compare_versions_with;

/// Merge every manifest found under `args.path` into the main manifest.
///
/// # Errors
///
/// Returns an error when no scan directory is configured, when any manifest
/// cannot be read or parsed, or when the result cannot be written.
pub fn run_merge(args: &MergeArgs, global: &GlobalArgs) -> Result<MergeOutcome, PmergeError> {
    let manifest_name = global.manifest_name();
    let scan_dir = args
        .path
        .as_deref()
        .ok_or_else(|| PmergeError::MissingPath {
            manifest_name: manifest_name.to_owned(),
        })?;
    let main_file = args.main_file.clone().unwrap_or_else(|| {
        info!("no main file specified, defaulting to ./{manifest_name}");
        PathBuf::from(manifest_name)
    });

    let primary = read_manifest_or_default(&main_file)?;
    info!("looking for {manifest_name} files in {}", scan_dir.display());
    let paths = discover_manifests(scan_dir, manifest_name)?;
    if paths.is_empty() {
        info!("did not find any {manifest_name} files in {}", scan_dir.display());
    }
    let secondaries = paths
        .iter()
        .map(|path| read_manifest(path))
        .collect::<Result<Vec<_>, _>>()?;

    info!("merging {} manifests", secondaries.len() + 1);
    let outcome = merge(&primary, &secondaries, &args.merge_options());

    if args.dry_run {
        // The manifest owns stdout so it can be redirected to a file as is.
        let text = to_pretty_json(&outcome.manifest)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .map_err(|source| PmergeError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        print_conflict_report(std::io::stderr().lock(), &outcome, args.script_merge);
    } else {
        let target = args.target_file.as_ref().unwrap_or(&main_file);
        if args.target_file.is_some() {
            info!("writing to target file {}", target.display());
        } else {
            info!("overwriting {}", target.display());
        }
        write_manifest(target, &outcome.manifest)?;
        print_conflict_report(std::io::stdout().lock(), &outcome, args.script_merge);
    }

    Ok(outcome)
}

/// Print `<`, `=` or `>` for the ordering of two versions.
///
/// # Errors
///
/// Returns [`PmergeError::IncomparableVersions`] when either version is
/// malformed.
pub fn run_compare(args: &CompareArgs) -> Result<Ordering, PmergeError> {
    let ordering = compare_versions_with(&args.left, &args.right, args.segment_order())
        .ok_or_else(|| PmergeError::IncomparableVersions {
            left: args.left.clone(),
            right: args.right.clone(),
        })?;
    let symbol = match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{symbol}");
    Ok(ordering)
}
