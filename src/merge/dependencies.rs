//! Newest-version-wins folding of dependency maps.

use std::cmp::Ordering;
use log::{debug, info, warn};
use serde_json::map::Entry;

use super::ConflictLog;
use crate::manifest::{DependencyMap, Manifest};
use crate::version::{SegmentOrder, compare_versions_with};

/// Fold the `dependencies` of every manifest into `target`.
///
/// The target's own map seeds the result; a target without one starts from an
/// empty map. New names are appended in the order they are met. A name seen for the first time is inserted as is. A name seen
/// again replaces the held version only when the held version compares lower,
/// and only that upgrade is recorded as a conflict. Equal, lower and
/// incomparable versions, including any that are not strings, leave the held
/// value in place.
pub fn merge_dependencies(
    target: &mut Manifest,
    manifests: &[&Manifest],
    order: SegmentOrder,
    conflicts: &mut ConflictLog,
) {
    info!("merging dependencies");
    let mut merged = target.dependencies.clone().unwrap_or_else(|| {
        warn!("primary manifest has no `dependencies` map; starting from an empty one");
        DependencyMap::new()
    });

    for manifest in manifests {
        let Some(dependencies) = manifest.dependencies.as_ref() else {
            continue;
        };
        for (name, version) in dependencies {
            match merged.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(version.clone());
                }
                Entry::Occupied(mut slot) => {
                    let ordering = slot
                        .get()
                        .as_str()
                        .zip(version.as_str())
                        .and_then(|(held, candidate)| compare_versions_with(held, candidate, order));
                    match ordering {
                        Some(Ordering::Less) => {
                            debug!("{name}: {} -> {version}", slot.get());
                            slot.insert(version.clone());
                            conflicts.record_dependency(name);
                        }
                        Some(_) => {}
                        None => debug!(
                            "{name}: cannot order {} and {version}; keeping the former",
                            slot.get()
                        ),
                    }
                }
            }
        }
    }

    target.dependencies = Some(merged);
}
