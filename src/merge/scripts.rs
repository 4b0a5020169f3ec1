//! Collision-renaming fold of script maps.

use chrono::Utc;
use log::{info, warn};

use super::ConflictLog;
use crate::manifest::{Manifest, ScriptMap};

/// Source of the timestamp embedded in conflicting script aliases.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Fold the `scripts` of every manifest into `target`.
///
/// A script name seen again with a different command is kept under
/// `<name>_conflicting_<millis>` so no definition is lost; the earlier command
/// keeps the plain name. Identical redefinitions are not conflicts. New names
/// and aliases are appended in the order they are met.
pub fn merge_scripts(
    target: &mut Manifest,
    manifests: &[&Manifest],
    clock: &dyn Clock,
    conflicts: &mut ConflictLog,
) {
    info!("merging scripts");
    let mut merged = target.scripts.clone().unwrap_or_else(|| {
        warn!("primary manifest has no `scripts` map; starting from an empty one");
        ScriptMap::new()
    });

    for manifest in manifests {
        let Some(scripts) = manifest.scripts.as_ref() else {
            continue;
        };
        for (name, command) in scripts {
            match merged.get(name) {
                None => {
                    merged.insert(name.clone(), command.clone());
                }
                Some(existing) if existing == command => {}
                Some(_) => {
                    let alias = conflict_alias(&merged, name, clock.now_millis());
                    info!("conflicting script `{name}` renamed to `{alias}`");
                    merged.insert(alias.clone(), command.clone());
                    conflicts.record_script(alias);
                }
            }
        }
    }

    target.scripts = Some(merged);
}

// Two conflicts within one millisecond would share an alias; number the later ones.
fn conflict_alias(scripts: &ScriptMap, name: &str, millis: i64) -> String {
    let base = format!("{name}_conflicting_{millis}");
    let mut alias = base.clone();
    let mut suffix = 2_u32;
    while scripts.contains_key(&alias) {
        alias = format!("{base}_{suffix}");
        suffix += 1;
    }
    alias
}
