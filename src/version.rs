//! Version string comparison.
//!
//! Versions are dot-separated sequences of ASCII digit segments. The first
//! segment may carry a single leading `^` or `~` range qualifier, which is
//! stripped rather than interpreted: `^1.2.0` compares exactly like `1.2.0`.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

/// How two differing version segments are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentOrder {
    /// Compare segments as strings, so `"9"` sorts after `"10"`.
    ///
    /// This matches the behaviour `pmerge` has always had and is the default.
    #[default]
    Lexicographic,
    /// Compare segments as non-negative integers of any length.
    Numeric,
}

impl SegmentOrder {
    fn compare(self, left: &str, right: &str) -> Ordering {
        match self {
            Self::Lexicographic => left.cmp(right),
            Self::Numeric => {
                let left = left.trim_start_matches('0');
                let right = right.trim_start_matches('0');
                left.len()
                    .cmp(&right.len())
                    .then_with(|| left.cmp(right))
            }
        }
    }
}

fn strip_qualifier(version: &str) -> &str {
    version.strip_prefix(['^', '~']).unwrap_or(version)
}

fn segments(version: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = strip_qualifier(version).split('.').collect();
    parts
        .iter()
        .all(|part| SEGMENT_RE.is_match(part))
        .then_some(parts)
}

/// Returns `true` when `version` is a dotted digit sequence, optionally
/// prefixed by one range qualifier.
///
/// # Examples
///
/// ```
/// use pmerge::version::is_valid_version;
///
/// assert!(is_valid_version("~4.17.21"));
/// assert!(!is_valid_version("latest"));
/// ```
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    segments(version).is_some()
}

/// Compare two versions using [`SegmentOrder::Lexicographic`].
///
/// Returns `None` when either version is malformed. Callers must treat that as
/// "no ordering decision possible" rather than as equality.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use pmerge::compare_versions;
///
/// assert_eq!(compare_versions("1.7.1", "1.6.10"), Some(Ordering::Greater));
/// assert_eq!(compare_versions("^1.2.0", "1.2.0"), Some(Ordering::Equal));
/// assert_eq!(compare_versions("1.x", "1.0"), None);
/// ```
#[must_use]
pub fn compare_versions(left: &str, right: &str) -> Option<Ordering> {
    compare_versions_with(left, right, SegmentOrder::Lexicographic)
}

/// Compare two versions segment by segment.
///
/// Segments of `left` are walked in order. When `right` runs out first, `left`
/// is greater. The first differing segment decides according to `order`. When
/// `left` runs out first with every shared segment equal, `left` is lesser.
#[must_use]
pub fn compare_versions_with(left: &str, right: &str, order: SegmentOrder) -> Option<Ordering> {
    let left = segments(left)?;
    let right = segments(right)?;

    for (index, left_part) in left.iter().enumerate() {
        let Some(right_part) = right.get(index) else {
            return Some(Ordering::Greater);
        };
        match order.compare(left_part, right_part) {
            Ordering::Equal => {}
            decided => return Some(decided),
        }
    }

    if left.len() == right.len() {
        Some(Ordering::Equal)
    } else {
        Some(Ordering::Less)
    }
}
