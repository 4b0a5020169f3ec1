//! Author concatenation.

use log::{debug, info};

use crate::manifest::Manifest;

/// Join the author of every manifest with `,`, in input order.
///
/// Manifests without an author, or with `"author": null`, are skipped rather
/// than leaving an empty slot, so `A`, none, `C` gives `"A,C"`, not `"A,,C"`.
/// Duplicates are kept. Authors that are neither a string nor a person object
/// appear as compact JSON. Returns `None` when no manifest names an author.
#[must_use]
pub fn merge_authors(manifests: &[&Manifest]) -> Option<String> {
    info!("merging authors");
    let authors: Vec<String> = manifests
        .iter()
        .filter_map(|manifest| manifest.author.as_ref())
        .filter(|author| !author.is_null())
        .map(ToString::to_string)
        .collect();
    debug!("authors: {authors:?}");
    if authors.is_empty() {
        None
    } else {
        Some(authors.join(","))
    }
}
