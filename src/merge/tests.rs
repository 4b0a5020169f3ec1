//! Tests for the merge engine.

use super::*;
use crate::manifest::{DependencyMap, ScriptMap};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

const NOW: i64 = 1_700_000_000_000;

fn manifest(value: Value) -> Manifest {
    serde_json::from_value(value).expect("valid manifest")
}

fn dependencies(outcome: &MergeOutcome) -> Vec<(&str, &str)> {
    outcome
        .manifest
        .dependencies
        .iter()
        .flatten()
        .map(|(name, version)| (name.as_str(), version.as_str().unwrap_or_default()))
        .collect()
}

fn scripts(outcome: &MergeOutcome) -> Vec<(&str, &str)> {
    outcome
        .manifest
        .scripts
        .iter()
        .flatten()
        .map(|(name, command)| (name.as_str(), command.as_str().unwrap_or_default()))
        .collect()
}

fn run(primary: &Manifest, secondaries: &[Manifest], options: MergeOptions) -> MergeOutcome {
    Merger::new(options)
        .with_clock(&FixedClock(NOW))
        .merge(primary, secondaries)
}

#[fixture]
fn all_enabled() -> MergeOptions {
    MergeOptions {
        author_merge: true,
        script_merge: true,
        ..MergeOptions::default()
    }
}

#[test]
fn newer_secondary_version_wins_and_is_reported() {
    let primary = manifest(json!({ "dependencies": { "a": "1.0.0" } }));
    let secondary = manifest(json!({ "dependencies": { "a": "2.0.0", "b": "1.0.0" } }));

    let outcome = merge(&primary, &[secondary], &MergeOptions::default());

    assert_eq!(dependencies(&outcome), [("a", "2.0.0"), ("b", "1.0.0")]);
    assert_eq!(outcome.conflicting_dependencies, ["a"]);
    assert!(outcome.conflicting_scripts.is_empty());
}

#[rstest]
#[case::older(json!({ "a": "1.0.0" }), "2.0.0")]
#[case::equal(json!({ "a": "2.0.0" }), "2.0.0")]
#[case::qualified_equal(json!({ "a": "^2.0.0" }), "2.0.0")]
#[case::incomparable(json!({ "a": "latest" }), "2.0.0")]
fn held_version_survives_when_not_upgraded(#[case] secondary: Value, #[case] expected: &str) {
    let primary = manifest(json!({ "dependencies": { "a": "2.0.0" } }));
    let secondary = manifest(json!({ "dependencies": secondary }));

    let outcome = merge(&primary, &[secondary], &MergeOptions::default());

    assert_eq!(dependencies(&outcome), [("a", expected)]);
    assert!(outcome.conflicting_dependencies.is_empty());
}

#[test]
fn malformed_held_version_is_never_replaced() {
    let primary = manifest(json!({ "dependencies": { "a": "github:user/a" } }));
    let secondary = manifest(json!({ "dependencies": { "a": "9.9.9" } }));

    let outcome = merge(&primary, &[secondary], &MergeOptions::default());

    assert_eq!(dependencies(&outcome), [("a", "github:user/a")]);
    assert!(outcome.conflicting_dependencies.is_empty());
}

#[test]
fn non_string_versions_are_held_not_compared() {
    let primary = manifest(json!({ "dependencies": { "a": 1, "b": "1.0.0" } }));
    let secondary = manifest(json!({ "dependencies": { "a": "2.0.0", "b": ["2.0.0"] } }));

    let outcome = merge(&primary, &[secondary], &MergeOptions::default());

    let deps = outcome.manifest.dependencies.expect("dependencies");
    assert_eq!(deps.get("a"), Some(&json!(1)));
    assert_eq!(deps.get("b"), Some(&json!("1.0.0")));
    assert!(outcome.conflicting_dependencies.is_empty());
}

#[test]
fn new_dependencies_are_appended_in_the_order_met() {
    let primary = manifest(json!({ "dependencies": { "zod": "3.0.0", "axios": "1.0.0" } }));
    let secondaries = [
        manifest(json!({ "dependencies": { "react": "18.0.0", "axios": "1.1.0" } })),
        manifest(json!({ "dependencies": { "lodash": "4.0.0" } })),
    ];

    let outcome = merge(&primary, &secondaries, &MergeOptions::default());

    assert_eq!(
        dependencies(&outcome),
        [
            ("zod", "3.0.0"),
            ("axios", "1.1.0"),
            ("react", "18.0.0"),
            ("lodash", "4.0.0"),
        ]
    );
}

#[test]
fn multi_digit_segments_follow_lexicographic_order_by_default() {
    let primary = manifest(json!({ "dependencies": { "a": "1.9.0" } }));
    let secondary = manifest(json!({ "dependencies": { "a": "1.10.0" } }));

    let outcome = merge(
        &primary,
        std::slice::from_ref(&secondary),
        &MergeOptions::default(),
    );
    assert_eq!(dependencies(&outcome), [("a", "1.9.0")]);
    assert!(outcome.conflicting_dependencies.is_empty());

    let numeric = MergeOptions {
        segment_order: SegmentOrder::Numeric,
        ..MergeOptions::default()
    };
    let outcome = merge(&primary, &[secondary], &numeric);
    assert_eq!(dependencies(&outcome), [("a", "1.10.0")]);
    assert_eq!(outcome.conflicting_dependencies, ["a"]);
}

#[test]
fn repeated_upgrades_are_reported_once_in_detection_order() {
    let primary = manifest(json!({ "dependencies": { "b": "1.0.0", "a": "1.0.0" } }));
    let secondaries = [
        manifest(json!({ "dependencies": { "b": "1.1.0" } })),
        manifest(json!({ "dependencies": { "a": "1.1.0", "b": "1.2.0" } })),
    ];

    let outcome = merge(&primary, &secondaries, &MergeOptions::default());

    assert_eq!(dependencies(&outcome), [("b", "1.2.0"), ("a", "1.1.0")]);
    assert_eq!(outcome.conflicting_dependencies, ["b", "a"]);
}

#[test]
fn merging_a_manifest_with_itself_changes_nothing() {
    let primary = manifest(json!({
        "name": "app",
        "dependencies": { "a": "^1.2.3", "b": "0.0.1", "c": "10.0" }
    }));

    let outcome = merge(
        &primary,
        std::slice::from_ref(&primary),
        &MergeOptions::default(),
    );

    assert_eq!(outcome.manifest, primary);
    assert!(outcome.conflicting_dependencies.is_empty());
}

#[test]
fn primary_without_dependencies_starts_from_an_empty_map() {
    let primary = manifest(json!({ "name": "app" }));
    let secondaries = [
        manifest(json!({ "dependencies": { "x": "1.0.0" } })),
        manifest(json!({ "name": "no-deps" })),
    ];

    let outcome = merge(&primary, &secondaries, &MergeOptions::default());

    assert_eq!(dependencies(&outcome), [("x", "1.0.0")]);
    assert!(outcome.conflicting_dependencies.is_empty());
}

#[test]
fn empty_primary_still_produces_a_manifest() {
    let outcome = merge(&Manifest::default(), &[], &all_enabled());

    assert_eq!(outcome.manifest.dependencies, Some(DependencyMap::new()));
    assert_eq!(outcome.manifest.scripts, Some(ScriptMap::new()));
    assert!(outcome.manifest.author.is_none());
}

#[test]
fn primary_alone_is_returned_with_its_dependencies() {
    let primary = manifest(json!({ "dependencies": { "a": "1.0.0" } }));

    let outcome = merge(&primary, &[], &MergeOptions::default());

    assert_eq!(outcome.manifest, primary);
    assert!(outcome.conflicting_dependencies.is_empty());
}

#[rstest]
fn conflicting_scripts_are_renamed_not_overwritten(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "name": "app" }));
    let secondaries = [
        manifest(json!({ "scripts": { "build": "tsc" } })),
        manifest(json!({ "scripts": { "build": "webpack", "lint": "eslint ." } })),
    ];

    let outcome = run(&primary, &secondaries, all_enabled);

    let alias = format!("build_conflicting_{NOW}");
    assert_eq!(
        scripts(&outcome),
        [
            ("build", "tsc"),
            (alias.as_str(), "webpack"),
            ("lint", "eslint ."),
        ]
    );
    assert_eq!(outcome.conflicting_scripts, [alias]);
}

#[rstest]
fn aliases_within_one_millisecond_stay_distinct(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "scripts": { "test": "jest" } }));
    let secondaries = [
        manifest(json!({ "scripts": { "test": "mocha" } })),
        manifest(json!({ "scripts": { "test": "ava" } })),
    ];

    let outcome = run(&primary, &secondaries, all_enabled);

    let first = format!("test_conflicting_{NOW}");
    let second = format!("test_conflicting_{NOW}_2");
    assert_eq!(outcome.conflicting_scripts, [first.clone(), second.clone()]);
    assert_eq!(
        scripts(&outcome),
        [
            ("test", "jest"),
            (first.as_str(), "mocha"),
            (second.as_str(), "ava"),
        ]
    );
}

#[rstest]
fn identical_script_definitions_are_not_conflicts(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "scripts": { "build": "make" } }));
    let secondary = manifest(json!({ "scripts": { "build": "make" } }));

    let outcome = run(&primary, &[secondary], all_enabled);

    assert_eq!(scripts(&outcome), [("build", "make")]);
    assert!(outcome.conflicting_scripts.is_empty());
}

#[rstest]
fn scripts_are_not_seeded_from_dependencies(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "dependencies": { "build": "1.0.0" } }));
    let secondary = manifest(json!({ "scripts": { "build": "make" } }));

    let outcome = run(&primary, &[secondary], all_enabled);

    assert_eq!(scripts(&outcome), [("build", "make")]);
    assert_eq!(dependencies(&outcome), [("build", "1.0.0")]);
    assert!(outcome.conflicting_scripts.is_empty());
}

#[test]
fn disabled_script_merge_leaves_scripts_alone() {
    let primary = manifest(json!({ "scripts": { "build": "make" } }));
    let secondary = manifest(json!({ "scripts": { "build": "ninja", "lint": "clippy" } }));

    let outcome = run(&primary, &[secondary], MergeOptions::default());

    assert_eq!(scripts(&outcome), [("build", "make")]);
    assert!(outcome.conflicting_scripts.is_empty());
}

#[rstest]
fn authors_are_joined_in_input_order(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "author": "A" }));
    let secondaries = [
        manifest(json!({ "author": "B" })),
        manifest(json!({ "name": "anonymous" })),
        manifest(json!({ "author": { "name": "C", "email": "c@example.com" } })),
    ];

    let outcome = run(&primary, &secondaries, all_enabled);

    assert_eq!(
        outcome.manifest.author,
        Some(Author::Name(String::from("A,B,C <c@example.com>")))
    );
}

#[test]
fn unusual_authors_join_as_json_and_nulls_are_skipped() {
    let inputs = [
        manifest(json!({ "author": "A" })),
        manifest(json!({ "author": null })),
        manifest(json!({ "author": { "email": "b@example.com" } })),
        manifest(json!({ "author": 7 })),
    ];
    let refs: Vec<&Manifest> = inputs.iter().collect();

    assert_eq!(
        merge_authors(&refs).as_deref(),
        Some(r#"A,{"email":"b@example.com"},7"#)
    );
}

#[rstest]
fn merged_author_stays_where_the_primary_had_it(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "name": "app", "author": "A", "version": "1.0.0" }));
    let secondary = manifest(json!({ "author": "B" }));

    let outcome = run(&primary, &[secondary], all_enabled);

    let written = serde_json::to_value(&outcome.manifest).expect("serialise manifest");
    let keys: Vec<_> = written
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["name", "author", "version", "scripts", "dependencies"]);
    assert_eq!(written.get("author"), Some(&json!("A,B")));
}

#[test]
fn three_plain_authors_join_with_commas() {
    let inputs = [
        manifest(json!({ "author": "A" })),
        manifest(json!({ "author": "B" })),
        manifest(json!({ "author": "C" })),
    ];
    let refs: Vec<&Manifest> = inputs.iter().collect();

    assert_eq!(merge_authors(&refs).as_deref(), Some("A,B,C"));
}

#[test]
fn authors_without_any_author_yield_none() {
    let inputs = [manifest(json!({})), manifest(json!({ "name": "x" }))];
    let refs: Vec<&Manifest> = inputs.iter().collect();

    assert_eq!(merge_authors(&refs), None);
}

#[test]
fn disabled_author_merge_keeps_the_primary_author() {
    let primary = manifest(json!({ "author": "A" }));
    let secondary = manifest(json!({ "author": "B" }));

    let outcome = run(&primary, &[secondary], MergeOptions::default());

    assert_eq!(outcome.manifest.author, Some(Author::Name(String::from("A"))));
}

#[rstest]
fn passthrough_fields_come_from_the_primary_only(all_enabled: MergeOptions) {
    let primary = manifest(json!({ "name": "app", "version": "3.0.0", "private": true }));
    let secondary = manifest(json!({ "name": "lib", "license": "MIT" }));

    let outcome = run(&primary, &[secondary], all_enabled);

    assert_eq!(outcome.manifest.fields, primary.fields);
}

#[test]
fn conflict_log_deduplicates_dependencies_only() {
    let mut log = ConflictLog::default();
    log.record_dependency("a");
    log.record_dependency("b");
    log.record_dependency("a");
    log.record_script(String::from("x_conflicting_1"));
    log.record_script(String::from("x_conflicting_1"));

    assert_eq!(log.dependencies(), ["a", "b"]);
    assert_eq!(log.scripts().len(), 2);
}
