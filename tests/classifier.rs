// tests/classifier.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, WatchConfigBuilder, OPERATOR_EMAIL};
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use fscanary::config::ConfigFile;
use fscanary::engine::{Classification, EventClassifier, RuleAction};
use fscanary::fs::mock::MockFileSystem;
use fscanary::watch::{FsEvent, WatchRegistry};

type TestResult = Result<(), Box<dyn Error>>;

const HOST: &str = "canary-host";

fn classifier_for(cfg: &ConfigFile, fs: &MockFileSystem) -> Result<EventClassifier, Box<dyn Error>> {
    let registry = Arc::new(WatchRegistry::from_config(cfg)?);
    Ok(EventClassifier::new(
        registry,
        Arc::new(fs.clone()),
        OPERATOR_EMAIL,
        HOST,
    ))
}

/// Notify-only rule `images` plus an independent `everything` rule.
fn two_rule_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_watch(
            WatchConfigBuilder::new("images")
                .path("/data")
                .pattern("*.jpg")
                .exclude("tmp_*.jpg")
                .build(),
        )
        .with_watch(
            WatchConfigBuilder::new("everything")
                .path("/data")
                .pattern("*")
                .build(),
        )
        .build()
}

#[test]
fn unmatched_basename_fires_nothing() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_watch(
            WatchConfigBuilder::new("images")
                .path("/data")
                .pattern("*.jpg")
                .build(),
        )
        .build();
    let fs = MockFileSystem::new();
    fs.add_file("/data/notes.txt");

    let classifier = classifier_for(&cfg, &fs)?;
    let result = classifier.classify(&FsEvent::created("/data/notes.txt"));

    assert_eq!(result, Classification::Hits(Vec::new()));
    Ok(())
}

#[test]
fn directories_never_reach_pattern_matching() -> TestResult {
    init_tracing();

    let cfg = two_rule_config();
    let fs = MockFileSystem::new();
    // A directory named like a matching file.
    fs.add_dir("/data/album.jpg");

    let classifier = classifier_for(&cfg, &fs)?;
    let result = classifier.classify(&FsEvent::created("/data/album.jpg"));

    assert!(result.is_directory());
    assert!(result.hits().is_empty());
    assert_eq!(fs.probe_count(), 1);
    Ok(())
}

#[test]
fn rules_are_independent_and_evaluated_in_order() -> TestResult {
    init_tracing();

    let cfg = two_rule_config();
    let fs = MockFileSystem::new();
    fs.add_file("/data/photo.jpg");
    fs.add_file("/data/tmp_abc.jpg");

    let classifier = classifier_for(&cfg, &fs)?;

    let hits = classifier
        .classify(&FsEvent::created("/data/photo.jpg"))
        .hits()
        .to_vec();
    let rules: Vec<&str> = hits.iter().map(|h| h.rule.as_str()).collect();
    assert_eq!(rules, vec!["images", "everything"]);

    // The exclude of `images` doesn't stop `everything` from firing.
    let hits = classifier
        .classify(&FsEvent::modified("/data/tmp_abc.jpg"))
        .hits()
        .to_vec();
    let rules: Vec<&str> = hits.iter().map(|h| h.rule.as_str()).collect();
    assert_eq!(rules, vec!["everything"]);

    Ok(())
}

#[test]
fn notification_names_rule_pattern_host_and_path() -> TestResult {
    init_tracing();

    let cfg = two_rule_config();
    let fs = MockFileSystem::new();
    fs.add_file("/data/photo.jpg");

    let classifier = classifier_for(&cfg, &fs)?;
    let result = classifier.classify(&FsEvent::created("/data/photo.jpg"));
    let first = &result.hits()[0];

    assert_eq!(first.pattern, "*.jpg");
    match &first.actions[..] {
        [RuleAction::Notify(n)] => {
            assert_eq!(n.recipient, OPERATOR_EMAIL);
            assert_eq!(n.subject, "File Matching 'images'");
            assert!(n.body.contains("'*.jpg'"));
            assert!(n.body.contains(HOST));
            assert!(n.body.ends_with("/data/photo.jpg"));
        }
        other => panic!("expected a single Notify action, got {other:?}"),
    }

    Ok(())
}

#[test]
fn quarantine_rule_yields_notify_then_quarantine() -> TestResult {
    init_tracing();

    let dest = tempfile::TempDir::new()?;
    let cfg = ConfigFileBuilder::new()
        .with_watch(
            WatchConfigBuilder::new("images")
                .path("/data")
                .pattern("*.jpg")
                .quarantine_to(&dest.path().to_string_lossy())
                .build(),
        )
        .build();
    let fs = MockFileSystem::new();
    fs.add_file("/data/photo.jpg");

    let classifier = classifier_for(&cfg, &fs)?;
    let result = classifier.classify(&FsEvent::created("/data/photo.jpg"));

    let actions = &result.hits()[0].actions;
    assert_eq!(actions.len(), 2);
    assert!(matches!(actions[0], RuleAction::Notify(_)));
    assert_eq!(
        actions[1],
        RuleAction::Quarantine {
            source: PathBuf::from("/data/photo.jpg"),
            dest_root: dest.path().to_path_buf(),
        }
    );

    Ok(())
}

#[test]
fn notify_disabled_rule_queues_nothing() -> TestResult {
    let dest = tempfile::TempDir::new()?;
    let cfg = ConfigFileBuilder::new()
        .with_watch(
            WatchConfigBuilder::new("silent")
                .path("/data")
                .pattern("*.bin")
                .notify(false)
                .quarantine_to(&dest.path().to_string_lossy())
                .build(),
        )
        .build();
    let fs = MockFileSystem::new();
    fs.add_file("/data/blob.bin");

    let classifier = classifier_for(&cfg, &fs)?;
    let result = classifier.classify(&FsEvent::created("/data/blob.bin"));

    let actions = &result.hits()[0].actions;
    assert_eq!(actions.len(), 1);
    assert!(matches!(actions[0], RuleAction::Quarantine { .. }));

    Ok(())
}

#[test]
fn probe_failure_is_treated_as_a_file() -> TestResult {
    init_tracing();

    let cfg = two_rule_config();
    // Nothing registered: the probe reports NotFound, like a vanished file.
    let fs = MockFileSystem::new();

    let classifier = classifier_for(&cfg, &fs)?;
    let result = classifier.classify(&FsEvent::created("/data/gone.jpg"));

    assert!(!result.is_directory());
    assert_eq!(result.hits().len(), 2);
    Ok(())
}
