// tests/config_loading.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use tempfile::{NamedTempFile, TempDir};

use fscanary::config::{load_and_validate, load_from_path};
use fscanary::errors::FscanaryError;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn sample_config_loads_and_skips_disabled_watches() -> TestResult {
    init_tracing();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("configs/fscanary.toml"))?;

    let titles: Vec<&str> = cfg.watches().iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, vec!["ransom notes", "executables in uploads"]);

    assert_eq!(cfg.global().email, "security@example.com");
    assert_eq!(cfg.global().smtp_port, 25);
    assert!(cfg.global().smtp_from.starts_with("fscanary@"));

    // `path = "/srv/uploads"` is accepted as a one-element list.
    assert_eq!(cfg.watches()[1].path, vec!["/srv/uploads".to_string()]);

    Ok(())
}

#[test]
fn watch_defaults_are_applied() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"

[[watch]]
title = "docs"
path = "/tmp"
pattern = "*.doc"
"#,
    );

    let raw = load_from_path(file.path())?;
    assert_eq!(raw.smtp_port, 25);
    assert_eq!(raw.logging, 1);
    assert!(raw.smtp_from.is_none());

    let watch = &raw.watch[0];
    assert!(watch.notify);
    assert!(!watch.quarantine);
    assert!(watch.enabled);
    assert!(watch.exclude.is_empty());

    Ok(())
}

#[test]
fn quarantine_without_dest_is_fatal() {
    let file = write_config(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"

[[watch]]
title = "images"
path = "/tmp"
pattern = "*.jpg"
quarantine = true
"#,
    );

    match load_and_validate(file.path()) {
        Err(FscanaryError::QuarantineDest(msg)) => {
            assert!(msg.contains("images"));
            assert!(msg.contains("no destination directory"));
        }
        other => panic!("Expected QuarantineDest error, got: {:?}", other),
    }
}

#[test]
fn quarantine_dest_must_exist() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("not-there");

    let file = write_config(&format!(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"

[[watch]]
title = "images"
path = "/tmp"
pattern = "*.jpg"
quarantine = true
dest = "{}"
"#,
        missing.display()
    ));

    match load_and_validate(file.path()) {
        Err(FscanaryError::QuarantineDest(msg)) => {
            assert!(msg.contains("does not exist"));
        }
        other => panic!("Expected QuarantineDest error, got: {:?}", other),
    }
}

#[test]
fn quarantine_dest_that_exists_is_accepted() -> TestResult {
    let tmp = TempDir::new()?;

    let file = write_config(&format!(
        r#"
[[watch]]
title = "images"
path = "/srv/uploads"
pattern = "*.jpg"
notify = false
quarantine = true
dest = "{}"
"#,
        tmp.path().display()
    ));

    // No watch notifies, so email / smtp_server may stay empty.
    let cfg = load_and_validate(file.path())?;
    assert!(cfg.watches()[0].quarantine);

    Ok(())
}

#[test]
fn filesystem_root_as_quarantine_dest_is_rejected() {
    let file = write_config(
        r#"
[[watch]]
title = "images"
path = "/srv/uploads"
pattern = "*.jpg"
notify = false
quarantine = true
dest = "/"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FscanaryError::QuarantineDest(msg)) => {
            assert!(msg.contains("images"));
            assert!(msg.contains("filesystem root"));
        }
        other => panic!("Expected QuarantineDest error, got: {:?}", other),
    }
}

#[test]
fn quarantine_dest_inside_a_watched_path_is_rejected() {
    let watched = TempDir::new().unwrap();
    let vault = watched.path().join("vault");
    std::fs::create_dir(&vault).unwrap();

    // The destination sits under the *other* watch's path.
    let file = write_config(&format!(
        r#"
[[watch]]
title = "images"
path = "/srv/uploads"
pattern = "*.jpg"
notify = false
quarantine = true
dest = "{}"

[[watch]]
title = "everything"
path = "{}"
pattern = "*"
notify = false
"#,
        vault.display(),
        watched.path().display()
    ));

    match load_and_validate(file.path()) {
        Err(FscanaryError::QuarantineDest(msg)) => {
            assert!(msg.contains("images"));
            assert!(msg.contains("inside watched path"));
        }
        other => panic!("Expected QuarantineDest error, got: {:?}", other),
    }
}

#[test]
fn invalid_glob_returns_structured_error() {
    let file = write_config(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"

[[watch]]
title = "broken"
path = "/tmp"
pattern = ["*.jpg", "[unclosed"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(FscanaryError::InvalidPattern { watch, pattern, .. }) => {
            assert_eq!(watch, "broken");
            assert_eq!(pattern, "[unclosed");
        }
        other => panic!("Expected InvalidPattern error, got: {:?}", other),
    }
}

#[test]
fn notify_requires_operator_email() {
    let file = write_config(
        r#"
smtp_server = "mail.example.com"

[[watch]]
title = "docs"
path = "/tmp"
pattern = "*.doc"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FscanaryError::ConfigError(msg)) => assert!(msg.contains("email")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn only_disabled_watches_is_an_error() {
    let file = write_config(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"

[[watch]]
title = "docs"
path = "/tmp"
pattern = "*.doc"
enabled = false
"#,
    );

    match load_and_validate(file.path()) {
        Err(FscanaryError::ConfigError(msg)) => assert!(msg.contains("at least one enabled")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn logging_above_nine_is_rejected() {
    let file = write_config(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"
logging = 12

[[watch]]
title = "docs"
path = "/tmp"
pattern = "*.doc"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(FscanaryError::ConfigError(_))
    ));
}

#[test]
fn duplicate_titles_are_rejected() {
    let file = write_config(
        r#"
email = "ops@example.com"
smtp_server = "mail.example.com"

[[watch]]
title = "docs"
path = "/tmp"
pattern = "*.doc"

[[watch]]
title = "docs"
path = "/var/tmp"
pattern = "*.docx"
"#,
    );

    match load_and_validate(file.path()) {
        Err(FscanaryError::ConfigError(msg)) => assert!(msg.contains("duplicate")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("email = \n[[watch]\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(FscanaryError::TomlError(_))
    ));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        load_and_validate(tmp.path().join("fscanary.toml")),
        Err(FscanaryError::IoError(_))
    ));
}
