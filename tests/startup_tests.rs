//! Startup and shutdown behavior against real files.

use std::fs;

use tempfile::TempDir;

use hjson_panel::codec::{DecodeOptions, EncodeOptions};
use hjson_panel::config::{self, ConfigDocument, DEFAULT_CONFIG, keys};
use hjson_panel::error::ConfigError;

fn decode_opts() -> DecodeOptions {
    DecodeOptions {
        duplicate_key_strict: true,
        preserve_formatting: true,
    }
}

fn encode_opts() -> EncodeOptions {
    EncodeOptions {
        omit_root_braces: true,
    }
}

#[test]
fn first_run_writes_the_default_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.hjson");

    let mut doc = ConfigDocument::load(path.clone(), &decode_opts(), encode_opts()).unwrap();
    doc.overlay_defaults(&config::default_document());
    doc.save().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
}

#[test]
fn duplicate_key_in_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.hjson");
    fs::write(&path, "alpha: 1\nbeta: 2\nalpha: 3\n").unwrap();

    match ConfigDocument::load(path, &decode_opts(), encode_opts()) {
        Err(ConfigError::DuplicateKey { key, line }) => {
            assert_eq!(key, "alpha");
            assert_eq!(line, 3);
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn syntax_error_reports_its_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.hjson");
    fs::write(&path, "alpha: 1\nbroken\n").unwrap();

    match ConfigDocument::load(path, &decode_opts(), encode_opts()) {
        Err(ConfigError::Syntax { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected Syntax, got {other:?}"),
    }
}

#[test]
fn user_edits_and_comments_survive_a_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.hjson");
    fs::write(
        &path,
        "// my personal settings\nalpha: 700\n# keep beta small\nbeta: 16\n",
    )
    .unwrap();

    let mut doc = ConfigDocument::load(path.clone(), &decode_opts(), encode_opts()).unwrap();
    doc.overlay_defaults(&config::default_document());
    assert_eq!(doc.root().get(keys::ALPHA).unwrap().try_i64().unwrap(), 700);
    assert_eq!(doc.root().get(keys::BETA).unwrap().try_i64().unwrap(), 16);

    // A session edit, then shutdown.
    doc.root_mut().set(keys::ALPHA, 900i64).unwrap();
    doc.save().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# keep beta small"));
    assert!(written.contains("alpha: 900"));
    // Keys the user never set come from the defaults, comments included.
    assert!(written.contains("// This string will be shown in the UI."));
    assert!(written.contains("gamma: 7"));
}

#[test]
fn window_dimensions_are_read_strictly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.hjson");
    fs::write(&path, "mainWindowWidth: wide\n").unwrap();

    let mut doc = ConfigDocument::load(path, &decode_opts(), encode_opts()).unwrap();
    doc.overlay_defaults(&config::default_document());
    let err = doc
        .root()
        .get(keys::MAIN_WINDOW_WIDTH)
        .and_then(|v| v.try_f64())
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::TypeMismatch {
            expected: "double",
            actual: "string"
        }
    ));
}

#[test]
fn fractional_window_dimensions_are_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.hjson");
    fs::write(&path, "mainWindowWidth: 500.0\nmainWindowHeight: 389.5\n").unwrap();

    let mut doc = ConfigDocument::load(path, &decode_opts(), encode_opts()).unwrap();
    doc.overlay_defaults(&config::default_document());
    // Sizing accepts Int or Double and truncates to whole pixels.
    let width = doc
        .root()
        .get(keys::MAIN_WINDOW_WIDTH)
        .and_then(|v| v.try_f64())
        .unwrap() as i64;
    let height = doc
        .root()
        .get(keys::MAIN_WINDOW_HEIGHT)
        .and_then(|v| v.try_f64())
        .unwrap() as i64;
    assert_eq!(width, 500);
    assert_eq!(height, 389);
}
