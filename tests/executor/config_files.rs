//! canopy.toml on disk drives the console.

use canopy::{ConsoleConfig, CONFIG_FILE_NAME};
use tempfile::TempDir;

use crate::common::*;

#[test]
fn init_then_load_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    assert!(ConsoleConfig::write_default_if_missing(&path).unwrap());
    assert!(!ConsoleConfig::write_default_if_missing(&path).unwrap());

    let config = ConsoleConfig::load_or_default(&path).unwrap();
    assert_eq!(config, ConsoleConfig::default());
    assert!(config.model.is_none());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConsoleConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(config, ConsoleConfig::default());
}

#[test]
fn explicit_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        ConsoleConfig::from_file(&dir.path().join("nope.toml")),
        Err(Error::Config { .. })
    ));
}

#[test]
fn full_file_configures_store_model_and_view() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
[store]
url = "my-project"
auth = "tok"

[model]
endpoint = "http://localhost:11434/v1/"
model = "qwen3:1.7b"
timeout_ms = 5000

[view]
expand_depth = 1
max_depth = 3
"#,
    )
    .unwrap();

    let config = ConsoleConfig::from_file(&path).unwrap();
    assert_eq!(config.store.url.as_deref(), Some("my-project"));
    assert_eq!(config.store.auth.as_deref(), Some("tok"));

    let model = config.model.as_ref().unwrap();
    assert_eq!(model.timeout_ms, 5000);
    assert_eq!(
        model.planner().url(),
        "http://localhost:11434/v1/chat/completions"
    );

    let store = std::sync::Arc::new(MemoryStore::with_data(tree(json!({"a": {"b": 1}}))));
    let mut console = Console::new(config.view.tree_view());
    console.connect_memory(Box::new(store)).unwrap();
    let rows = console.visible_nodes();
    assert!(rows[0].expanded);
    assert_eq!(rows.len(), 2);
}

#[test]
fn malformed_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[view]\nmax_depth = \"deep\"\n").unwrap();

    match ConsoleConfig::from_file(&path) {
        Err(Error::Config { reason }) => assert!(reason.contains(CONFIG_FILE_NAME)),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn written_config_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let mut config = ConsoleConfig::default();
    config.store.url = Some("https://db.example.com".into());
    config.view.expand_depth = 4;

    config.write_to_file(&path).unwrap();

    assert_eq!(ConsoleConfig::from_file(&path).unwrap(), config);
}
