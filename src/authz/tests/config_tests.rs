//! Configuration loading from disk

use procflow_authz::{
    CommandContext, EngineConfig, InMemoryAuthorizationStore, MutationGate, PropertyMutation,
    RevokeMode, WorkItemRef,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
        [authorization]
        revoke_mode = "always"

        [logging]
        level = "procflow_authz=debug"
        "#,
    );

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.revoke_mode(), RevokeMode::Always);
    assert!(config.authorization_enabled());
    assert_eq!(config.logging.level, "procflow_authz=debug");
}

#[test]
fn test_load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.toml"));
}

#[test]
fn test_load_invalid_file() {
    let file = write_config("[authorization]\nenabled = \"sometimes\"\n");
    assert!(EngineConfig::load(file.path()).is_err());
}

#[test]
fn test_disabled_config_permits_everything() {
    let file = write_config("[authorization]\nenabled = false\n");
    let config = EngineConfig::load(file.path()).unwrap();

    let gate = MutationGate::new(Arc::new(InMemoryAuthorizationStore::new()), &config);
    let item = WorkItemRef::spawned_by("t1", "oneTaskProcess").unwrap();

    for mutation in PropertyMutation::ALL {
        assert!(gate.check(&CommandContext::new("u1"), mutation, &item).is_ok());
    }
    assert_eq!(gate.metrics().bypassed, PropertyMutation::ALL.len() as u64);
}
