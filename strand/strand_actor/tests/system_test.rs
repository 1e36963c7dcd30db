//! Integration tests for configuration loading and the registry.

use std::io::Write;

use strand_actor::{ActorSystem, ActorSystemConfig, Error, ScopedActor};
use tempfile::NamedTempFile;

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "thread_name_prefix = \"io\"").unwrap();
    writeln!(file, "cache_warning_threshold = 16").unwrap();

    let config = ActorSystemConfig::from_file(file.path()).unwrap();

    assert_eq!(config.thread_name_prefix, "io");
    assert_eq!(config.cache_warning_threshold, 16);
    assert_eq!(config.scoped_actor_name, "scoped");
}

#[test]
fn test_config_file_with_bad_syntax() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "thread_name_prefix = ").unwrap();

    let result = ActorSystemConfig::from_file(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_scoped_actor_uses_configured_name() {
    let config = ActorSystemConfig {
        scoped_actor_name: "main".to_string(),
        ..ActorSystemConfig::default()
    };
    let system = ActorSystem::with_config(config);
    let scoped = ScopedActor::new(&system);

    let snapshot = system.registry().snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, scoped.id());
    assert_eq!(snapshot[0].name, "main");
}

#[test]
fn test_snapshot_serializes() {
    let system = ActorSystem::new();
    let _first = ScopedActor::new(&system);
    let _second = ScopedActor::new(&system);

    let json = serde_json::to_value(system.registry().snapshot()).unwrap();
    let entries = json.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert_eq!(entry["name"], "scoped");
        assert!(entry["registered_at"].is_string());
    }
}

#[test]
fn test_registry_lookup_sends_to_actor() {
    let system = ActorSystem::new();
    let scoped = ScopedActor::new(&system);

    let address = system.registry().get(scoped.id()).unwrap();
    address.tell(9u8).unwrap();

    assert_eq!(scoped.pending(), 1);
}
