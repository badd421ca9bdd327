use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use ttl_cache::{CacheConfig, ConfigError, TtlCache};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(r#"{"ttl_secs": 5, "cleanup_interval_secs": 1}"#);
    let config = CacheConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.ttl(), Duration::from_secs(5));
    assert_eq!(config.cleanup_interval(), Duration::from_secs(1));

    let cache: TtlCache<String, String> = TtlCache::with_config(&config);
    assert_eq!(cache.ttl(), Duration::from_secs(5));
    assert_eq!(cache.cleanup_interval(), Duration::from_secs(1));
}

#[test]
fn test_empty_object_uses_defaults() {
    let file = write_config("{}");
    assert_eq!(CacheConfig::from_json_file(file.path()).unwrap(), CacheConfig::default());
}

#[test]
fn test_written_config_reloads() {
    let config = CacheConfig::new(Duration::from_millis(1500), Duration::from_millis(250)).unwrap();
    let file = write_config(&config.to_json_string().unwrap());
    assert_eq!(CacheConfig::from_json_file(file.path()).unwrap(), config);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = CacheConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"), "{}", err);
}

#[test]
fn test_zero_interval_in_file_rejected() {
    let file = write_config(r#"{"cleanup_interval_secs": 0}"#);
    let err = CacheConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("cleanup_interval"), "{}", err);
}
