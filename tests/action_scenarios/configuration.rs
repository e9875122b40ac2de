//! Adaptors built from `keyflow.toml`.

use keyflow::{Adaptor, Client, Config, Error, MemoryStore, RuntimeMode, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn default_config_file_builds_sync_adaptor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    Config::write_default_if_missing(&path).unwrap();

    let config = Config::from_file(&path).unwrap();
    let adaptor = Adaptor::from_config(&config, Client::sync(MemoryStore::new())).unwrap();
    assert_eq!(adaptor.runtime_mode(), RuntimeMode::Sync);
    assert!(adaptor.atomic_transactions());
}

#[test]
fn async_config_requires_async_client() {
    let config = Config::from_toml_str("runtime_mode = \"async\"").unwrap();

    let err = Adaptor::from_config(&config, Client::sync(MemoryStore::new())).unwrap_err();
    assert!(matches!(err, Error::RuntimeModeMismatch { .. }));

    let adaptor =
        Adaptor::from_config(&config, Client::asynchronous(MemoryStore::new().to_async()))
            .unwrap();
    assert_eq!(adaptor.runtime_mode(), RuntimeMode::Async);
}

#[test]
fn non_atomic_config_reaches_transactions() {
    let config = Config::from_toml_str("atomic_transactions = false").unwrap();
    let adaptor = Adaptor::from_config(&config, Client::sync(MemoryStore::new())).unwrap();
    assert!(!adaptor.transaction(vec![]).is_atomic());
}
