//! Single-mode execution on the blocking path.

use super::{connection_reset, Recorder};
use crate::{Action, Adaptor, Step};
use keyflow_core::{Command, Error, RuntimeMode, StoreError, SyncClient, Value};
use keyflow_memory::MemoryStore;

fn get(key: &str) -> Command {
    Command::Get { key: key.into() }
}

#[test]
fn test_leaf_matches_direct_call() {
    let recorder = Recorder::new();
    recorder
        .store
        .call(&Command::Set {
            key: "k".into(),
            value: Value::from("v"),
        })
        .unwrap();

    let action = Action::command(RuntimeMode::Sync, get("k")).with_client(recorder.sync_client());
    let direct = recorder.store.call(&get("k")).unwrap();

    assert_eq!(action.run_sync().unwrap(), direct);
    assert_eq!(action.run_sync().unwrap(), Value::from("v"));
    // Not memoized: every trigger issues the call again
    assert_eq!(recorder.log().calls, vec!["GET", "GET"]);
}

#[test]
fn test_named_action() {
    let recorder = Recorder::new();
    let client = recorder.sync_client();

    Action::named(RuntimeMode::Sync, "set", vec![Value::from("k"), Value::from("v")])
        .unwrap()
        .with_client(client.clone())
        .run_sync()
        .unwrap();
    let value = Action::named(RuntimeMode::Sync, "GET", vec![Value::from("k")])
        .unwrap()
        .with_client(client)
        .run_sync()
        .unwrap();
    assert_eq!(value, Value::from("v"));
}

#[test]
fn test_empty_action_is_null_without_client() {
    assert_eq!(Action::empty(RuntimeMode::Sync).run_sync().unwrap(), Value::Null);
}

#[test]
fn test_missing_client() {
    let err = Action::command(RuntimeMode::Sync, get("k"))
        .run_sync()
        .unwrap_err();
    assert!(matches!(err, Error::NoClient));
}

#[test]
fn test_adaptor_fallback() {
    let store = MemoryStore::new();
    let adaptor = Adaptor::new(keyflow_core::Client::sync(store.clone()));
    let action = Action::command(
        RuntimeMode::Sync,
        Command::IncrBy {
            key: "c".into(),
            delta: 5,
        },
    )
    .with_adaptor(adaptor);
    assert_eq!(action.run_sync().unwrap(), Value::Int(5));
    assert_eq!(store.stats().commands, 1);
}

#[test]
fn test_explicit_client_wins_over_adaptor() {
    let bound = Recorder::new();
    let fallback = Recorder::new();
    let action = Action::command(RuntimeMode::Sync, get("k"))
        .with_adaptor(Adaptor::new(fallback.sync_client()))
        .with_client(bound.sync_client());

    action.run_sync().unwrap();
    assert_eq!(bound.log().calls.len(), 1);
    assert!(fallback.log().calls.is_empty());
}

#[test]
fn test_executor_receives_bound_client() {
    let recorder = Recorder::new();
    let action = Action::from_executor(RuntimeMode::Sync, |client| {
        let client = client.ok_or(Error::NoClient)?;
        let sync = client
            .as_sync()
            .ok_or_else(|| Error::mode_mismatch("expected a blocking client"))?;
        Ok(Step::Value(sync.call(&Command::Exists {
            keys: vec!["missing".into()],
        })?))
    })
    .with_client(recorder.sync_client());

    assert_eq!(action.run_sync().unwrap(), Value::Int(0));
    assert_eq!(recorder.log().calls, vec!["EXISTS"]);
}

#[test]
fn test_executor_continuation_inherits_client() {
    let recorder = Recorder::new();
    let action = Action::from_executor(RuntimeMode::Sync, |_| {
        Ok(Step::Continue(Action::command(
            RuntimeMode::Sync,
            Command::IncrBy {
                key: "c".into(),
                delta: 2,
            },
        )))
    })
    .with_client(recorder.sync_client());

    assert_eq!(action.run_sync().unwrap(), Value::Int(2));
}

#[test]
fn test_transport_error_passes_through() {
    let recorder = Recorder::new();
    recorder.store.fail_next(connection_reset());

    let err = Action::command(RuntimeMode::Sync, get("k"))
        .with_client(recorder.sync_client())
        .run_sync()
        .unwrap_err();
    assert_eq!(err.as_transport(), Some(&connection_reset()));
    assert_eq!(err.to_string(), connection_reset().to_string());
}

#[test]
fn test_wrong_type_is_transport_error() {
    let recorder = Recorder::new();
    let client = recorder.sync_client();
    Action::command(
        RuntimeMode::Sync,
        Command::RPush {
            key: "l".into(),
            values: vec![Value::from("x")],
        },
    )
    .with_client(client.clone())
    .run_sync()
    .unwrap();

    let err = Action::command(RuntimeMode::Sync, get("l"))
        .with_client(client)
        .run_sync()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(StoreError::WrongType { .. })
    ));
}

#[test]
fn test_execute_on_sync_is_ready() {
    let execution = Action::empty(RuntimeMode::Sync).execute();
    assert!(execution.is_ready());
    assert_eq!(execution.wait().unwrap(), Value::Null);
}
