//! The suspend-based path mirrors the blocking one.

use super::{connection_reset, Recorder};
use crate::{Action, Adaptor, Step};
use keyflow_core::{AsyncClient, Command, Error, RuntimeMode, Value};

fn cmd(command: Command) -> Action {
    Action::command(RuntimeMode::Async, command)
}

fn incr(key: &str) -> Action {
    cmd(Command::IncrBy {
        key: key.into(),
        delta: 1,
    })
}

fn get(key: &str) -> Action {
    cmd(Command::Get { key: key.into() })
}

#[tokio::test]
async fn test_leaf_await() {
    let recorder = Recorder::new();
    let action = incr("c").with_client(recorder.async_client());
    assert_eq!(action.clone().await.unwrap(), Value::Int(1));
    assert_eq!(action.run_async().await.unwrap(), Value::Int(2));
}

#[tokio::test]
async fn test_execute_returns_pending() {
    let recorder = Recorder::new();
    let execution = incr("c").with_client(recorder.async_client()).execute();
    assert!(!execution.is_ready());
    // Nothing runs until awaited
    assert!(recorder.log().calls.is_empty());
    assert_eq!(execution.await.unwrap(), Value::Int(1));
}

#[tokio::test]
async fn test_sequence_ordering() {
    let recorder = Recorder::new();
    let seq = Action::sequence(
        RuntimeMode::Async,
        vec![
            cmd(Command::Set {
                key: "k".into(),
                value: Value::from("v"),
            }),
            get("k"),
        ],
    )
    .select(1)
    .with_client(recorder.async_client());

    assert_eq!(seq.await.unwrap(), Value::from("v"));
    assert_eq!(recorder.log().calls, vec!["SET", "GET"]);
}

#[tokio::test]
async fn test_transaction_one_execute() {
    let recorder = Recorder::new();
    let txn = Action::transaction(RuntimeMode::Async, vec![incr("c"), incr("c")])
        .with_client(recorder.async_client());

    assert_eq!(
        txn.await.unwrap(),
        Value::Array(vec![Value::Int(1), Value::Int(2)])
    );
    let log = recorder.log();
    assert_eq!(log.queued, vec!["INCRBY", "INCRBY"]);
    assert_eq!(log.executes, 1);
}

#[tokio::test]
async fn test_empty_composites_are_rejected() {
    let recorder = Recorder::new();
    let client = recorder.async_client();
    for action in [
        Action::sequence(RuntimeMode::Async, vec![]),
        Action::transaction(RuntimeMode::Async, vec![]),
    ] {
        let err = action.with_client(client.clone()).await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
    assert!(recorder.log().pipelines.is_empty());
}

#[tokio::test]
async fn test_handler_suspension_is_awaited() {
    let recorder = Recorder::new();
    let action = incr("c")
        .with_client(recorder.async_client())
        .and_then(|v| {
            Ok(Step::suspend(async move {
                tokio::task::yield_now().await;
                Ok(Step::value(v.as_int().unwrap_or(0) + 41))
            }))
        })
        .then(|v| Value::from(v.as_int().unwrap_or(0) * 2));

    assert_eq!(action.await.unwrap(), Value::Int(84));
}

#[tokio::test]
async fn test_suspension_yielding_continuation() {
    let recorder = Recorder::new();
    let action = incr("c")
        .with_client(recorder.async_client())
        .and_then(|_| Ok(Step::suspend(async { Ok(Step::Continue(get("c"))) })));

    assert_eq!(action.await.unwrap(), Value::from("1"));
    assert_eq!(recorder.log().calls, vec!["INCRBY", "GET"]);
}

#[tokio::test]
async fn test_executor_suspends() {
    let recorder = Recorder::new();
    let action = Action::from_executor(RuntimeMode::Async, |client| {
        let client = client.ok_or(Error::NoClient)?;
        Ok(Step::suspend(async move {
            let transport = client
                .as_async()
                .ok_or_else(|| Error::mode_mismatch("expected an async client"))?;
            let value = transport
                .call(&Command::Exists {
                    keys: vec!["k".into()],
                })
                .await?;
            Ok(Step::Value(value))
        }))
    })
    .with_client(recorder.async_client());

    assert_eq!(action.await.unwrap(), Value::Int(0));
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let recorder = Recorder::new();
    recorder.store.fail_next(connection_reset());
    let txn = Action::transaction(RuntimeMode::Async, vec![incr("c")])
        .with_client(recorder.async_client());

    let err = txn.await.unwrap_err();
    assert_eq!(err.as_transport(), Some(&connection_reset()));
}

#[tokio::test]
async fn test_adaptor_async_drivers() {
    let recorder = Recorder::new();
    let adaptor = Adaptor::new(recorder.async_client());
    let strings = adaptor.strings();
    let value = adaptor
        .sequence(vec![strings.set("k", 10), strings.incr_by("k", 5)])
        .select(1)
        .await
        .unwrap();
    assert_eq!(value, Value::Int(15));
}

#[tokio::test]
async fn test_future_is_send() {
    let recorder = Recorder::new();
    let action = incr("c").with_client(recorder.async_client());
    let handle = tokio::spawn(action.run_async());
    assert_eq!(handle.await.unwrap().unwrap(), Value::Int(1));
}
