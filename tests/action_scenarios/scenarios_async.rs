//! Scenarios on the async runtime.

use crate::common::async_adaptor;
use keyflow::{Action, Driver, Error, RuntimeMode, Step, Value};

#[tokio::test]
async fn leaf_await() {
    let (_, adaptor) = async_adaptor();
    let strings = adaptor.strings();
    strings.set("k", "v").await.unwrap();
    assert_eq!(strings.get("k").await.unwrap(), Value::from("v"));
}

#[tokio::test]
async fn transaction_incr_twice_is_one_pipeline() {
    let (store, adaptor) = async_adaptor();
    let strings = adaptor.strings();
    let result = adaptor
        .transaction(vec![strings.incr("c"), strings.incr("c")])
        .execute()
        .await
        .unwrap();

    assert_eq!(result, Value::Array(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(store.stats().pipelines, 1);
}

#[tokio::test]
async fn sequence_observes_writes_from_blocking_view() {
    let (store, adaptor) = async_adaptor();
    let sets = adaptor.sets();
    let members = adaptor
        .sequence(vec![sets.sadd("s", &["b", "a"]), sets.smembers("s")])
        .select(1)
        .await
        .unwrap();
    assert_eq!(members, Value::Array(vec![Value::from("a"), Value::from("b")]));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn handler_may_suspend() {
    let (_, adaptor) = async_adaptor();
    let strings = adaptor.strings();
    let value = strings
        .incr_by("c", 20)
        .and_then(|v| {
            Ok(Step::suspend(async move {
                tokio::task::yield_now().await;
                Ok(Step::value(v.as_int().unwrap_or(0) + 22))
            }))
        })
        .await
        .unwrap();
    assert_eq!(value, Value::Int(42));
}

#[tokio::test]
async fn blocking_tree_rejected_by_async_trigger() {
    let (_, adaptor) = async_adaptor();
    let action = Action::empty(RuntimeMode::Sync).with_adaptor(adaptor);
    assert!(matches!(
        action.run_async().await,
        Err(Error::RuntimeModeMismatch { .. })
    ));
}

#[tokio::test]
async fn trees_run_concurrently_on_shared_store() {
    let (store, adaptor) = async_adaptor();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let strings = adaptor.strings();
        let txn = adaptor.transaction(vec![strings.incr("c"), strings.incr("c")]);
        handles.push(tokio::spawn(txn.run_async()));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(adaptor.strings().get("c").await.unwrap(), Value::from("16"));
    assert_eq!(store.stats().pipelines, 8);
}
