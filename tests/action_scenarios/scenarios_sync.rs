//! Scenarios on the blocking runtime.

use crate::common::sync_adaptor;
use keyflow::{Action, Command, Driver, Error, RuntimeMode, StoreError, SyncClient, Value};

#[test]
fn leaf_get_returns_stored_value() {
    let (store, adaptor) = sync_adaptor();
    store
        .call(&Command::Set {
            key: "k".into(),
            value: Value::from("v"),
        })
        .unwrap();

    let action = Action::named(RuntimeMode::Sync, "get", vec![Value::from("k")])
        .unwrap()
        .with_adaptor(adaptor);
    assert_eq!(action.run_sync().unwrap(), Value::from("v"));
}

#[test]
fn sequence_set_then_get() {
    let (_, adaptor) = sync_adaptor();
    let strings = adaptor.strings();
    let value = adaptor
        .sequence(vec![strings.set("k", "v"), strings.get("k")])
        .select(1)
        .run_sync()
        .unwrap();
    assert_eq!(value, Value::from("v"));
}

#[test]
fn transaction_incr_twice_is_one_pipeline() {
    let (store, adaptor) = sync_adaptor();
    let strings = adaptor.strings();
    let result = adaptor
        .transaction(vec![strings.incr("c"), strings.incr("c")])
        .run_sync()
        .unwrap();

    assert_eq!(result, Value::Array(vec![Value::Int(1), Value::Int(2)]));
    let stats = store.stats();
    assert_eq!(stats.pipelines, 1);
    assert_eq!(stats.pipelined_commands, 2);
    assert_eq!(stats.commands, 0);
}

#[test]
fn then_chains_in_order() {
    let (_, adaptor) = sync_adaptor();
    let strings = adaptor.strings();
    strings.set("name", "keyflow").run_sync().unwrap();

    let shout = strings
        .get("name")
        .then(|v| Value::from(v.as_str().unwrap_or_default().to_uppercase()))
        .then(|v| Value::from(format!("{}!", v.as_str().unwrap_or_default())));
    assert_eq!(shout.run_sync().unwrap(), Value::from("KEYFLOW!"));
}

#[test]
fn handler_continuation_follows_pointer() {
    let (_, adaptor) = sync_adaptor();
    let strings = adaptor.strings();
    strings.set("pointer", "target").run_sync().unwrap();
    strings.set("target", "payload").run_sync().unwrap();

    let lookup = adaptor.clone();
    let deref = strings.get("pointer").and_then(move |v| {
        let key = v
            .as_str()
            .ok_or_else(|| Error::handler("pointer is not a string"))?;
        Ok(lookup.strings().get(key).into())
    });
    assert_eq!(deref.run_sync().unwrap(), Value::from("payload"));
}

#[test]
fn failed_transaction_leaves_earlier_commands_applied() {
    let (store, adaptor) = sync_adaptor();
    let strings = adaptor.strings();
    let lists = adaptor.lists();
    lists.rpush("l", vec![Value::from("x")]).run_sync().unwrap();

    let err = adaptor
        .transaction(vec![strings.incr("c"), strings.incr("l"), strings.incr("c")])
        .run_sync()
        .unwrap_err();
    assert!(matches!(err, Error::Transport(StoreError::WrongType { .. })));
    assert_eq!(strings.get("c").run_sync().unwrap(), Value::from("1"));
    assert_eq!(store.stats().pipelines, 1);
}

#[test]
fn async_tree_rejected_by_blocking_trigger() {
    let (_, adaptor) = sync_adaptor();
    let action = Action::command(RuntimeMode::Async, Command::Get { key: "k".into() })
        .with_adaptor(adaptor);
    assert!(matches!(
        action.run_sync(),
        Err(Error::RuntimeModeMismatch { .. })
    ));
}
