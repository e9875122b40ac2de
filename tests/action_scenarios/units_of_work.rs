//! Sessions committing staged work.

use crate::common::sync_adaptor;
use keyflow::{Driver, ExecutionMode, Value};

#[test]
fn session_commits_single_action_unchanged() {
    let (store, adaptor) = sync_adaptor();
    let mut session = adaptor.session();
    session.add(adaptor.hashes().hset("h", "f", "v"));

    let action = session.commit().unwrap();
    assert_eq!(action.execution_mode(), ExecutionMode::Single);
    assert_eq!(action.run_sync().unwrap(), Value::Int(1));
    assert_eq!(store.stats().commands, 1);
}

#[test]
fn session_commits_many_as_transaction() {
    let (store, adaptor) = sync_adaptor();
    let keys = adaptor.keys();
    let strings = adaptor.strings();
    let mut session = adaptor.session();
    session.add_all(vec![
        strings.set("a", 1),
        strings.set("b", 2),
        keys.expire("a", 60),
    ]);

    let result = session.commit().unwrap().run_sync().unwrap();
    assert_eq!(
        result,
        Value::Array(vec![Value::Bool(true), Value::Bool(true), Value::Bool(true)])
    );
    assert_eq!(store.stats().pipelines, 1);
    assert_eq!(keys.ttl("a").run_sync().unwrap(), Value::Int(60));
    assert!(session.commit().is_none());
}
