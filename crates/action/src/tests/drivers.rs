//! Driver-built Actions against the in-memory store.

use super::Recorder;
use crate::{Adaptor, DataType, Driver};
use keyflow_core::{BitOperation, Command, Value};
use std::collections::HashMap;

fn adaptor() -> (Recorder, Adaptor) {
    let recorder = Recorder::new();
    let adaptor = Adaptor::new(recorder.sync_client());
    (recorder, adaptor)
}

#[test]
fn test_driver_actions_carry_commands() {
    let (_, adaptor) = adaptor();
    let hashes = adaptor.hashes();
    assert_eq!(
        hashes.hget("h", "f").command_ref(),
        Some(&Command::HGet {
            key: "h".into(),
            field: "f".into()
        })
    );
    assert_eq!(
        adaptor.lists().commit("k", Value::from(1)).command_ref(),
        Some(&Command::Set {
            key: "k".into(),
            value: Value::Int(1)
        })
    );
}

#[test]
fn test_generic_key_operations() {
    let (_, adaptor) = adaptor();
    let keys = adaptor.keys();

    keys.commit("k", Value::from("v")).run_sync().unwrap();
    assert_eq!(keys.get("k").run_sync().unwrap(), Value::from("v"));
    assert_eq!(keys.exists("k").run_sync().unwrap(), Value::Int(1));
    assert_eq!(keys.ttl("k").run_sync().unwrap(), Value::Int(-1));
    assert_eq!(keys.expire("k", 100).run_sync().unwrap(), Value::Bool(true));
    assert_eq!(keys.ttl("k").run_sync().unwrap(), Value::Int(100));
    assert_eq!(keys.persist("k").run_sync().unwrap(), Value::Bool(true));
    assert_eq!(keys.ttl("k").run_sync().unwrap(), Value::Int(-1));
    assert_eq!(keys.delete_many(["k", "other"]).run_sync().unwrap(), Value::Int(1));
    assert_eq!(keys.ttl("k").run_sync().unwrap(), Value::Int(-2));
}

#[test]
fn test_hash_round() {
    let (_, adaptor) = adaptor();
    let hashes = adaptor.hashes();
    let written = adaptor
        .transaction(vec![
            hashes.hset("user:1", "name", "ada"),
            hashes.hset("user:1", "age", 36),
            hashes.hgetall("user:1"),
        ])
        .select(2)
        .run_sync()
        .unwrap();

    let mut expected = HashMap::new();
    expected.insert("name".to_string(), Value::from("ada"));
    expected.insert("age".to_string(), Value::from("36"));
    assert_eq!(written, Value::Object(expected));
    assert_eq!(hashes.hlen("user:1").run_sync().unwrap(), Value::Int(2));
    assert_eq!(
        hashes.hdel("user:1", &["age", "missing"]).run_sync().unwrap(),
        Value::Int(1)
    );
}

#[test]
fn test_list_and_set() {
    let (_, adaptor) = adaptor();
    let lists = adaptor.lists();
    lists
        .rpush("l", vec![Value::from("a"), Value::from("b"), Value::from("c")])
        .run_sync()
        .unwrap();
    assert_eq!(
        lists.lrange("l", 0, -1).run_sync().unwrap(),
        Value::Array(vec![Value::from("a"), Value::from("b"), Value::from("c")])
    );
    assert_eq!(lists.lpop("l").run_sync().unwrap(), Value::from("a"));

    let sets = adaptor.sets();
    assert_eq!(sets.sadd("s", &["x", "y", "x"]).run_sync().unwrap(), Value::Int(2));
    assert_eq!(sets.sismember("s", "y").run_sync().unwrap(), Value::Bool(true));
    assert_eq!(sets.scard("s").run_sync().unwrap(), Value::Int(2));
}

#[test]
fn test_sorted_set() {
    let (_, adaptor) = adaptor();
    let zsets = adaptor.sorted_sets();
    zsets
        .zadd("z", vec![(2.0, "b".into()), (1.0, "a".into())])
        .run_sync()
        .unwrap();
    assert_eq!(
        zsets.zrange("z", 0, -1, false).run_sync().unwrap(),
        Value::Array(vec![Value::from("a"), Value::from("b")])
    );
    assert_eq!(zsets.zincrby("z", 5.0, "a").run_sync().unwrap(), Value::Float(6.0));
    assert_eq!(zsets.zrank("z", "a").run_sync().unwrap(), Value::Int(1));
}

#[test]
fn test_driver_by_data_type() {
    let (recorder, adaptor) = adaptor();
    let driver = adaptor.driver("string".parse::<DataType>().unwrap());
    driver
        .as_driver()
        .commit("k", Value::from("v"))
        .run_sync()
        .unwrap();
    assert_eq!(recorder.log().calls, vec!["SET"]);
}

#[test]
fn test_bitmap() {
    let (_, adaptor) = adaptor();
    let bits = adaptor.bitmaps();
    assert_eq!(bits.setbit("a", 0, true).run_sync().unwrap(), Value::Int(0));
    assert_eq!(bits.setbit("b", 1, true).run_sync().unwrap(), Value::Int(0));
    assert_eq!(bits.getbit("a", 0).run_sync().unwrap(), Value::Int(1));
    assert_eq!(bits.getbit("a", 1).run_sync().unwrap(), Value::Int(0));

    assert_eq!(
        bits.bitop(BitOperation::Or, "both", &["a", "b"])
            .run_sync()
            .unwrap(),
        Value::Int(1)
    );
    assert_eq!(bits.bitcount("both").run_sync().unwrap(), Value::Int(2));
    // Shared key operations work on bitmaps too
    assert_eq!(bits.get("both").run_sync().unwrap(), Value::Bytes(vec![0xC0]));
}

#[test]
fn test_hyperloglog_in_one_transaction() {
    let (recorder, adaptor) = adaptor();
    let hll = adaptor.hyperloglogs();
    let txn = adaptor.transaction(vec![
        hll.pfadd("day1", &["ann", "bob"]),
        hll.pfadd("day2", &["bob", "cy"]),
        hll.pfmerge("week", &["day1", "day2"]),
        hll.pfcount("week"),
    ]);
    assert_eq!(txn.select(3).run_sync().unwrap(), Value::Int(3));
    let log = recorder.log();
    assert_eq!(log.queued, vec!["PFADD", "PFADD", "PFMERGE", "PFCOUNT"]);
    assert_eq!(log.executes, 1);
}
