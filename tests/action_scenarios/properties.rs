//! Properties of driver-built Actions against the in-memory store.
//!
//! Any argument a caller can construct must come back as a value or a
//! transport error, and a failed command must leave the key as it was.

use crate::common::sync_adaptor;
use keyflow::{Driver, Error, StoreError, Value};
use proptest::prelude::*;

fn invalid_argument(err: &Error) -> bool {
    matches!(err, Error::Transport(StoreError::InvalidArgument { .. }))
}

proptest! {
    #[test]
    fn transaction_of_increments_is_a_prefix_sum(deltas in prop::collection::vec(-1_000i64..1_000, 1..12)) {
        let (store, adaptor) = sync_adaptor();
        let strings = adaptor.strings();
        let txn = adaptor.transaction(deltas.iter().map(|d| strings.incr_by("c", *d)).collect());

        let expected: Vec<Value> = deltas
            .iter()
            .scan(0i64, |sum, d| {
                *sum += d;
                Some(Value::Int(*sum))
            })
            .collect();
        prop_assert_eq!(txn.run_sync().unwrap(), Value::Array(expected));
        prop_assert_eq!(store.stats().pipelines, 1);
        prop_assert_eq!(store.stats().commands, 0);
    }

    #[test]
    fn expire_accepts_or_rejects_any_timeout(seconds in any::<i64>()) {
        let (_, adaptor) = sync_adaptor();
        let keys = adaptor.keys();
        keys.commit("k", Value::from("v")).run_sync().unwrap();

        match keys.expire("k", seconds).run_sync() {
            Ok(v) => prop_assert_eq!(v, Value::Bool(true)),
            Err(e) => {
                prop_assert!(invalid_argument(&e));
                prop_assert_eq!(keys.ttl("k").run_sync().unwrap(), Value::Int(-1));
            }
        }
    }

    #[test]
    fn setrange_keeps_text_valid(
        initial in "\\PC{0,6}",
        offset in prop_oneof![0usize..24, (1usize << 40)..usize::MAX],
        patch in "\\PC{1,4}",
    ) {
        let (_, adaptor) = sync_adaptor();
        let strings = adaptor.strings();
        strings.set("k", initial.as_str()).run_sync().unwrap();

        match strings.set_range("k", offset, &patch).run_sync() {
            Ok(len) => {
                let text = strings.get("k").run_sync().unwrap();
                let text = text.as_str().unwrap_or_default();
                prop_assert_eq!(len, Value::from(text.len()));
                prop_assert_eq!(&text.as_bytes()[offset..offset + patch.len()], patch.as_bytes());
            }
            Err(e) => {
                prop_assert!(invalid_argument(&e));
                prop_assert_eq!(strings.get("k").run_sync().unwrap(), Value::from(initial.as_str()));
            }
        }
    }

    #[test]
    fn zincrby_never_stores_nan(deltas in prop::collection::vec(prop::num::f64::ANY, 1..6)) {
        let (_, adaptor) = sync_adaptor();
        let zsets = adaptor.sorted_sets();
        for delta in deltas {
            let before = zsets.zscore("z", "m").run_sync().unwrap();
            if zsets.zincrby("z", delta, "m").run_sync().is_err() {
                prop_assert_eq!(zsets.zscore("z", "m").run_sync().unwrap(), before);
            }
            if let Some(score) = zsets.zscore("z", "m").run_sync().unwrap().as_float() {
                prop_assert!(!score.is_nan());
            }
        }
    }
}
