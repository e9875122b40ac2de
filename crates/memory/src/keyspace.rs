//! In-memory keyspace and the command dispatch table.
//!
//! Every [`Command`] variant is applied here by an exhaustive `match`, so a
//! new command cannot be added without deciding how the store executes it.
//!
//! # Expiry
//!
//! Keys may carry a deadline. Expired keys are removed lazily: every access
//! goes through [`Keyspace::entry`], which drops the key first if its
//! deadline has passed. There is no background sweeper.
//!
//! # Replies
//!
//! Strings are stored as UTF-8 text. Integer, float and boolean arguments are
//! encoded the way the wire protocol would send them (`Int(1)` is stored as
//! `"1"`), so a `GET` on a text value replies with `Value::String`.
//!
//! Bitmaps are byte strings that need not be UTF-8, so they live in their
//! own variant. Bit commands read text values as their UTF-8 bytes, and
//! `SETBIT` converts a text value to a bitmap in place. `GET` on a bitmap
//! replies with `Value::Bytes`.
//!
//! HyperLogLog values keep their exact member set, so `PFCOUNT` is exact.

use keyflow_core::{BitOperation, Command, StoreError, StoreResult, Value};
use rustc_hash::FxHashMap;
use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

/// Largest string or bitmap a command may produce, in bytes (512 MiB).
pub(crate) const MAX_STRING_LEN: usize = 512 * 1024 * 1024;

/// Stored data for one key
#[derive(Debug, Clone)]
pub(crate) enum Data {
    Str(String),
    Bits(Vec<u8>),
    Hash(FxHashMap<String, String>),
    List(VecDeque<String>),
    Set(BTreeSet<String>),
    ZSet(FxHashMap<String, f64>),
    Hll(BTreeSet<String>),
}

impl Data {
    fn is_empty(&self) -> bool {
        match self {
            Data::Str(_) | Data::Bits(_) | Data::Hll(_) => false,
            Data::Hash(h) => h.is_empty(),
            Data::List(l) => l.is_empty(),
            Data::Set(s) => s.is_empty(),
            Data::ZSet(z) => z.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    data: Data,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(data: Data) -> Self {
        Self {
            data,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |deadline| deadline <= now)
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
    }
}

fn invalid(command: &Command, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidArgument {
        command: command.name().to_string(),
        reason: reason.into(),
    }
}

/// Encode an argument value as stored text.
fn encode(command: &Command, value: &Value) -> StoreResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Bytes(b) => String::from_utf8(b.clone())
            .map_err(|_| invalid(command, "bytes argument is not valid UTF-8")),
        other => Err(invalid(
            command,
            format!("{} cannot be stored as a string", other.type_name()),
        )),
    }
}

/// Normalize an inclusive `[start, stop]` range with negative indexing.
///
/// Returns `None` when the range selects nothing.
fn range_bounds(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

fn sorted_by_score(z: &FxHashMap<String, f64>) -> Vec<(&String, f64)> {
    let mut members: Vec<(&String, f64)> = z.iter().map(|(m, s)| (m, *s)).collect();
    members.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    members
}

macro_rules! typed_access {
    ($get:ident, $get_or_create:ident, $variant:ident, $ty:ty) => {
        fn $get(&mut self, key: &str) -> StoreResult<Option<&mut $ty>> {
            match self.entry(key) {
                None => Ok(None),
                Some(Entry {
                    data: Data::$variant(v),
                    ..
                }) => Ok(Some(v)),
                Some(_) => Err(wrong_type(key)),
            }
        }

        fn $get_or_create(&mut self, key: &str) -> StoreResult<&mut $ty> {
            self.purge_expired(key);
            let entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Entry::new(Data::$variant(Default::default())));
            match &mut entry.data {
                Data::$variant(v) => Ok(v),
                _ => Err(wrong_type(key)),
            }
        }
    };
}

/// The whole keyspace of one store.
#[derive(Debug)]
pub(crate) struct Keyspace {
    entries: FxHashMap<String, Entry>,
    now: Instant,
}

impl Default for Keyspace {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            now: Instant::now(),
        }
    }
}

impl Keyspace {
    /// Number of live keys (expired keys are purged first)
    pub(crate) fn len(&mut self) -> usize {
        self.now = Instant::now();
        let now = self.now;
        self.entries.retain(|_, e| !e.is_expired(now));
        self.entries.len()
    }

    fn purge_expired(&mut self, key: &str) {
        let now = self.now;
        if self.entries.get(key).map_or(false, |e| e.is_expired(now)) {
            self.entries.remove(key);
        }
    }

    fn entry(&mut self, key: &str) -> Option<&mut Entry> {
        self.purge_expired(key);
        self.entries.get_mut(key)
    }

    fn exists(&mut self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    fn remove_if_empty(&mut self, key: &str) {
        if self.entries.get(key).map_or(false, |e| e.data.is_empty()) {
            self.entries.remove(key);
        }
    }

    typed_access!(string, string_or_create, Str, String);
    typed_access!(hash, hash_or_create, Hash, FxHashMap<String, String>);
    typed_access!(list, list_or_create, List, VecDeque<String>);
    typed_access!(set, set_or_create, Set, BTreeSet<String>);
    typed_access!(zset, zset_or_create, ZSet, FxHashMap<String, f64>);
    typed_access!(hll, hll_or_create, Hll, BTreeSet<String>);

    /// Raw bytes of a text or bitmap value.
    fn bytes(&mut self, key: &str) -> StoreResult<Option<&[u8]>> {
        match self.entry(key) {
            None => Ok(None),
            Some(Entry {
                data: Data::Str(s), ..
            }) => Ok(Some(s.as_bytes())),
            Some(Entry {
                data: Data::Bits(b), ..
            }) => Ok(Some(b.as_slice())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    /// Bitmap at `key`, converting a text value in place.
    fn bits_or_create(&mut self, key: &str) -> StoreResult<&mut Vec<u8>> {
        self.purge_expired(key);
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Data::Bits(Vec::new())));
        if let Data::Str(s) = &mut entry.data {
            let bytes = std::mem::take(s).into_bytes();
            entry.data = Data::Bits(bytes);
        }
        match &mut entry.data {
            Data::Bits(b) => Ok(b),
            _ => Err(wrong_type(key)),
        }
    }

    /// Apply one command.
    pub(crate) fn apply(&mut self, cmd: &Command) -> StoreResult<Value> {
        self.now = Instant::now();
        match cmd {
            // ==================== Generic ====================
            Command::Del { keys } => {
                let mut removed = 0i64;
                for key in keys {
                    if self.exists(key) {
                        self.entries.remove(key);
                        removed += 1;
                    }
                }
                Ok(Value::Int(removed))
            }
            Command::Exists { keys } => {
                let count = keys.iter().filter(|k| self.exists(k)).count();
                Ok(Value::from(count))
            }
            Command::Expire { key, seconds } => {
                let now = self.now;
                if !self.exists(key) {
                    return Ok(Value::Bool(false));
                }
                if *seconds <= 0 {
                    self.entries.remove(key);
                    return Ok(Value::Bool(true));
                }
                let deadline = now
                    .checked_add(Duration::from_secs(*seconds as u64))
                    .ok_or_else(|| invalid(cmd, "invalid expire time"))?;
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.expires_at = Some(deadline);
                }
                Ok(Value::Bool(true))
            }
            Command::Ttl { key } => {
                let now = self.now;
                Ok(Value::Int(match self.entry(key) {
                    None => -2,
                    Some(Entry {
                        expires_at: None, ..
                    }) => -1,
                    Some(Entry {
                        expires_at: Some(deadline),
                        ..
                    }) => {
                        let remaining = deadline.saturating_duration_since(now);
                        ((remaining.as_millis() + 500) / 1000) as i64
                    }
                }))
            }
            Command::Persist { key } => Ok(Value::Bool(match self.entry(key) {
                Some(entry) if entry.expires_at.is_some() => {
                    entry.expires_at = None;
                    true
                }
                _ => false,
            })),

            // ==================== String ====================
            Command::Get { key } => match self.entry(key) {
                None => Ok(Value::Null),
                Some(Entry {
                    data: Data::Str(s), ..
                }) => Ok(Value::String(s.clone())),
                Some(Entry {
                    data: Data::Bits(b), ..
                }) => Ok(Value::Bytes(b.clone())),
                Some(_) => Err(wrong_type(key)),
            },
            Command::Set { key, value } => {
                let text = encode(cmd, value)?;
                self.entries.insert(key.clone(), Entry::new(Data::Str(text)));
                Ok(Value::Bool(true))
            }
            Command::IncrBy { key, delta } => self.incr_by(key, *delta),
            Command::DecrBy { key, delta } => {
                let delta = delta.checked_neg().ok_or_else(|| StoreError::Overflow {
                    key: key.clone(),
                })?;
                self.incr_by(key, delta)
            }
            Command::Append { key, value } => {
                let s = self.string_or_create(key)?;
                if s.len().saturating_add(value.len()) > MAX_STRING_LEN {
                    return Err(invalid(cmd, "string exceeds maximum allowed size"));
                }
                s.push_str(value);
                Ok(Value::from(s.len()))
            }
            Command::GetRange { key, start, end } => {
                let Some(s) = self.string(key)? else {
                    return Ok(Value::String(String::new()));
                };
                let bytes = s.as_bytes();
                Ok(Value::String(match range_bounds(bytes.len(), *start, *end) {
                    Some((from, to)) => String::from_utf8_lossy(&bytes[from..=to]).into_owned(),
                    None => String::new(),
                }))
            }
            Command::SetRange { key, offset, value } => {
                if value.is_empty() {
                    return Ok(Value::from(self.string(key)?.map_or(0, |s| s.len())));
                }
                let end = offset
                    .checked_add(value.len())
                    .filter(|end| *end <= MAX_STRING_LEN)
                    .ok_or_else(|| invalid(cmd, "string exceeds maximum allowed size"))?;
                let mut bytes = self
                    .string(key)?
                    .map(|s| s.as_bytes().to_vec())
                    .unwrap_or_default();
                if bytes.len() < end {
                    bytes.resize(end, 0);
                }
                bytes[*offset..end].copy_from_slice(value.as_bytes());
                let text = String::from_utf8(bytes)
                    .map_err(|_| invalid(cmd, "write would split a multi-byte character"))?;
                let len = text.len();
                *self.string_or_create(key)? = text;
                Ok(Value::from(len))
            }

            // ==================== Hash ====================
            Command::HSet { key, fields } => {
                let encoded = fields
                    .iter()
                    .map(|(f, v)| encode(cmd, v).map(|text| (f.clone(), text)))
                    .collect::<StoreResult<Vec<_>>>()?;
                let hash = self.hash_or_create(key)?;
                let added = encoded
                    .into_iter()
                    .filter(|(f, v)| hash.insert(f.clone(), v.clone()).is_none())
                    .count();
                Ok(Value::from(added))
            }
            Command::HGet { key, field } => {
                Ok(self.hash(key)?.and_then(|h| h.get(field).cloned()).into())
            }
            Command::HMGet { key, fields } => {
                let hash = self.hash(key)?;
                Ok(Value::Array(
                    fields
                        .iter()
                        .map(|f| hash.as_ref().and_then(|h| h.get(f).cloned()).into())
                        .collect(),
                ))
            }
            Command::HDel { key, fields } => {
                let removed = match self.hash(key)? {
                    Some(h) => fields.iter().filter(|f| h.remove(*f).is_some()).count(),
                    None => 0,
                };
                self.remove_if_empty(key);
                Ok(Value::from(removed))
            }
            Command::HGetAll { key } => Ok(Value::Object(
                self.hash(key)?
                    .map(|h| {
                        h.iter()
                            .map(|(f, v)| (f.clone(), Value::String(v.clone())))
                            .collect()
                    })
                    .unwrap_or_default(),
            )),
            Command::HExists { key, field } => Ok(Value::Bool(
                self.hash(key)?.map_or(false, |h| h.contains_key(field)),
            )),
            Command::HKeys { key } => {
                let mut fields: Vec<String> =
                    self.hash(key)?.map(|h| h.keys().cloned().collect()).unwrap_or_default();
                fields.sort();
                Ok(Value::Array(fields.into_iter().map(Value::String).collect()))
            }
            Command::HVals { key } => {
                let mut pairs: Vec<(String, String)> = self
                    .hash(key)?
                    .map(|h| h.iter().map(|(f, v)| (f.clone(), v.clone())).collect())
                    .unwrap_or_default();
                pairs.sort();
                Ok(Value::Array(
                    pairs.into_iter().map(|(_, v)| Value::String(v)).collect(),
                ))
            }
            Command::HLen { key } => Ok(Value::from(self.hash(key)?.map_or(0, |h| h.len()))),

            // ==================== List ====================
            Command::LPush { key, values } | Command::RPush { key, values } => {
                let encoded = values
                    .iter()
                    .map(|v| encode(cmd, v))
                    .collect::<StoreResult<Vec<_>>>()?;
                let head = matches!(cmd, Command::LPush { .. });
                let list = self.list_or_create(key)?;
                for v in encoded {
                    if head {
                        list.push_front(v);
                    } else {
                        list.push_back(v);
                    }
                }
                Ok(Value::from(list.len()))
            }
            Command::LPop { key } | Command::RPop { key } => {
                let head = matches!(cmd, Command::LPop { .. });
                let popped = match self.list(key)? {
                    Some(l) if head => l.pop_front(),
                    Some(l) => l.pop_back(),
                    None => None,
                };
                self.remove_if_empty(key);
                Ok(popped.into())
            }
            Command::LRange { key, start, stop } => {
                let items = match self.list(key)? {
                    Some(l) => match range_bounds(l.len(), *start, *stop) {
                        Some((from, to)) => l
                            .range(from..=to)
                            .map(|s| Value::String(s.clone()))
                            .collect(),
                        None => Vec::new(),
                    },
                    None => Vec::new(),
                };
                Ok(Value::Array(items))
            }
            Command::LLen { key } => Ok(Value::from(self.list(key)?.map_or(0, |l| l.len()))),
            Command::LIndex { key, index } => {
                let item = self.list(key)?.and_then(|l| {
                    let len = l.len() as i64;
                    let i = if *index < 0 { len + index } else { *index };
                    if (0..len).contains(&i) {
                        l.get(i as usize).cloned()
                    } else {
                        None
                    }
                });
                Ok(item.into())
            }
            Command::LRem { key, count, value } => {
                let target = encode(cmd, value)?;
                let removed = match self.list(key)? {
                    Some(l) => remove_occurrences(l, &target, *count),
                    None => 0,
                };
                self.remove_if_empty(key);
                Ok(Value::from(removed))
            }

            // ==================== Set ====================
            Command::SAdd { key, members } => {
                let set = self.set_or_create(key)?;
                let added = members.iter().filter(|m| set.insert((*m).clone())).count();
                Ok(Value::from(added))
            }
            Command::SRem { key, members } => {
                let removed = match self.set(key)? {
                    Some(s) => members.iter().filter(|m| s.remove(*m)).count(),
                    None => 0,
                };
                self.remove_if_empty(key);
                Ok(Value::from(removed))
            }
            Command::SMembers { key } => Ok(Value::Array(
                self.set(key)?
                    .map(|s| s.iter().cloned().map(Value::String).collect())
                    .unwrap_or_default(),
            )),
            Command::SIsMember { key, member } => Ok(Value::Bool(
                self.set(key)?.map_or(false, |s| s.contains(member)),
            )),
            Command::SCard { key } => Ok(Value::from(self.set(key)?.map_or(0, |s| s.len()))),

            // ==================== Sorted set ====================
            Command::ZAdd { key, members } => {
                if members.iter().any(|(score, _)| score.is_nan()) {
                    return Err(invalid(cmd, "score is not a valid float"));
                }
                let z = self.zset_or_create(key)?;
                let added = members
                    .iter()
                    .filter(|(score, m)| z.insert(m.clone(), *score).is_none())
                    .count();
                Ok(Value::from(added))
            }
            Command::ZRem { key, members } => {
                let removed = match self.zset(key)? {
                    Some(z) => members.iter().filter(|m| z.remove(*m).is_some()).count(),
                    None => 0,
                };
                self.remove_if_empty(key);
                Ok(Value::from(removed))
            }
            Command::ZScore { key, member } => {
                Ok(self.zset(key)?.and_then(|z| z.get(member).copied()).into())
            }
            Command::ZRange {
                key,
                start,
                stop,
                with_scores,
            }
            | Command::ZRevRange {
                key,
                start,
                stop,
                with_scores,
            } => {
                let reverse = matches!(cmd, Command::ZRevRange { .. });
                let Some(z) = self.zset(key)? else {
                    return Ok(Value::Array(Vec::new()));
                };
                let mut ordered = sorted_by_score(z);
                if reverse {
                    ordered.reverse();
                }
                let items = match range_bounds(ordered.len(), *start, *stop) {
                    Some((from, to)) => ordered[from..=to]
                        .iter()
                        .map(|(m, score)| {
                            if *with_scores {
                                Value::Array(vec![Value::String((*m).clone()), Value::Float(*score)])
                            } else {
                                Value::String((*m).clone())
                            }
                        })
                        .collect(),
                    None => Vec::new(),
                };
                Ok(Value::Array(items))
            }
            Command::ZIncrBy { key, delta, member } => {
                if delta.is_nan() {
                    return Err(invalid(cmd, "increment is not a valid float"));
                }
                let current = self
                    .zset(key)?
                    .and_then(|z| z.get(member).copied())
                    .unwrap_or(0.0);
                let next = current + delta;
                if next.is_nan() {
                    return Err(StoreError::NotANumber { key: key.clone() });
                }
                self.zset_or_create(key)?.insert(member.clone(), next);
                Ok(Value::Float(next))
            }
            Command::ZRank { key, member } => {
                let rank = self.zset(key)?.and_then(|z| {
                    sorted_by_score(z)
                        .iter()
                        .position(|(m, _)| *m == member)
                        .map(|p| p as i64)
                });
                Ok(rank.into())
            }
            Command::ZCard { key } => Ok(Value::from(self.zset(key)?.map_or(0, |z| z.len()))),

            // ==================== Bitmap ====================
            Command::SetBit { key, offset, bit } => {
                let byte = offset / 8;
                if byte >= MAX_STRING_LEN {
                    return Err(invalid(cmd, "bit offset is out of range"));
                }
                let bits = self.bits_or_create(key)?;
                if bits.len() <= byte {
                    bits.resize(byte + 1, 0);
                }
                let mask = 0x80u8 >> (offset % 8);
                let previous = bits[byte] & mask != 0;
                if *bit {
                    bits[byte] |= mask;
                } else {
                    bits[byte] &= !mask;
                }
                Ok(Value::Int(previous as i64))
            }
            Command::GetBit { key, offset } => {
                let byte = self.bytes(key)?.and_then(|b| b.get(offset / 8).copied());
                Ok(Value::Int(
                    byte.map_or(0, |b| ((b >> (7 - offset % 8)) & 1) as i64),
                ))
            }
            Command::BitCount { key } => Ok(Value::Int(self.bytes(key)?.map_or(0, |b| {
                b.iter().map(|byte| byte.count_ones() as i64).sum()
            }))),
            Command::BitOp { op, dest, keys } => {
                let mut sources = Vec::with_capacity(keys.len());
                for key in keys {
                    sources.push(self.bytes(key)?.map(<[u8]>::to_vec).unwrap_or_default());
                }
                let result = combine_bits(*op, &sources);
                let len = result.len();
                if result.is_empty() {
                    self.entries.remove(dest);
                } else {
                    self.entries
                        .insert(dest.clone(), Entry::new(Data::Bits(result)));
                }
                Ok(Value::from(len))
            }

            // ==================== HyperLogLog ====================
            Command::PfAdd { key, elements } => {
                let hll = self.hll_or_create(key)?;
                let mut changed = false;
                for element in elements {
                    changed |= hll.insert(element.clone());
                }
                Ok(Value::Bool(changed))
            }
            Command::PfCount { keys } => {
                let mut union = BTreeSet::new();
                for key in keys {
                    if let Some(hll) = self.hll(key)? {
                        union.extend(hll.iter().cloned());
                    }
                }
                Ok(Value::from(union.len()))
            }
            Command::PfMerge { dest, sources } => {
                let mut merged = BTreeSet::new();
                for key in sources {
                    if let Some(hll) = self.hll(key)? {
                        merged.extend(hll.iter().cloned());
                    }
                }
                self.hll_or_create(dest)?.extend(merged);
                Ok(Value::Bool(true))
            }
        }
    }

    fn incr_by(&mut self, key: &str, delta: i64) -> StoreResult<Value> {
        let current: i64 = match self.string(key)? {
            None => 0,
            Some(s) => s.parse().map_err(|_| StoreError::NotANumber {
                key: key.to_string(),
            })?,
        };
        let next = current.checked_add(delta).ok_or_else(|| StoreError::Overflow {
            key: key.to_string(),
        })?;
        *self.string_or_create(key)? = next.to_string();
        Ok(Value::Int(next))
    }
}

/// Apply `op` byte-wise; shorter sources are zero-padded.
fn combine_bits(op: BitOperation, sources: &[Vec<u8>]) -> Vec<u8> {
    let len = sources.iter().map(Vec::len).max().unwrap_or(0);
    if op == BitOperation::Not {
        return sources
            .first()
            .map(|b| b.iter().map(|byte| !byte).collect())
            .unwrap_or_default();
    }
    (0..len)
        .map(|i| {
            let mut column = sources.iter().map(|b| b.get(i).copied().unwrap_or(0));
            let first = column.next().unwrap_or(0);
            column.fold(first, |acc, byte| match op {
                BitOperation::And => acc & byte,
                BitOperation::Or => acc | byte,
                BitOperation::Xor | BitOperation::Not => acc ^ byte,
            })
        })
        .collect()
}

fn remove_occurrences(list: &mut VecDeque<String>, target: &str, count: i64) -> usize {
    let limit = if count == 0 {
        usize::MAX
    } else {
        count.unsigned_abs() as usize
    };
    let mut removed = 0;
    if count >= 0 {
        let mut i = 0;
        while i < list.len() && removed < limit {
            if list[i] == target {
                list.remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
    } else {
        let mut i = list.len();
        while i > 0 && removed < limit {
            i -= 1;
            if list[i] == target {
                list.remove(i);
                removed += 1;
            }
        }
    }
    removed
}
