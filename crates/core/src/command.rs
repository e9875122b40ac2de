//! Command enum defining every store operation an Action can carry.
//!
//! Commands are the "instruction set" handed to a store client. They are:
//! - **Self-contained**: all parameters needed for execution are in the variant
//! - **Replayable**: a transaction queues them by value into a pipeline it
//!   does not own, so every variant is plain data
//! - **Typed**: no generic fallback, every operation has explicit fields
//!
//! The name-based form (`"incr", ["counter"]`) is resolved once, through
//! [`Command::parse`], into a variant. After that nothing dispatches on strings.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// A self-contained store command.
///
/// # Command Families
///
/// | Family | Commands |
/// |--------|----------|
/// | Generic | DEL, EXISTS, EXPIRE, TTL, PERSIST |
/// | String | GET, SET, INCRBY, DECRBY, APPEND, GETRANGE, SETRANGE |
/// | Hash | HSET, HGET, HMGET, HDEL, HGETALL, HEXISTS, HKEYS, HVALS, HLEN |
/// | List | LPUSH, RPUSH, LPOP, RPOP, LRANGE, LLEN, LINDEX, LREM |
/// | Set | SADD, SREM, SMEMBERS, SISMEMBER, SCARD |
/// | Sorted set | ZADD, ZREM, ZSCORE, ZRANGE, ZREVRANGE, ZINCRBY, ZRANK, ZCARD |
/// | Bitmap | SETBIT, GETBIT, BITCOUNT, BITOP |
/// | HyperLogLog | PFADD, PFCOUNT, PFMERGE |
///
/// # Example
///
/// ```ignore
/// use keyflow_core::{Command, Value};
///
/// let cmd = Command::Set { key: "k".into(), value: Value::from("v") };
/// assert_eq!(cmd.name(), "SET");
///
/// let parsed = Command::parse("incr", vec![Value::from("counter")])?;
/// assert_eq!(parsed, Command::IncrBy { key: "counter".into(), delta: 1 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Generic ====================
    /// Delete keys. Returns: `Int` (number removed)
    Del { keys: Vec<String> },

    /// Count existing keys. Returns: `Int`
    Exists { keys: Vec<String> },

    /// Set a time-to-live in seconds. Returns: `Bool` (false if key missing)
    Expire { key: String, seconds: i64 },

    /// Remaining time-to-live. Returns: `Int` (-2 missing, -1 no expiry)
    Ttl { key: String },

    /// Remove the expiry. Returns: `Bool`
    Persist { key: String },

    // ==================== String ====================
    /// Get a string value. Returns: `String` or `Null`
    Get { key: String },

    /// Set a string value. Returns: `Bool(true)`
    Set { key: String, value: Value },

    /// Increment an integer. Returns: `Int` (new value)
    IncrBy { key: String, delta: i64 },

    /// Decrement an integer. Returns: `Int` (new value)
    DecrBy { key: String, delta: i64 },

    /// Append to a string. Returns: `Int` (new length)
    Append { key: String, value: String },

    /// Substring by inclusive byte offsets (negative counts from the end).
    /// Returns: `String`
    GetRange { key: String, start: i64, end: i64 },

    /// Overwrite part of a string. Returns: `Int` (new length)
    SetRange {
        key: String,
        offset: usize,
        value: String,
    },

    // ==================== Hash ====================
    /// Set hash fields. Returns: `Int` (fields added)
    HSet {
        key: String,
        fields: Vec<(String, Value)>,
    },

    /// Get one field. Returns: `String` or `Null`
    HGet { key: String, field: String },

    /// Get several fields. Returns: `Array` of `String`/`Null`
    HMGet { key: String, fields: Vec<String> },

    /// Delete fields. Returns: `Int` (fields removed)
    HDel { key: String, fields: Vec<String> },

    /// All fields and values. Returns: `Object`
    HGetAll { key: String },

    /// Field existence. Returns: `Bool`
    HExists { key: String, field: String },

    /// Field names. Returns: `Array`
    HKeys { key: String },

    /// Field values. Returns: `Array`
    HVals { key: String },

    /// Number of fields. Returns: `Int`
    HLen { key: String },

    // ==================== List ====================
    /// Push to the head. Returns: `Int` (new length)
    LPush { key: String, values: Vec<Value> },

    /// Push to the tail. Returns: `Int` (new length)
    RPush { key: String, values: Vec<Value> },

    /// Pop from the head. Returns: `String` or `Null`
    LPop { key: String },

    /// Pop from the tail. Returns: `String` or `Null`
    RPop { key: String },

    /// Inclusive range (negative counts from the end). Returns: `Array`
    LRange { key: String, start: i64, stop: i64 },

    /// Length. Returns: `Int`
    LLen { key: String },

    /// Element at index. Returns: `String` or `Null`
    LIndex { key: String, index: i64 },

    /// Remove occurrences (count > 0 from head, < 0 from tail, 0 all).
    /// Returns: `Int` (removed)
    LRem {
        key: String,
        count: i64,
        value: Value,
    },

    // ==================== Set ====================
    /// Add members. Returns: `Int` (members added)
    SAdd { key: String, members: Vec<String> },

    /// Remove members. Returns: `Int` (members removed)
    SRem { key: String, members: Vec<String> },

    /// All members, sorted. Returns: `Array`
    SMembers { key: String },

    /// Membership. Returns: `Bool`
    SIsMember { key: String, member: String },

    /// Cardinality. Returns: `Int`
    SCard { key: String },

    // ==================== Sorted set ====================
    /// Add or update members with scores. Returns: `Int` (members added)
    ZAdd {
        key: String,
        members: Vec<(f64, String)>,
    },

    /// Remove members. Returns: `Int` (members removed)
    ZRem { key: String, members: Vec<String> },

    /// Score of a member. Returns: `Float` or `Null`
    ZScore { key: String, member: String },

    /// Members by ascending rank. Returns: `Array` of members, or of
    /// `[member, score]` pairs when `with_scores`
    ZRange {
        key: String,
        start: i64,
        stop: i64,
        with_scores: bool,
    },

    /// Members by descending rank. Same reply shape as `ZRange`
    ZRevRange {
        key: String,
        start: i64,
        stop: i64,
        with_scores: bool,
    },

    /// Increment a member's score. Returns: `Float` (new score)
    ZIncrBy {
        key: String,
        delta: f64,
        member: String,
    },

    /// Ascending rank of a member. Returns: `Int` or `Null`
    ZRank { key: String, member: String },

    /// Cardinality. Returns: `Int`
    ZCard { key: String },

    // ==================== Bitmap ====================
    /// Set or clear the bit at `offset`. Returns: `Int` (previous bit)
    SetBit {
        key: String,
        offset: usize,
        bit: bool,
    },

    /// Bit at `offset`, 0 past the end. Returns: `Int`
    GetBit { key: String, offset: usize },

    /// Number of set bits. Returns: `Int`
    BitCount { key: String },

    /// Combine source bitmaps into `dest`. Returns: `Int` (length of `dest` in bytes)
    BitOp {
        op: BitOperation,
        dest: String,
        keys: Vec<String>,
    },

    // ==================== HyperLogLog ====================
    /// Add elements. Returns: `Bool` (whether the cardinality changed)
    PfAdd { key: String, elements: Vec<String> },

    /// Cardinality of the union of `keys`. Returns: `Int`
    PfCount { keys: Vec<String> },

    /// Merge `sources` into `dest`. Returns: `Bool(true)`
    PfMerge { dest: String, sources: Vec<String> },
}

/// Operator of a [`Command::BitOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitOperation {
    /// Bitwise AND; missing bytes count as zero
    And,
    /// Bitwise OR
    Or,
    /// Bitwise XOR
    Xor,
    /// Bitwise NOT of exactly one source
    Not,
}

impl BitOperation {
    /// Store spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BitOperation::And => "AND",
            BitOperation::Or => "OR",
            BitOperation::Xor => "XOR",
            BitOperation::Not => "NOT",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AND" => Some(BitOperation::And),
            "OR" => Some(BitOperation::Or),
            "XOR" => Some(BitOperation::Xor),
            "NOT" => Some(BitOperation::Not),
            _ => None,
        }
    }
}

impl Command {
    /// Canonical store command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Expire { .. } => "EXPIRE",
            Command::Ttl { .. } => "TTL",
            Command::Persist { .. } => "PERSIST",
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::IncrBy { .. } => "INCRBY",
            Command::DecrBy { .. } => "DECRBY",
            Command::Append { .. } => "APPEND",
            Command::GetRange { .. } => "GETRANGE",
            Command::SetRange { .. } => "SETRANGE",
            Command::HSet { .. } => "HSET",
            Command::HGet { .. } => "HGET",
            Command::HMGet { .. } => "HMGET",
            Command::HDel { .. } => "HDEL",
            Command::HGetAll { .. } => "HGETALL",
            Command::HExists { .. } => "HEXISTS",
            Command::HKeys { .. } => "HKEYS",
            Command::HVals { .. } => "HVALS",
            Command::HLen { .. } => "HLEN",
            Command::LPush { .. } => "LPUSH",
            Command::RPush { .. } => "RPUSH",
            Command::LPop { .. } => "LPOP",
            Command::RPop { .. } => "RPOP",
            Command::LRange { .. } => "LRANGE",
            Command::LLen { .. } => "LLEN",
            Command::LIndex { .. } => "LINDEX",
            Command::LRem { .. } => "LREM",
            Command::SAdd { .. } => "SADD",
            Command::SRem { .. } => "SREM",
            Command::SMembers { .. } => "SMEMBERS",
            Command::SIsMember { .. } => "SISMEMBER",
            Command::SCard { .. } => "SCARD",
            Command::ZAdd { .. } => "ZADD",
            Command::ZRem { .. } => "ZREM",
            Command::ZScore { .. } => "ZSCORE",
            Command::ZRange { .. } => "ZRANGE",
            Command::ZRevRange { .. } => "ZREVRANGE",
            Command::ZIncrBy { .. } => "ZINCRBY",
            Command::ZRank { .. } => "ZRANK",
            Command::ZCard { .. } => "ZCARD",
            Command::SetBit { .. } => "SETBIT",
            Command::GetBit { .. } => "GETBIT",
            Command::BitCount { .. } => "BITCOUNT",
            Command::BitOp { .. } => "BITOP",
            Command::PfAdd { .. } => "PFADD",
            Command::PfCount { .. } => "PFCOUNT",
            Command::PfMerge { .. } => "PFMERGE",
        }
    }

    /// The primary key this command touches (the first one for multi-key commands).
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::Del { keys } | Command::Exists { keys } | Command::PfCount { keys } => {
                keys.first().map(String::as_str)
            }
            Command::BitOp { dest, .. } | Command::PfMerge { dest, .. } => Some(dest),
            Command::Expire { key, .. }
            | Command::Ttl { key }
            | Command::Persist { key }
            | Command::Get { key }
            | Command::Set { key, .. }
            | Command::IncrBy { key, .. }
            | Command::DecrBy { key, .. }
            | Command::Append { key, .. }
            | Command::GetRange { key, .. }
            | Command::SetRange { key, .. }
            | Command::HSet { key, .. }
            | Command::HGet { key, .. }
            | Command::HMGet { key, .. }
            | Command::HDel { key, .. }
            | Command::HGetAll { key }
            | Command::HExists { key, .. }
            | Command::HKeys { key }
            | Command::HVals { key }
            | Command::HLen { key }
            | Command::LPush { key, .. }
            | Command::RPush { key, .. }
            | Command::LPop { key }
            | Command::RPop { key }
            | Command::LRange { key, .. }
            | Command::LLen { key }
            | Command::LIndex { key, .. }
            | Command::LRem { key, .. }
            | Command::SAdd { key, .. }
            | Command::SRem { key, .. }
            | Command::SMembers { key }
            | Command::SIsMember { key, .. }
            | Command::SCard { key }
            | Command::ZAdd { key, .. }
            | Command::ZRem { key, .. }
            | Command::ZScore { key, .. }
            | Command::ZRange { key, .. }
            | Command::ZRevRange { key, .. }
            | Command::ZIncrBy { key, .. }
            | Command::ZRank { key, .. }
            | Command::ZCard { key }
            | Command::SetBit { key, .. }
            | Command::GetBit { key, .. }
            | Command::BitCount { key }
            | Command::PfAdd { key, .. } => Some(key),
        }
    }

    /// Whether the command mutates the keyspace.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::Del { .. }
                | Command::Expire { .. }
                | Command::Persist { .. }
                | Command::Set { .. }
                | Command::IncrBy { .. }
                | Command::DecrBy { .. }
                | Command::Append { .. }
                | Command::SetRange { .. }
                | Command::HSet { .. }
                | Command::HDel { .. }
                | Command::LPush { .. }
                | Command::RPush { .. }
                | Command::LPop { .. }
                | Command::RPop { .. }
                | Command::LRem { .. }
                | Command::SAdd { .. }
                | Command::SRem { .. }
                | Command::ZAdd { .. }
                | Command::ZRem { .. }
                | Command::ZIncrBy { .. }
                | Command::SetBit { .. }
                | Command::BitOp { .. }
                | Command::PfAdd { .. }
                | Command::PfMerge { .. }
        )
    }

    /// Resolve a command name and positional arguments into a [`Command`].
    ///
    /// Names are case-insensitive. `INCR`/`DECR` are accepted as `INCRBY`/`DECRBY`
    /// with a delta of 1. Hash fields and sorted-set members are given as
    /// flat alternating arguments, the way the store's wire protocol takes them
    /// (`HSET key f1 v1 f2 v2`, `ZADD key s1 m1 s2 m2`).
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCommand`] for a name outside the dispatch table
    /// - [`Error::InvalidArguments`] for wrong arity or argument types
    pub fn parse(name: &str, args: Vec<Value>) -> Result<Command> {
        let upper = name.to_ascii_uppercase();
        let mut a = Args::new(canonical(&upper).ok_or_else(|| Error::UnknownCommand {
            name: name.to_string(),
        })?, args);

        let cmd = match a.command {
            "DEL" => Command::Del { keys: a.rest_strings()? },
            "EXISTS" => Command::Exists { keys: a.rest_strings()? },
            "EXPIRE" => Command::Expire {
                key: a.string()?,
                seconds: a.int()?,
            },
            "TTL" => Command::Ttl { key: a.string()? },
            "PERSIST" => Command::Persist { key: a.string()? },
            "GET" => Command::Get { key: a.string()? },
            "SET" => Command::Set {
                key: a.string()?,
                value: a.value()?,
            },
            "INCRBY" => {
                let key = a.string()?;
                let delta = if upper == "INCR" { 1 } else { a.int()? };
                Command::IncrBy { key, delta }
            }
            "DECRBY" => {
                let key = a.string()?;
                let delta = if upper == "DECR" { 1 } else { a.int()? };
                Command::DecrBy { key, delta }
            }
            "APPEND" => Command::Append {
                key: a.string()?,
                value: a.string()?,
            },
            "GETRANGE" => Command::GetRange {
                key: a.string()?,
                start: a.int()?,
                end: a.int()?,
            },
            "SETRANGE" => Command::SetRange {
                key: a.string()?,
                offset: a.offset()?,
                value: a.string()?,
            },
            "HSET" => {
                let key = a.string()?;
                let mut fields = Vec::new();
                while !a.is_empty() {
                    fields.push((a.string()?, a.value()?));
                }
                if fields.is_empty() {
                    return Err(a.error("expected at least one field/value pair"));
                }
                Command::HSet { key, fields }
            }
            "HGET" => Command::HGet {
                key: a.string()?,
                field: a.string()?,
            },
            "HMGET" => Command::HMGet {
                key: a.string()?,
                fields: a.rest_strings()?,
            },
            "HDEL" => Command::HDel {
                key: a.string()?,
                fields: a.rest_strings()?,
            },
            "HGETALL" => Command::HGetAll { key: a.string()? },
            "HEXISTS" => Command::HExists {
                key: a.string()?,
                field: a.string()?,
            },
            "HKEYS" => Command::HKeys { key: a.string()? },
            "HVALS" => Command::HVals { key: a.string()? },
            "HLEN" => Command::HLen { key: a.string()? },
            "LPUSH" => Command::LPush {
                key: a.string()?,
                values: a.rest_values()?,
            },
            "RPUSH" => Command::RPush {
                key: a.string()?,
                values: a.rest_values()?,
            },
            "LPOP" => Command::LPop { key: a.string()? },
            "RPOP" => Command::RPop { key: a.string()? },
            "LRANGE" => Command::LRange {
                key: a.string()?,
                start: a.int()?,
                stop: a.int()?,
            },
            "LLEN" => Command::LLen { key: a.string()? },
            "LINDEX" => Command::LIndex {
                key: a.string()?,
                index: a.int()?,
            },
            "LREM" => Command::LRem {
                key: a.string()?,
                count: a.int()?,
                value: a.value()?,
            },
            "SADD" => Command::SAdd {
                key: a.string()?,
                members: a.rest_strings()?,
            },
            "SREM" => Command::SRem {
                key: a.string()?,
                members: a.rest_strings()?,
            },
            "SMEMBERS" => Command::SMembers { key: a.string()? },
            "SISMEMBER" => Command::SIsMember {
                key: a.string()?,
                member: a.string()?,
            },
            "SCARD" => Command::SCard { key: a.string()? },
            "ZADD" => {
                let key = a.string()?;
                let mut members = Vec::new();
                while !a.is_empty() {
                    members.push((a.float()?, a.string()?));
                }
                if members.is_empty() {
                    return Err(a.error("expected at least one score/member pair"));
                }
                Command::ZAdd { key, members }
            }
            "ZREM" => Command::ZRem {
                key: a.string()?,
                members: a.rest_strings()?,
            },
            "ZSCORE" => Command::ZScore {
                key: a.string()?,
                member: a.string()?,
            },
            "ZRANGE" => Command::ZRange {
                key: a.string()?,
                start: a.int()?,
                stop: a.int()?,
                with_scores: a.with_scores()?,
            },
            "ZREVRANGE" => Command::ZRevRange {
                key: a.string()?,
                start: a.int()?,
                stop: a.int()?,
                with_scores: a.with_scores()?,
            },
            "ZINCRBY" => Command::ZIncrBy {
                key: a.string()?,
                delta: a.float()?,
                member: a.string()?,
            },
            "ZRANK" => Command::ZRank {
                key: a.string()?,
                member: a.string()?,
            },
            "ZCARD" => Command::ZCard { key: a.string()? },
            "SETBIT" => Command::SetBit {
                key: a.string()?,
                offset: a.offset()?,
                bit: a.bit()?,
            },
            "GETBIT" => Command::GetBit {
                key: a.string()?,
                offset: a.offset()?,
            },
            "BITCOUNT" => Command::BitCount { key: a.string()? },
            "BITOP" => {
                let name = a.string()?;
                let op = BitOperation::from_name(&name)
                    .ok_or_else(|| a.error(format!("unknown bit operation '{}'", name)))?;
                let dest = a.string()?;
                let keys = a.rest_strings()?;
                if op == BitOperation::Not && keys.len() != 1 {
                    return Err(a.error("NOT takes exactly one source key"));
                }
                Command::BitOp { op, dest, keys }
            }
            "PFADD" => Command::PfAdd {
                key: a.string()?,
                elements: a.rest_strings()?,
            },
            "PFCOUNT" => Command::PfCount {
                keys: a.rest_strings()?,
            },
            "PFMERGE" => Command::PfMerge {
                dest: a.string()?,
                sources: a.rest_strings()?,
            },
            other => {
                return Err(Error::UnknownCommand {
                    name: other.to_string(),
                })
            }
        };

        a.finish()?;
        Ok(cmd)
    }
}

/// Map an upper-cased name (or alias) to the canonical command name.
fn canonical(upper: &str) -> Option<&'static str> {
    const NAMES: &[&str] = &[
        "DEL", "EXISTS", "EXPIRE", "TTL", "PERSIST", "GET", "SET", "INCRBY", "DECRBY", "APPEND",
        "GETRANGE", "SETRANGE", "HSET", "HGET", "HMGET", "HDEL", "HGETALL", "HEXISTS", "HKEYS",
        "HVALS", "HLEN", "LPUSH", "RPUSH", "LPOP", "RPOP", "LRANGE", "LLEN", "LINDEX", "LREM",
        "SADD", "SREM", "SMEMBERS", "SISMEMBER", "SCARD", "ZADD", "ZREM", "ZSCORE", "ZRANGE",
        "ZREVRANGE", "ZINCRBY", "ZRANK", "ZCARD", "SETBIT", "GETBIT", "BITCOUNT", "BITOP", "PFADD",
        "PFCOUNT", "PFMERGE",
    ];
    match upper {
        "INCR" => Some("INCRBY"),
        "DECR" => Some("DECRBY"),
        "DELETE" => Some("DEL"),
        _ => NAMES.iter().copied().find(|n| *n == upper),
    }
}

/// Positional argument cursor used by [`Command::parse`].
struct Args {
    command: &'static str,
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Args {
    fn new(command: &'static str, args: Vec<Value>) -> Self {
        Self {
            command,
            values: args.into_iter(),
            position: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::invalid_arguments(self.command, reason)
    }

    fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    fn next(&mut self) -> Result<Value> {
        self.position += 1;
        let position = self.position;
        self.values
            .next()
            .ok_or_else(|| self.error(format!("missing argument {}", position)))
    }

    fn value(&mut self) -> Result<Value> {
        self.next()
    }

    fn string(&mut self) -> Result<String> {
        match self.next()? {
            Value::String(s) => Ok(s),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Bytes(b) => String::from_utf8(b)
                .map_err(|_| self.error(format!("argument {} is not valid UTF-8", self.position))),
            other => Err(self.error(format!(
                "argument {} must be a string, got {}",
                self.position,
                other.type_name()
            ))),
        }
    }

    fn int(&mut self) -> Result<i64> {
        match self.next()? {
            Value::Int(i) => Ok(i),
            Value::String(s) => s.trim().parse().map_err(|_| {
                self.error(format!("argument {} is not an integer: '{}'", self.position, s))
            }),
            other => Err(self.error(format!(
                "argument {} must be an integer, got {}",
                self.position,
                other.type_name()
            ))),
        }
    }

    fn offset(&mut self) -> Result<usize> {
        let n = self.int()?;
        usize::try_from(n).map_err(|_| self.error(format!("offset must be >= 0, got {}", n)))
    }

    fn bit(&mut self) -> Result<bool> {
        match self.int()? {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(self.error(format!("bit must be 0 or 1, got {}", n))),
        }
    }

    fn float(&mut self) -> Result<f64> {
        match self.next()? {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::String(s) => s.trim().parse().map_err(|_| {
                self.error(format!("argument {} is not a number: '{}'", self.position, s))
            }),
            other => Err(self.error(format!(
                "argument {} must be a number, got {}",
                self.position,
                other.type_name()
            ))),
        }
    }

    fn with_scores(&mut self) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        match self.next()? {
            Value::Bool(b) => Ok(b),
            Value::String(s) if s.eq_ignore_ascii_case("WITHSCORES") => Ok(true),
            other => Err(self.error(format!(
                "expected WITHSCORES flag, got {}",
                other.type_name()
            ))),
        }
    }

    fn rest_strings(&mut self) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(self.values.len());
        while !self.is_empty() {
            out.push(self.string()?);
        }
        if out.is_empty() {
            return Err(self.error("expected at least one argument"));
        }
        Ok(out)
    }

    fn rest_values(&mut self) -> Result<Vec<Value>> {
        let out: Vec<Value> = self.values.by_ref().collect();
        if out.is_empty() {
            return Err(self.error("expected at least one value"));
        }
        Ok(out)
    }

    fn finish(self) -> Result<()> {
        let extra = self.values.len();
        if extra > 0 {
            return Err(self.error(format!("{} unexpected trailing argument(s)", extra)));
        }
        Ok(())
    }
}
