//! Recognised shapes of the traffic and online payloads.
//!
//! Stats endpoints in the wild disagree on their JSON layout. Each payload
//! is classified into one of a small set of shapes, tried in a fixed order,
//! and unknown layouts degrade to empty data.

use std::collections::HashMap;

use hyadm_core::{TrafficSnapshot, UserTraffic};
use serde_json::{Map, Value};

/// Nested keys that may hold the per-user traffic map, in priority order.
pub const TRAFFIC_KEYS: [&str; 5] = ["users", "user", "traffic", "perUser", "userTraffic"];

/// Aggregate counters that share the root object with usernames.
pub const RESERVED_TRAFFIC_KEYS: [&str; 4] = ["tx", "rx", "up", "down"];

/// Keys that may hold a list of online usernames, in priority order.
pub const ONLINE_LIST_KEYS: [&str; 3] = ["users", "online", "usernames"];

const RX_KEYS: [&str; 5] = ["rx", "download", "down", "recv", "receive"];
const TX_KEYS: [&str; 5] = ["tx", "upload", "up", "sent", "send"];

/// One object that may map usernames to traffic counters.
#[derive(Debug, Clone, Copy)]
pub enum TrafficCandidate<'a> {
    Root(&'a Map<String, Value>),
    Nested {
        key: &'static str,
        map: &'a Map<String, Value>,
    },
}

impl<'a> TrafficCandidate<'a> {
    /// Candidates in priority order: the root object, then each nested
    /// object under [`TRAFFIC_KEYS`]. Non-object payloads have none.
    pub fn candidates(payload: &'a Value) -> Vec<Self> {
        let Some(root) = payload.as_object() else {
            return Vec::new();
        };
        let nested = TRAFFIC_KEYS.iter().filter_map(|&key| {
            root.get(key)
                .and_then(Value::as_object)
                .map(|map| Self::Nested { key, map })
        });
        std::iter::once(Self::Root(root)).chain(nested).collect()
    }

    fn map(&self) -> &'a Map<String, Value> {
        match *self {
            Self::Root(map) | Self::Nested { map, .. } => map,
        }
    }

    /// Valid user entries of this candidate.
    pub fn users(&self) -> HashMap<String, UserTraffic> {
        self.map()
            .iter()
            .filter(|(name, _)| !RESERVED_TRAFFIC_KEYS.contains(&name.as_str()))
            .filter_map(|(name, raw)| traffic_entry(raw).map(|t| (name.clone(), t)))
            .collect()
    }
}

/// Per-user traffic from a traffic payload.
///
/// The first candidate yielding at least one valid user wins.
pub fn extract_traffic(payload: &Value) -> HashMap<String, UserTraffic> {
    TrafficCandidate::candidates(payload)
        .iter()
        .map(TrafficCandidate::users)
        .find(|users| !users.is_empty())
        .unwrap_or_default()
}

fn traffic_entry(raw: &Value) -> Option<UserTraffic> {
    let entry = raw.as_object()?;
    let rx = first_count(entry, &RX_KEYS);
    let tx = first_count(entry, &TX_KEYS);
    if rx.is_none() && tx.is_none() {
        return None;
    }
    Some(UserTraffic {
        rx_bytes: rx.unwrap_or(0),
        tx_bytes: tx.unwrap_or(0),
    })
}

/// First of `keys` whose value is a usable byte count.
fn first_count(entry: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find_map(byte_count)
}

/// Interpret a JSON value as a byte count.
///
/// Accepts unsigned integers, non-negative finite floats (truncated) and
/// strings holding either. Negative values count as absent.
pub fn byte_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

/// Shape of an online payload.
#[derive(Debug, Clone, Copy)]
pub enum OnlinePayload<'a> {
    /// `["alice", "bob"]`
    UserList(&'a [Value]),
    /// `{"users": ["alice"]}` under one of [`ONLINE_LIST_KEYS`].
    KeyedList {
        key: &'static str,
        items: &'a [Value],
    },
    /// `{"alice": true, "bob": {"connections": 2}}`
    FlagMap(&'a Map<String, Value>),
    Unrecognized,
}

impl<'a> OnlinePayload<'a> {
    pub fn classify(payload: &'a Value) -> Self {
        match payload {
            Value::Array(items) => Self::UserList(items),
            Value::Object(map) => ONLINE_LIST_KEYS
                .iter()
                .find_map(|&key| match map.get(key) {
                    Some(Value::Array(items)) => Some(Self::KeyedList { key, items }),
                    _ => None,
                })
                .unwrap_or(Self::FlagMap(map)),
            _ => Self::Unrecognized,
        }
    }

    /// Username to online flag.
    pub fn users(&self) -> HashMap<String, bool> {
        match *self {
            Self::UserList(items) | Self::KeyedList { items, .. } => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(|name| (name.to_owned(), true))
                .collect(),
            Self::FlagMap(map) => map
                .iter()
                .filter_map(|(name, raw)| match raw {
                    Value::Bool(flag) => Some((name.clone(), *flag)),
                    Value::Object(_) => Some((name.clone(), true)),
                    _ => None,
                })
                .collect(),
            Self::Unrecognized => HashMap::new(),
        }
    }
}

/// Online flags from an online payload.
pub fn extract_online(payload: &Value) -> HashMap<String, bool> {
    OnlinePayload::classify(payload).users()
}

/// Build a snapshot from the two raw payloads.
pub fn normalize(traffic: &Value, online: &Value) -> TrafficSnapshot {
    TrafficSnapshot {
        users: extract_traffic(traffic),
        online: extract_online(online),
    }
}
