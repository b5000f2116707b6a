//! Traffic and online-state types produced by the stats endpoint.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Byte counters for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserTraffic {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Normalized view of one telemetry query. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficSnapshot {
    pub users: HashMap<String, UserTraffic>,
    pub online: HashMap<String, bool>,
}

impl TrafficSnapshot {
    /// An empty snapshot, used whenever the stats source is unavailable.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.online.is_empty()
    }

    /// Merge the snapshot onto a list of known usernames.
    ///
    /// The result covers exactly `usernames`; anyone missing from the
    /// snapshot is offline with zero traffic.
    pub fn stats_for<I, S>(&self, usernames: I) -> BTreeMap<String, UserStats>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        usernames
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                let traffic = self.users.get(name).copied().unwrap_or_default();
                let online = self.online.get(name).copied().unwrap_or(false);
                (name.to_owned(), UserStats::new(online, traffic))
            })
            .collect()
    }
}

/// Per-user statistics shown to operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub online: bool,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub total_bytes: u64,
}

impl UserStats {
    pub fn new(online: bool, traffic: UserTraffic) -> Self {
        Self {
            online,
            rx_bytes: traffic.rx_bytes,
            tx_bytes: traffic.tx_bytes,
            total_bytes: traffic.rx_bytes.saturating_add(traffic.tx_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_for_fills_missing_users() {
        let mut snapshot = TrafficSnapshot::empty();
        snapshot.users.insert(
            "alice".into(),
            UserTraffic {
                rx_bytes: 120,
                tx_bytes: 80,
            },
        );
        snapshot.online.insert("alice".into(), true);
        snapshot.online.insert("mallory".into(), true);

        let stats = snapshot.stats_for(["alice", "bob"]);
        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats["alice"],
            UserStats {
                online: true,
                rx_bytes: 120,
                tx_bytes: 80,
                total_bytes: 200,
            }
        );
        assert_eq!(stats["bob"], UserStats::default());
        assert!(!stats.contains_key("mallory"));
    }

    #[test]
    fn test_total_saturates() {
        let stats = UserStats::new(
            false,
            UserTraffic {
                rx_bytes: u64::MAX,
                tx_bytes: 1,
            },
        );
        assert_eq!(stats.total_bytes, u64::MAX);
    }
}
