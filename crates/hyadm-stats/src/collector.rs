//! Best-effort merge of telemetry onto known users.

use std::collections::BTreeMap;

use hyadm_core::{TrafficSnapshot, UserStats};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::traits::StatsSource;

/// Per-user stats for exactly `usernames`.
///
/// Never fails: an unreachable, slow, malformed or canceled source yields
/// offline users with zero traffic.
pub async fn collect_user_stats<S, N>(
    source: &S,
    usernames: &[N],
    cancel: &CancellationToken,
) -> BTreeMap<String, UserStats>
where
    S: StatsSource + ?Sized,
    N: AsRef<str>,
{
    let snapshot = if source.is_enabled() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("stats query canceled");
                TrafficSnapshot::empty()
            }
            result = source.fetch() => match result {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "traffic stats unavailable");
                    TrafficSnapshot::empty()
                }
            },
        }
    } else {
        TrafficSnapshot::empty()
    };
    snapshot.stats_for(usernames)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hyadm_core::UserTraffic;

    use super::*;
    use crate::error::StatsError;
    use crate::traits::DisabledStatsSource;

    struct Fixed(TrafficSnapshot);

    #[async_trait]
    impl StatsSource for Fixed {
        async fn fetch(&self) -> Result<TrafficSnapshot, StatsError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl StatsSource for Failing {
        async fn fetch(&self) -> Result<TrafficSnapshot, StatsError> {
            Err(StatsError::Status {
                url: "http://stats/traffic".into(),
                status: 500,
            })
        }
    }

    struct Hanging;

    #[async_trait]
    impl StatsSource for Hanging {
        async fn fetch(&self) -> Result<TrafficSnapshot, StatsError> {
            std::future::pending().await
        }
    }

    fn names() -> Vec<String> {
        vec!["alice".into(), "bob".into()]
    }

    #[tokio::test]
    async fn test_merge_onto_usernames() {
        let mut snapshot = TrafficSnapshot::empty();
        snapshot.users.insert(
            "alice".into(),
            UserTraffic {
                rx_bytes: 120,
                tx_bytes: 80,
            },
        );
        snapshot.users.insert("mallory".into(), UserTraffic::default());
        snapshot.online.insert("alice".into(), true);

        let stats = collect_user_stats(&Fixed(snapshot), &names(), &CancellationToken::new()).await;
        assert_eq!(stats.keys().collect::<Vec<_>>(), ["alice", "bob"]);
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
    }

    #[tokio::test]
    async fn test_failure_degrades_to_zero() {
        let stats = collect_user_stats(&Failing, &names(), &CancellationToken::new()).await;
        assert_eq!(stats.len(), 2);
        assert!(stats.values().all(|s| *s == UserStats::default()));
    }

    #[tokio::test]
    async fn test_cancel_degrades_to_zero() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stats = collect_user_stats(&Hanging, &["alice"], &cancel).await;
        assert_eq!(stats["alice"], UserStats::default());
    }

    #[tokio::test]
    async fn test_disabled_source_not_queried() {
        let stats = collect_user_stats(&DisabledStatsSource, &["alice"], &CancellationToken::new()).await;
        assert_eq!(stats["alice"], UserStats::default());
    }
}
