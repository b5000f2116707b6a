//! Stats source trait.

use std::sync::Arc;

use async_trait::async_trait;
use hyadm_core::TrafficSnapshot;

use crate::error::StatsError;

/// Anything that can report per-user traffic and online state.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch one snapshot.
    async fn fetch(&self) -> Result<TrafficSnapshot, StatsError>;

    /// Whether this source can report anything at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

#[async_trait]
impl<S: StatsSource + ?Sized> StatsSource for Arc<S> {
    #[inline]
    async fn fetch(&self) -> Result<TrafficSnapshot, StatsError> {
        (**self).fetch().await
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

/// Source used when telemetry is switched off. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStatsSource;

#[async_trait]
impl StatsSource for DisabledStatsSource {
    async fn fetch(&self) -> Result<TrafficSnapshot, StatsError> {
        Ok(TrafficSnapshot::empty())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
