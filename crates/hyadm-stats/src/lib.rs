//! Traffic and online-state telemetry for Hysteria users.
//!
//! The stats endpoint is advisory. [`collect_user_stats`] turns whatever it
//! returns (or fails to return) into per-user statistics without ever
//! failing, so credential management never waits on telemetry.

mod client;
mod collector;
mod error;
pub mod shape;
mod traits;

pub use client::{HttpStatsSource, StatsSettings, stats_source};
pub use collector::collect_user_stats;
pub use error::StatsError;
pub use shape::{OnlinePayload, TrafficCandidate, normalize};
pub use traits::{DisabledStatsSource, StatsSource};
