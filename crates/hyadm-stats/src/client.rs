//! HTTP stats source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hyadm_core::{DEFAULT_STATS_TIMEOUT_SECS, TrafficSnapshot};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

use crate::error::StatsError;
use crate::shape;
use crate::traits::{DisabledStatsSource, StatsSource};

/// Connection settings for the stats endpoint.
#[derive(Debug, Clone, Default)]
pub struct StatsSettings {
    pub enabled: bool,
    /// Base URL; `/traffic` and `/online` are appended.
    pub url: String,
    /// Sent verbatim as the `Authorization` header when non-empty.
    pub secret: String,
    /// Per-request timeout. Zero means the default of two seconds.
    pub timeout: Duration,
}

/// Build the source described by `settings`.
///
/// Returns a [`DisabledStatsSource`] when stats are off or no URL is set.
pub fn stats_source(settings: &StatsSettings) -> Result<Arc<dyn StatsSource>, StatsError> {
    if !settings.enabled || settings.url.trim().is_empty() {
        return Ok(Arc::new(DisabledStatsSource));
    }
    Ok(Arc::new(HttpStatsSource::new(
        &settings.url,
        &settings.secret,
        settings.timeout,
    )?))
}

/// Reads `<base>/traffic` and `<base>/online` from a Hysteria stats endpoint.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    base: String,
    secret: String,
    client: reqwest::Client,
}

impl HttpStatsSource {
    pub fn new(
        base_url: impl AsRef<str>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StatsError> {
        let timeout = if timeout.is_zero() {
            Duration::from_secs(DEFAULT_STATS_TIMEOUT_SECS)
        } else {
            timeout
        };
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StatsError::Client)?;
        Ok(Self {
            base: base_url.as_ref().trim().trim_end_matches('/').to_owned(),
            secret: secret.into(),
            client,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, StatsError> {
        let url = format!("{}/{endpoint}", self.base);
        let mut request = self.client.get(&url);
        if !self.secret.is_empty() {
            request = request.header(AUTHORIZATION, &self.secret);
        }

        let response = request.send().await.map_err(|source| StatsError::Request {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| StatsError::Request {
            url: url.clone(),
            source,
        })?;
        debug!(url = %url, bytes = body.len(), "fetched stats payload");
        serde_json::from_slice(&body).map_err(|source| StatsError::Decode { url, source })
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch(&self) -> Result<TrafficSnapshot, StatsError> {
        let (traffic, online) = tokio::join!(self.get_json("traffic"), self.get_json("online"));
        Ok(shape::normalize(&traffic?, &online?))
    }
}
