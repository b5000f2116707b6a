//! Stats source error types.

/// Error fetching telemetry.
///
/// These never reach operators directly: the collector logs them and
/// substitutes an empty snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
