use thiserror::Error;

/// Failures of a single outbound JSON request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("timeout after {timeout_ms}ms for {url}")]
    Timeout { url: String, timeout_ms: u128 },

    /// Final response was not 2xx. `snippet` holds at most 300 chars of the body.
    #[error("HTTP {status} for {url} :: {snippet}")]
    HttpStatus {
        status: u16,
        url: String,
        snippet: String,
    },

    #[error("bad JSON from {url} :: {snippet}")]
    Parse { url: String, snippet: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failures of a profile source adapter.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No endpoint variant produced a response to report.
    #[error("primary source exhausted for {slug}")]
    Exhausted { slug: String },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid channel slug \"{0}\"")]
    InvalidSlug(String),
}
