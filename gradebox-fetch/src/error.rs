//! Error types for gradebox-fetch.

use thiserror::Error;

/// Transport and protocol failures. None of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or similar failure before a status was received.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Any response outside 2xx.
    #[error("GET {url} returned {status}: {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },

    /// The response advertised more pages.
    #[error("partial result from {url}: more pages are available; refusing to proceed with missing data")]
    Partial { url: String },

    /// JSON was requested but the response is some other content type.
    #[error("response from {url} is not JSON (content type {content_type:?})")]
    NotJson { url: String, content_type: String },

    #[error("error decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error reading response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
