//! # gradebox-fetch
//!
//! Authenticated, all-or-nothing access to the LMS REST API.
//!
//! [`HttpFetcher`] issues blocking GETs and refuses partial (paginated)
//! listings. [`CanvasApi`] builds endpoint URLs and decodes typed records on
//! top of any [`Fetcher`].

pub mod api;
pub mod error;
pub mod http;

pub use api::{CanvasApi, PAGE_SIZE};
pub use error::FetchError;
pub use http::{has_next_page, is_json_content_type, HttpFetcher};

/// A source of remote resources.
///
/// Implementations must fail rather than return a truncated listing.
pub trait Fetcher {
    /// GET `url` and decode a JSON body.
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;

    /// GET `url` and return the raw body.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        (**self).get_json(url)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get_bytes(url)
    }
}
