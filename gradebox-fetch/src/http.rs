//! Blocking HTTP fetcher over `ureq`.
//!
//! Every request:
//! 1. carries `Authorization: Bearer <token>`;
//! 2. fails on any non-2xx status;
//! 3. fails if the `Link` header advertises a `rel="next"` page;
//! 4. decodes JSON only when the content type says so.

use std::io::Read;

use gradebox_core::Credentials;

use crate::{FetchError, Fetcher};

/// Pagination marker inside a `Link` header.
const NEXT_PAGE_REL: &str = "rel=\"next\"";

/// Authenticated GET client. Sequential; one request at a time.
pub struct HttpFetcher {
    agent: ureq::Agent,
    authorization: String,
}

impl HttpFetcher {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            authorization: credentials.authorization(),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, FetchError> {
        tracing::debug!("GET {url}");
        let response = match self
            .agent
            .get(url)
            .set("Authorization", &self.authorization)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                    status_text: response.status_text().to_string(),
                });
            }
            Err(other) => {
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    source: Box::new(other),
                });
            }
        };

        if !(200..300).contains(&response.status()) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
                status_text: response.status_text().to_string(),
            });
        }

        if has_next_page(response.header("Link")) {
            tracing::warn!("while downloading {url}");
            return Err(FetchError::Partial {
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self.get(url)?;
        let content_type = response.header("Content-Type").unwrap_or_default().to_string();
        if !is_json_content_type(&content_type) {
            return Err(FetchError::NotJson {
                url: url.to_string(),
                content_type,
            });
        }
        serde_json::from_reader(response.into_reader()).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url)?;
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;
        Ok(body)
    }
}

/// Whether a `Link` header value advertises another page.
pub fn has_next_page(link: Option<&str>) -> bool {
    link.is_some_and(|value| value.contains(NEXT_PAGE_REL))
}

/// Whether a `Content-Type` header value declares JSON.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_detected_among_other_rels() {
        let link = r#"<https://lms.example/api/v1/courses/1/assignments?page=1>; rel="current",<https://lms.example/api/v1/courses/1/assignments?page=2>; rel="next",<https://lms.example/api/v1/courses/1/assignments?page=1>; rel="first""#;
        assert!(has_next_page(Some(link)));
    }

    #[test]
    fn last_page_link_is_not_partial() {
        let link = r#"<https://lms.example/x?page=1>; rel="current",<https://lms.example/x?page=1>; rel="last""#;
        assert!(!has_next_page(Some(link)));
        assert!(!has_next_page(None));
    }

    #[test]
    fn json_content_type_with_charset() {
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(!is_json_content_type("application/pdf"));
        assert!(!is_json_content_type(""));
    }
}
