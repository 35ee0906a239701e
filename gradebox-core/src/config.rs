//! Run configuration.
//!
//! Built once by the binary and passed by reference into the fetcher and the
//! sync pipeline. Nothing here is process-global.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::filter::SubmissionFilter;
use crate::normalize::NameNormalizer;
use crate::types::CourseId;

/// Environment variable holding the API bearer token.
pub const TOKEN_ENV: &str = "CANVAS_TOKEN";

/// Environment variable overriding the API endpoint.
pub const ENDPOINT_ENV: &str = "CANVAS_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://dixie.instructure.com";

/// Bearer credential. `Debug` never shows the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Rejects an empty token.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken { var: TOKEN_ENV });
        }
        Ok(Self { token })
    }

    /// Read the token from [`TOKEN_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_ENV).ok_or(ConfigError::MissingToken { var: TOKEN_ENV })?;
        Self::new(token)
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Where and how to reach the remote API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub credentials: Credentials,
}

impl ApiConfig {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            credentials,
        }
    }
}

/// One sync run over one course.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub course_id: CourseId,
    /// Directory the course root is created under.
    pub dir: PathBuf,
    /// Report intended actions without touching the filesystem.
    pub dry_run: bool,
    pub normalizer: NameNormalizer,
    pub filter: SubmissionFilter,
}

impl SyncConfig {
    pub fn new(course_id: CourseId, dir: impl Into<PathBuf>) -> Self {
        Self {
            course_id,
            dir: dir.into(),
            dry_run: false,
            normalizer: NameNormalizer::default(),
            filter: SubmissionFilter::default(),
        }
    }
}
