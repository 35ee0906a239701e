//! Typed endpoints of the LMS REST API.

use serde::de::DeserializeOwned;

use gradebox_core::{Assignment, AssignmentId, Attachment, Course, CourseId, Submission};

use crate::{FetchError, Fetcher};

/// Listing page size. Large enough that a course never paginates; a
/// paginated response is an error, not a continuation.
pub const PAGE_SIZE: u32 = 1000;

/// Endpoint builder and typed decoder over a [`Fetcher`].
pub struct CanvasApi<F> {
    endpoint: String,
    fetcher: F,
}

impl<F: Fetcher> CanvasApi<F> {
    pub fn new(endpoint: impl Into<String>, fetcher: F) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { endpoint, fetcher }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn course_url(&self, course: CourseId) -> String {
        format!("{}/api/v1/courses/{course}", self.endpoint)
    }

    pub fn assignments_url(&self, course: CourseId) -> String {
        format!(
            "{}/api/v1/courses/{course}/assignments?per_page={PAGE_SIZE}",
            self.endpoint
        )
    }

    pub fn submissions_url(&self, course: CourseId, assignment: AssignmentId) -> String {
        format!(
            "{}/api/v1/courses/{course}/assignments/{assignment}/submissions?include[]=user&per_page={PAGE_SIZE}",
            self.endpoint
        )
    }

    pub fn course(&self, course: CourseId) -> Result<Course, FetchError> {
        self.get(&self.course_url(course))
    }

    pub fn assignments(&self, course: CourseId) -> Result<Vec<Assignment>, FetchError> {
        self.get(&self.assignments_url(course))
    }

    /// Submissions with their embedded user records.
    pub fn submissions(
        &self,
        course: CourseId,
        assignment: AssignmentId,
    ) -> Result<Vec<Submission>, FetchError> {
        self.get(&self.submissions_url(course, assignment))
    }

    /// Raw content of an attachment. Length is not checked here.
    pub fn download(&self, attachment: &Attachment) -> Result<Vec<u8>, FetchError> {
        self.fetcher.get_bytes(&attachment.url)
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let value = self.fetcher.get_json(url)?;
        serde_json::from_value(value).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
