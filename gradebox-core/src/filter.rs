//! Operator-supplied match terms over submissions.

use crate::types::{Assignment, User};

/// Joins searchable fields so no term can match across a field boundary
/// unless it contains the delimiter itself.
const FIELD_DELIMITER: &str = ",";

/// AND-combined, case-insensitive substring terms.
///
/// A submission matches when every term occurs in its assignment name,
/// assignment description, or the submitter's login, name, short name or
/// email. No terms matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    terms: Vec<String>,
}

impl SubmissionFilter {
    /// Terms are case-folded on construction.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// First term not found for this submission, or `None` when all match.
    pub fn first_mismatch(&self, assignment: &Assignment, user: &User) -> Option<&str> {
        if self.terms.is_empty() {
            return None;
        }
        let haystack = [
            assignment.name.as_str(),
            assignment.description.as_str(),
            user.login_id.as_str(),
            user.name.as_str(),
            user.short_name.as_str(),
            user.email.as_str(),
        ]
        .join(FIELD_DELIMITER)
        .to_lowercase();

        self.terms
            .iter()
            .find(|term| !haystack.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, assignment: &Assignment, user: &User) -> bool {
        self.first_mismatch(assignment, user).is_none()
    }
}
