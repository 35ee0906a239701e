//! Canonical local paths.
//!
//! `<dir>/<course_code>/<assignment_name>/<login:name>/<filename>`, every
//! segment passed through the run's [`NameNormalizer`].

use std::path::{Path, PathBuf};

use gradebox_core::{Assignment, Attachment, Course, NameNormalizer, User};

/// Local paths for one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPaths {
    pub assignment_dir: PathBuf,
    pub user_dir: PathBuf,
    pub file: PathBuf,
}

/// Maps remote entities under one course root.
#[derive(Debug, Clone)]
pub struct CourseLayout {
    root: PathBuf,
    normalizer: NameNormalizer,
}

impl CourseLayout {
    pub fn new(dir: &Path, course: &Course, normalizer: NameNormalizer) -> Self {
        Self {
            root: dir.join(normalizer.segment(&course.course_code)),
            normalizer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn attachment(
        &self,
        assignment: &Assignment,
        user: &User,
        attachment: &Attachment,
    ) -> AttachmentPaths {
        let assignment_dir = self.root.join(self.normalizer.segment(&assignment.name));
        let user_dir = assignment_dir.join(self.normalizer.segment(&user.label()));
        let file = user_dir.join(self.normalizer.segment(&attachment.filename));
        AttachmentPaths {
            assignment_dir,
            user_dir,
            file,
        }
    }
}
