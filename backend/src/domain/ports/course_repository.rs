//! Port for course persistence.
//!
//! The [`CourseRepository`] trait defines the contract for the course
//! catalogue. The unique course name constraint is owned by the adapters,
//! which surface violations as [`CourseRepositoryError::DuplicateName`].

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::course::{Course, CourseDraft, CourseId, CourseName};
use crate::domain::listing::{CourseListPlan, CourseSort};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "course repository query failed: {message}",
        /// The unique course name constraint was violated.
        DuplicateName { name: String } =>
            "course name `{name}` already exists",
    }
}

/// Port for course storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// One page of courses matching the plan.
    async fn list(
        &self,
        plan: &CourseListPlan,
        page: PageRequest,
        sort: CourseSort,
    ) -> Result<Page<Course>, CourseRepositoryError>;

    /// Fetch a course by id. Returns `None` when the id is unknown.
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// Fetch a course by its unique title.
    async fn find_by_name(
        &self,
        name: &CourseName,
    ) -> Result<Option<Course>, CourseRepositoryError>;

    /// Every course ordered by id, for enrolment resolution and the
    /// course filter control.
    async fn find_all(&self) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Persist a new course, returning the stored record with its
    /// assigned id.
    async fn insert(&self, draft: &CourseDraft) -> Result<Course, CourseRepositoryError>;

    /// Overwrite a course's title and department.
    async fn update(&self, course: &Course) -> Result<Course, CourseRepositoryError>;

    /// Delete a course after removing every enrolment referencing it, in
    /// one transaction. Returns `false` when the id is unknown.
    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError>;
}
