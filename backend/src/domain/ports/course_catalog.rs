//! Driving port for course catalogue workflows.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::course::{Course, CourseId, CourseName, Department};
use crate::domain::error::Error;
use crate::domain::listing::{CourseFilter, CourseSort};

/// Validated payload for saving a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCourseRequest {
    pub name: CourseName,
    pub department: Department,
}

/// One page of the course listing plus the distinct departments, which
/// the listing view needs to render its department filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListing {
    pub page: Page<Course>,
    pub departments: Vec<Department>,
}

/// Driving port exposing course catalogue workflows to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// One page of courses matching the filters.
    async fn list_courses(
        &self,
        filter: CourseFilter,
        page: PageRequest,
        sort: CourseSort,
    ) -> Result<CourseListing, Error>;

    /// Fetch a course by id.
    async fn get_course(&self, id: CourseId) -> Result<Course, Error>;

    /// Save a course by title: when a course with the same title already
    /// exists its department is overwritten and its id kept, otherwise a
    /// new course is created.
    async fn save_course(&self, request: SaveCourseRequest) -> Result<Course, Error>;

    /// Rename an existing course, keeping its department. Renaming onto a
    /// title that is already taken is a conflict.
    async fn rename_course(&self, id: CourseId, name: CourseName) -> Result<Course, Error>;

    /// Delete a course together with every enrolment referencing it.
    async fn delete_course(&self, id: CourseId) -> Result<(), Error>;
}
