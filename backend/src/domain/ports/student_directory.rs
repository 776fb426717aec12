//! Driving port for student workflows.
//!
//! Inbound adapters call [`StudentDirectory`] to list, fetch, save, and
//! delete students. The save operation carries the merge semantics
//! described on [`StudentDirectory::save_student`].

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::course::{Course, CourseId, CourseName};
use crate::domain::error::Error;
use crate::domain::listing::{StudentFilter, StudentSort};
use crate::domain::student::{FirstName, LastName, Student, StudentId};

/// Validated payload for creating or replacing a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStudentRequest {
    pub first_name: FirstName,
    pub last_name: LastName,
    /// Courses to enrol the student in; every id must name an existing
    /// course.
    pub course_ids: Vec<CourseId>,
}

/// One page of the student listing plus the full course catalogue, which
/// the listing view needs to render its course filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentListing {
    pub page: Page<Student>,
    pub courses: Vec<Course>,
}

/// Driving port exposing student workflows to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// One page of students matching the filters.
    async fn list_students(
        &self,
        filter: StudentFilter,
        page: PageRequest,
        sort: StudentSort,
    ) -> Result<StudentListing, Error>;

    /// Fetch a student by id.
    async fn get_student(&self, id: StudentId) -> Result<Student, Error>;

    /// Save a student, merging rather than inserting when a student with
    /// the same full name is already enrolled in every requested course.
    /// The merge survivor keeps its id; otherwise a new record is created.
    async fn save_student(&self, request: SaveStudentRequest) -> Result<Student, Error>;

    /// Replace an existing student's names and enrolment set.
    async fn replace_student(
        &self,
        id: StudentId,
        request: SaveStudentRequest,
    ) -> Result<Student, Error>;

    /// Delete a student and their enrolments.
    async fn delete_student(&self, id: StudentId) -> Result<(), Error>;

    /// Students enrolled in the course with exactly this title, ordered
    /// by id.
    async fn students_in_course(&self, course_name: CourseName) -> Result<Vec<Student>, Error>;
}
