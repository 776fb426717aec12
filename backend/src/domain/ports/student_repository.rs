//! Port for student persistence.
//!
//! The [`StudentRepository`] trait defines the contract for storing and
//! querying students together with their enrolments. Adapters implement it
//! over durable storage (PostgreSQL) or in memory.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::course::CourseName;
use crate::domain::listing::{StudentListPlan, StudentSort};
use crate::domain::student::{FirstName, LastName, Student, StudentDraft, StudentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "student repository query failed: {message}",
    }
}

/// Port for student storage and retrieval.
///
/// Every returned [`Student`] carries its full course list. Mutations that
/// touch both the student row and its enrolment rows are atomic: adapters
/// persist both or neither.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// One page of students matching the plan.
    async fn list(
        &self,
        plan: &StudentListPlan,
        page: PageRequest,
        sort: StudentSort,
    ) -> Result<Page<Student>, StudentRepositoryError>;

    /// Fetch a student by id. Returns `None` when the id is unknown.
    async fn find_by_id(&self, id: StudentId)
    -> Result<Option<Student>, StudentRepositoryError>;

    /// All students with exactly this full name, ordered by id.
    async fn find_by_name(
        &self,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> Result<Vec<Student>, StudentRepositoryError>;

    /// All students enrolled in the course with exactly this title,
    /// ordered by id.
    async fn find_by_course_name(
        &self,
        course_name: &CourseName,
    ) -> Result<Vec<Student>, StudentRepositoryError>;

    /// Persist a new student and their enrolments, returning the stored
    /// record with its assigned id.
    async fn insert(&self, draft: &StudentDraft) -> Result<Student, StudentRepositoryError>;

    /// Overwrite the student's names and replace their enrolment set.
    async fn update(&self, student: &Student) -> Result<Student, StudentRepositoryError>;

    /// Delete a student and their enrolments. Returns `false` when the id
    /// is unknown.
    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_carries_the_message() {
        let error = StudentRepositoryError::connection("pool exhausted");
        assert_eq!(
            error.to_string(),
            "student repository connection failed: pool exhausted"
        );
    }

    #[test]
    fn query_error_carries_the_message() {
        let error = StudentRepositoryError::query("relation missing");
        assert_eq!(
            error.to_string(),
            "student repository query failed: relation missing"
        );
    }
}
