//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{courses, enrollments, students};

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Insertable struct for creating new student records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

// ---------------------------------------------------------------------------
// Course models
// ---------------------------------------------------------------------------

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i64,
    pub course_name: String,
    pub department: String,
}

/// Insertable struct for creating new course records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub course_name: &'a str,
    pub department: &'a str,
}

// ---------------------------------------------------------------------------
// Enrollment models
// ---------------------------------------------------------------------------

/// Row struct for reading from and inserting into the enrollments join table.
#[derive(Debug, Clone, Copy, Queryable, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct EnrollmentRow {
    pub student_id: i64,
    pub course_id: i64,
}
