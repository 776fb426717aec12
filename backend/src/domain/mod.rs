//! Domain primitives, ports, and services.
//!
//! Purpose: define strongly typed entities for students and courses, the
//! listing plans that drive their tables, and the ports bounding the
//! hexagon. Keep types immutable and document invariants and edge cases in
//! each type's Rustdoc.

pub mod course;
pub mod error;
pub mod listing;
pub mod ports;
pub mod roster_service;
pub mod student;
pub mod trace_id;

pub use self::course::{
    Course, CourseDraft, CourseId, CourseName, CourseValidationError, Department,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::listing::{
    CourseFilter, CourseListPlan, CourseSort, CourseSortField, SortFieldParseError, StudentFilter,
    StudentListPlan, StudentSort, StudentSortField, course_plan, student_plan,
};
pub use self::roster_service::RosterService;
pub use self::student::{
    FirstName, LastName, Student, StudentDraft, StudentId, StudentValidationError,
};
pub use self::trace_id::TraceId;
