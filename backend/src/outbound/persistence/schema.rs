//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Students known to the roster.
    ///
    /// Names are not unique; distinct people may share a full name.
    students (id) {
        /// Primary key: sequence-assigned identifier.
        id -> Int8,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
    }
}

diesel::table! {
    /// Course catalogue.
    courses (id) {
        /// Primary key: sequence-assigned identifier.
        id -> Int8,
        /// Course title; unique across the catalogue.
        course_name -> Varchar,
        /// Department offering the course.
        department -> Varchar,
    }
}

diesel::table! {
    /// Join table linking students to the courses they are enrolled in.
    enrollments (student_id, course_id) {
        /// Enrolled student.
        student_id -> Int8,
        /// Course the student takes.
        course_id -> Int8,
    }
}

diesel::joinable!(enrollments -> students (student_id));
diesel::joinable!(enrollments -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(students, courses, enrollments);
