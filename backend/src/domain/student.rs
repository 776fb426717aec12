//! Student data model.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::course::{Course, CourseId};

/// Validation errors for student field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyFirstName,
    EmptyLastName,
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
        }
    }
}

impl std::error::Error for StudentValidationError {}

/// Database identifier for a persisted student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(i64);

impl StudentId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Student's given name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirstName(String);

impl FirstName {
    /// Validate and construct a [`FirstName`].
    pub fn new(name: impl Into<String>) -> Result<Self, StudentValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StudentValidationError::EmptyFirstName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for FirstName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FirstName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FirstName> for String {
    fn from(value: FirstName) -> Self {
        value.0
    }
}

/// Student's family name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LastName(String);

impl LastName {
    /// Validate and construct a [`LastName`].
    pub fn new(name: impl Into<String>) -> Result<Self, StudentValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StudentValidationError::EmptyLastName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for LastName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LastName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LastName> for String {
    fn from(value: LastName) -> Self {
        value.0
    }
}

/// Persisted student together with the courses they are enrolled in.
///
/// ## Invariants
/// - `courses` holds no duplicate course ids and is ordered by course id;
///   the constructor normalises its input.
/// - Two persisted students are the same record iff their ids are equal.
///   Names carry no uniqueness, so distinct records may share a full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    first_name: FirstName,
    last_name: LastName,
    courses: Vec<Course>,
}

impl Student {
    /// Build a [`Student`] from validated components, normalising the
    /// enrolment list.
    pub fn new(
        id: StudentId,
        first_name: FirstName,
        last_name: LastName,
        courses: Vec<Course>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            courses: normalise_courses(courses),
        }
    }

    /// Database identifier.
    pub const fn id(&self) -> StudentId {
        self.id
    }

    /// Given name.
    pub const fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    /// Family name.
    pub const fn last_name(&self) -> &LastName {
        &self.last_name
    }

    /// Courses the student is enrolled in, ordered by course id.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Ids of the enrolled courses.
    pub fn course_ids(&self) -> BTreeSet<CourseId> {
        self.courses.iter().map(Course::id).collect()
    }

    /// True when the student is already enrolled in every given course.
    ///
    /// An empty set is trivially covered.
    pub fn enrolled_in_all(&self, course_ids: &BTreeSet<CourseId>) -> bool {
        course_ids.is_subset(&self.course_ids())
    }
}

/// Student payload that has not been persisted yet, so it carries no
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    first_name: FirstName,
    last_name: LastName,
    courses: Vec<Course>,
}

impl StudentDraft {
    /// Build a [`StudentDraft`] from validated components, normalising the
    /// enrolment list.
    pub fn new(first_name: FirstName, last_name: LastName, courses: Vec<Course>) -> Self {
        Self {
            first_name,
            last_name,
            courses: normalise_courses(courses),
        }
    }

    /// Given name.
    pub const fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    /// Family name.
    pub const fn last_name(&self) -> &LastName {
        &self.last_name
    }

    /// Courses to enrol the student in, ordered by course id.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }
}

fn normalise_courses(mut courses: Vec<Course>) -> Vec<Course> {
    courses.sort_by_key(Course::id);
    courses.dedup_by_key(|course| course.id());
    courses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseName, Department};

    fn course(id: i64, name: &str) -> Course {
        Course::new(
            CourseId::new(id),
            CourseName::new(name).expect("test names are non-empty"),
            Department::new("Science").expect("test departments are non-empty"),
        )
    }

    fn names() -> (FirstName, LastName) {
        (
            FirstName::new("Ada").expect("non-empty"),
            LastName::new("Lovelace").expect("non-empty"),
        )
    }

    #[test]
    fn constructor_orders_and_dedupes_enrolments() {
        let (first, last) = names();
        let student = Student::new(
            StudentId::new(1),
            first,
            last,
            vec![course(3, "Physics"), course(1, "Maths"), course(3, "Physics")],
        );

        let ids: Vec<i64> = student
            .courses()
            .iter()
            .map(|c| c.id().as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn enrolled_in_all_checks_subset() {
        let (first, last) = names();
        let student = Student::new(
            StudentId::new(1),
            first,
            last,
            vec![course(1, "Maths"), course(2, "Physics")],
        );

        let subset: BTreeSet<CourseId> = [CourseId::new(1)].into_iter().collect();
        let superset: BTreeSet<CourseId> =
            [CourseId::new(1), CourseId::new(9)].into_iter().collect();

        assert!(student.enrolled_in_all(&subset));
        assert!(student.enrolled_in_all(&BTreeSet::new()));
        assert!(!student.enrolled_in_all(&superset));
    }

    #[test]
    fn first_name_rejects_blank_input() {
        assert_eq!(
            FirstName::new("  "),
            Err(StudentValidationError::EmptyFirstName)
        );
    }

    #[test]
    fn last_name_rejects_blank_input() {
        assert_eq!(LastName::new(""), Err(StudentValidationError::EmptyLastName));
    }
}
