//! Course data model.

use std::fmt;

/// Validation errors for course field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    EmptyCourseName,
    EmptyDepartment,
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCourseName => write!(f, "course name must not be empty"),
            Self::EmptyDepartment => write!(f, "department must not be empty"),
        }
    }
}

impl std::error::Error for CourseValidationError {}

/// Database identifier for a persisted course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseId(i64);

impl CourseId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Course title, unique across the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseName(String);

impl CourseName {
    /// Validate and construct a [`CourseName`].
    pub fn new(name: impl Into<String>) -> Result<Self, CourseValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourseValidationError::EmptyCourseName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for CourseName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CourseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CourseName> for String {
    fn from(value: CourseName) -> Self {
        value.0
    }
}

/// Department offering a course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Department(String);

impl Department {
    /// Validate and construct a [`Department`].
    pub fn new(department: impl Into<String>) -> Result<Self, CourseValidationError> {
        let department = department.into();
        if department.trim().is_empty() {
            return Err(CourseValidationError::EmptyDepartment);
        }
        Ok(Self(department))
    }
}

impl AsRef<str> for Department {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.0
    }
}

/// Persisted course.
///
/// ## Invariants
/// - `name` is unique across the catalogue; the persistence adapters
///   enforce it.
/// - Two persisted courses are the same record iff their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: CourseName,
    department: Department,
}

impl Course {
    /// Build a [`Course`] from validated components.
    pub const fn new(id: CourseId, name: CourseName, department: Department) -> Self {
        Self {
            id,
            name,
            department,
        }
    }

    /// Database identifier.
    pub const fn id(&self) -> CourseId {
        self.id
    }

    /// Unique course title.
    pub const fn name(&self) -> &CourseName {
        &self.name
    }

    /// Department offering the course.
    pub const fn department(&self) -> &Department {
        &self.department
    }
}

/// Course payload that has not been persisted yet, so it carries no
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    name: CourseName,
    department: Department,
}

impl CourseDraft {
    /// Build a [`CourseDraft`] from validated components.
    pub const fn new(name: CourseName, department: Department) -> Self {
        Self { name, department }
    }

    /// Unique course title.
    pub const fn name(&self) -> &CourseName {
        &self.name
    }

    /// Department offering the course.
    pub const fn department(&self) -> &Department {
        &self.department
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_name_rejects_blank_input() {
        assert_eq!(
            CourseName::new("   "),
            Err(CourseValidationError::EmptyCourseName)
        );
    }

    #[test]
    fn department_rejects_blank_input() {
        assert_eq!(
            Department::new(""),
            Err(CourseValidationError::EmptyDepartment)
        );
    }

    #[test]
    fn course_name_keeps_input_verbatim() {
        let name = CourseName::new(" Algorithms ").expect("padded names are allowed");
        assert_eq!(name.as_ref(), " Algorithms ");
    }
}
