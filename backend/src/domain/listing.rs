//! Listing plans and sort parameters for the student and course tables.
//!
//! Listing filters are optional and a blank (all-whitespace) value counts
//! as absent. Every combination of present filters maps to exactly one
//! query plan, so plan selection is an exhaustive match and repositories
//! never see the raw optional parameters.

use std::fmt;
use std::str::FromStr;

use pagination::SortDirection;

/// Optional filters accepted by the student listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Exact match on the given name.
    pub first_name: Option<String>,
    /// Exact match on the family name.
    pub last_name: Option<String>,
    /// Substring match on enrolled course titles.
    pub course_name: Option<String>,
}

/// Query plan for the student listing, one variant per combination of
/// present filters.
///
/// Filter values are carried verbatim, untrimmed; blank values never reach
/// a plan because [`student_plan`] treats them as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentListPlan {
    /// Both names and a course filter.
    ByFullNameAndCourse {
        first_name: String,
        last_name: String,
        course_name: String,
    },
    /// Given name and a course filter.
    ByFirstNameAndCourse {
        first_name: String,
        course_name: String,
    },
    /// Family name and a course filter.
    ByLastNameAndCourse {
        last_name: String,
        course_name: String,
    },
    /// Course filter alone; matches enrolled course titles by substring
    /// and lists each matching student once.
    ByCourseContains { course_name: String },
    /// Both names, no course filter.
    ByFullName {
        first_name: String,
        last_name: String,
    },
    /// Given name alone.
    ByFirstName { first_name: String },
    /// Family name alone.
    ByLastName { last_name: String },
    /// No filters.
    All,
}

/// Select the student listing plan for the given filters.
pub fn student_plan(filter: &StudentFilter) -> StudentListPlan {
    let first_name = provided(filter.first_name.as_deref());
    let last_name = provided(filter.last_name.as_deref());
    let course_name = provided(filter.course_name.as_deref());

    match (first_name, last_name, course_name) {
        (Some(first), Some(last), Some(course)) => StudentListPlan::ByFullNameAndCourse {
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            course_name: course.to_owned(),
        },
        (Some(first), None, Some(course)) => StudentListPlan::ByFirstNameAndCourse {
            first_name: first.to_owned(),
            course_name: course.to_owned(),
        },
        (None, Some(last), Some(course)) => StudentListPlan::ByLastNameAndCourse {
            last_name: last.to_owned(),
            course_name: course.to_owned(),
        },
        (None, None, Some(course)) => StudentListPlan::ByCourseContains {
            course_name: course.to_owned(),
        },
        (Some(first), Some(last), None) => StudentListPlan::ByFullName {
            first_name: first.to_owned(),
            last_name: last.to_owned(),
        },
        (Some(first), None, None) => StudentListPlan::ByFirstName {
            first_name: first.to_owned(),
        },
        (None, Some(last), None) => StudentListPlan::ByLastName {
            last_name: last.to_owned(),
        },
        (None, None, None) => StudentListPlan::All,
    }
}

/// Optional filters accepted by the course listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Exact match on the course title.
    pub course_name: Option<String>,
    /// Exact match on the department.
    pub department: Option<String>,
}

/// Query plan for the course listing, one variant per combination of
/// present filters. All matches are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseListPlan {
    ByNameAndDepartment {
        course_name: String,
        department: String,
    },
    ByName { course_name: String },
    ByDepartment { department: String },
    All,
}

/// Select the course listing plan for the given filters.
pub fn course_plan(filter: &CourseFilter) -> CourseListPlan {
    let course_name = provided(filter.course_name.as_deref());
    let department = provided(filter.department.as_deref());

    match (course_name, department) {
        (Some(name), Some(department)) => CourseListPlan::ByNameAndDepartment {
            course_name: name.to_owned(),
            department: department.to_owned(),
        },
        (Some(name), None) => CourseListPlan::ByName {
            course_name: name.to_owned(),
        },
        (None, Some(department)) => CourseListPlan::ByDepartment {
            department: department.to_owned(),
        },
        (None, None) => CourseListPlan::All,
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Raised when a sort field parameter names an unknown column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFieldParseError {
    value: String,
}

impl SortFieldParseError {
    fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The rejected value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for SortFieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort field `{}`", self.value)
    }
}

impl std::error::Error for SortFieldParseError {}

/// Sortable columns of the student listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentSortField {
    /// Given name, the listing default.
    #[default]
    FirstName,
    LastName,
    Id,
}

impl FromStr for StudentSortField {
    type Err = SortFieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "id" => Ok(Self::Id),
            other => Err(SortFieldParseError::new(other)),
        }
    }
}

impl fmt::Display for StudentSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Id => "id",
        };
        f.write_str(label)
    }
}

/// Sort applied to the student listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentSort {
    pub field: StudentSortField,
    pub direction: SortDirection,
}

/// Sortable columns of the course listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CourseSortField {
    /// Course title, the listing default.
    #[default]
    CourseName,
    Department,
    Id,
}

impl FromStr for CourseSortField {
    type Err = SortFieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "courseName" => Ok(Self::CourseName),
            "department" => Ok(Self::Department),
            "id" => Ok(Self::Id),
            other => Err(SortFieldParseError::new(other)),
        }
    }
}

impl fmt::Display for CourseSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CourseName => "courseName",
            Self::Department => "department",
            Self::Id => "id",
        };
        f.write_str(label)
    }
}

/// Sort applied to the course listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseSort {
    pub field: CourseSortField,
    pub direction: SortDirection,
}
