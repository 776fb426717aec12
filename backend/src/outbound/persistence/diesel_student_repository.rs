//! PostgreSQL-backed student repository adapter.
//!
//! Students and their enrolments span two tables; every read hydrates the
//! enrolled courses in a single follow-up query and every mutation touching
//! both tables runs in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{PAGE_SIZE, Page, PageRequest, SortDirection};

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{
    Course, CourseName, FirstName, LastName, Student, StudentDraft, StudentId, StudentListPlan,
    StudentSort, StudentSortField,
};

use super::diesel_course_repository::row_to_course;
use super::diesel_helpers::{
    map_basic_diesel_error, map_basic_pool_error, to_sql_limit, to_sql_offset,
};
use super::models::{CourseRow, EnrollmentRow, NewStudentRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments, students};

/// Diesel-backed implementation of the student repository port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StudentRepositoryError {
    map_basic_pool_error(error, StudentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StudentRepositoryError {
    map_basic_diesel_error(
        error,
        StudentRepositoryError::query,
        StudentRepositoryError::connection,
    )
}

/// Convert a database row and its enrolled courses to a domain student.
fn row_to_student(row: StudentRow, courses: Vec<Course>) -> Result<Student, String> {
    let first_name = FirstName::new(row.first_name).map_err(|e| e.to_string())?;
    let last_name = LastName::new(row.last_name).map_err(|e| e.to_string())?;
    Ok(Student::new(
        StudentId::new(row.id),
        first_name,
        last_name,
        courses,
    ))
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

type BoxedStudents = diesel::dsl::IntoBoxed<
    'static,
    diesel::dsl::Select<students::table, diesel::dsl::AsSelect<StudentRow, Pg>>,
    Pg,
>;

/// Restrict to students enrolled in the course with exactly this title.
fn with_exact_course(query: BoxedStudents, course_name: &str) -> BoxedStudents {
    let enrolled = enrollments::table
        .inner_join(courses::table)
        .filter(courses::course_name.eq(course_name.to_owned()))
        .select(enrollments::student_id);
    query.filter(students::id.eq_any(enrolled))
}

/// Restrict to students enrolled in any course whose title contains the
/// fragment. The IN-subquery lists each student once even when several of
/// their courses match.
fn with_matching_course(query: BoxedStudents, course_name: &str) -> BoxedStudents {
    let enrolled = enrollments::table
        .inner_join(courses::table)
        .filter(courses::course_name.like(contains_pattern(course_name)))
        .select(enrollments::student_id);
    query.filter(students::id.eq_any(enrolled))
}

/// LIKE pattern matching the fragment anywhere in a title, with LIKE
/// metacharacters in the fragment escaped.
fn contains_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn filtered_students(plan: &StudentListPlan) -> BoxedStudents {
    let query = students::table.select(StudentRow::as_select()).into_boxed();
    match plan {
        StudentListPlan::ByFullNameAndCourse {
            first_name,
            last_name,
            course_name,
        } => {
            let query = query
                .filter(students::first_name.eq(first_name.clone()))
                .filter(students::last_name.eq(last_name.clone()));
            with_exact_course(query, course_name)
        }
        StudentListPlan::ByFirstNameAndCourse {
            first_name,
            course_name,
        } => {
            let query = query.filter(students::first_name.eq(first_name.clone()));
            with_exact_course(query, course_name)
        }
        StudentListPlan::ByLastNameAndCourse {
            last_name,
            course_name,
        } => {
            let query = query.filter(students::last_name.eq(last_name.clone()));
            with_exact_course(query, course_name)
        }
        StudentListPlan::ByCourseContains { course_name } => {
            with_matching_course(query, course_name)
        }
        StudentListPlan::ByFullName {
            first_name,
            last_name,
        } => query
            .filter(students::first_name.eq(first_name.clone()))
            .filter(students::last_name.eq(last_name.clone())),
        StudentListPlan::ByFirstName { first_name } => {
            query.filter(students::first_name.eq(first_name.clone()))
        }
        StudentListPlan::ByLastName { last_name } => {
            query.filter(students::last_name.eq(last_name.clone()))
        }
        StudentListPlan::All => query,
    }
}

fn sorted_students(plan: &StudentListPlan, sort: StudentSort) -> BoxedStudents {
    let query = filtered_students(plan);
    let query = match (sort.field, sort.direction) {
        (StudentSortField::FirstName, SortDirection::Asc) => {
            query.order(students::first_name.asc())
        }
        (StudentSortField::FirstName, SortDirection::Desc) => {
            query.order(students::first_name.desc())
        }
        (StudentSortField::LastName, SortDirection::Asc) => {
            query.order(students::last_name.asc())
        }
        (StudentSortField::LastName, SortDirection::Desc) => {
            query.order(students::last_name.desc())
        }
        (StudentSortField::Id, SortDirection::Asc) => query.order(students::id.asc()),
        (StudentSortField::Id, SortDirection::Desc) => query.order(students::id.desc()),
    };
    // Tie-break on id so pagination stays stable across equal sort keys.
    query.then_order_by(students::id.asc())
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

/// Enrolled courses for each listed student, keyed by student id.
async fn load_enrolled_courses(
    conn: &mut AsyncPgConnection,
    student_ids: Vec<i64>,
) -> Result<HashMap<i64, Vec<Course>>, StudentRepositoryError> {
    if student_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, CourseRow)> = enrollments::table
        .inner_join(courses::table)
        .filter(enrollments::student_id.eq_any(student_ids))
        .order(courses::id.asc())
        .select((enrollments::student_id, CourseRow::as_select()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut by_student: HashMap<i64, Vec<Course>> = HashMap::new();
    for (student_id, row) in rows {
        let course = row_to_course(row).map_err(StudentRepositoryError::query)?;
        by_student.entry(student_id).or_default().push(course);
    }
    Ok(by_student)
}

/// Attach enrolled courses to student rows, preserving row order.
async fn hydrate_students(
    conn: &mut AsyncPgConnection,
    rows: Vec<StudentRow>,
) -> Result<Vec<Student>, StudentRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut courses_by_student = load_enrolled_courses(conn, ids).await?;

    let mut students = Vec::with_capacity(rows.len());
    for row in rows {
        let courses = courses_by_student.remove(&row.id).unwrap_or_default();
        let student = row_to_student(row, courses).map_err(StudentRepositoryError::query)?;
        students.push(student);
    }
    Ok(students)
}

/// Insert enrolment rows for the student. No-op for an empty course set.
async fn insert_enrolments(
    conn: &mut AsyncPgConnection,
    student_id: i64,
    course_ids: &[i64],
) -> Result<(), diesel::result::Error> {
    let rows: Vec<EnrollmentRow> = course_ids
        .iter()
        .map(|course_id| EnrollmentRow {
            student_id,
            course_id: *course_id,
        })
        .collect();
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(enrollments::table)
        .values(&rows)
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn list(
        &self,
        plan: &StudentListPlan,
        page: PageRequest,
        sort: StudentSort,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_students(plan)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<StudentRow> = sorted_students(plan, sort)
            .offset(to_sql_offset(page.offset()))
            .limit(to_sql_limit(PAGE_SIZE))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = hydrate_students(&mut conn, rows).await?;
        Ok(Page::from_total(items, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_by_id(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<StudentRow> = students::table
            .filter(students::id.eq(id.as_i64()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut courses_by_student = load_enrolled_courses(&mut conn, vec![row.id]).await?;
        let courses = courses_by_student.remove(&row.id).unwrap_or_default();
        let student = row_to_student(row, courses).map_err(StudentRepositoryError::query)?;
        Ok(Some(student))
    }

    async fn find_by_name(
        &self,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StudentRow> = students::table
            .filter(students::first_name.eq(first_name.as_ref()))
            .filter(students::last_name.eq(last_name.as_ref()))
            .order(students::id.asc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        hydrate_students(&mut conn, rows).await
    }

    async fn find_by_course_name(
        &self,
        course_name: &CourseName,
    ) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let query = with_exact_course(
            students::table.select(StudentRow::as_select()).into_boxed(),
            course_name.as_ref(),
        );
        let rows: Vec<StudentRow> = query
            .order(students::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        hydrate_students(&mut conn, rows).await
    }

    async fn insert(&self, draft: &StudentDraft) -> Result<Student, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewStudentRow {
            first_name: draft.first_name().as_ref(),
            last_name: draft.last_name().as_ref(),
        };
        let course_ids: Vec<i64> = draft
            .courses()
            .iter()
            .map(|course| course.id().as_i64())
            .collect();

        let stored: StudentRow = conn
            .transaction(|conn| {
                async move {
                    let stored: StudentRow = diesel::insert_into(students::table)
                        .values(&new_row)
                        .returning(StudentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    insert_enrolments(conn, stored.id, &course_ids).await?;
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_student(stored, draft.courses().to_vec()).map_err(StudentRepositoryError::query)
    }

    async fn update(&self, student: &Student) -> Result<Student, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let student_id = student.id().as_i64();
        let course_ids: Vec<i64> = student
            .courses()
            .iter()
            .map(|course| course.id().as_i64())
            .collect();

        conn.transaction(|conn| {
            async move {
                let updated_rows =
                    diesel::update(students::table.filter(students::id.eq(student_id)))
                        .set((
                            students::first_name.eq(student.first_name().as_ref()),
                            students::last_name.eq(student.last_name().as_ref()),
                        ))
                        .execute(conn)
                        .await?;
                if updated_rows == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                // Replace the enrolment set wholesale.
                diesel::delete(
                    enrollments::table.filter(enrollments::student_id.eq(student_id)),
                )
                .execute(conn)
                .await?;
                insert_enrolments(conn, student_id, &course_ids).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(student.clone())
    }

    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let student_id = id.as_i64();

        // Enrolments go first so the student row never dangles mid-delete.
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        enrollments::table.filter(enrollments::student_id.eq(student_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(students::table.filter(students::id.eq(student_id)))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("pool exhausted"));

        assert!(matches!(error, StudentRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("pool exhausted"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(error, StudentRepositoryError::Query { .. }));
        assert!(error.to_string().contains("record not found"));
    }

    #[rstest]
    #[case("data", "%data%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn contains_pattern_escapes_like_metacharacters(
        #[case] fragment: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(contains_pattern(fragment), expected);
    }

    #[rstest]
    fn row_to_student_converts_a_row() {
        let row = StudentRow {
            id: 9,
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
        };

        let student = row_to_student(row, Vec::new()).expect("valid student row");

        assert_eq!(student.id(), StudentId::new(9));
        assert_eq!(student.first_name().as_ref(), "Ada");
        assert_eq!(student.last_name().as_ref(), "Lovelace");
        assert!(student.courses().is_empty());
    }

    #[rstest]
    fn row_to_student_rejects_blank_names() {
        let row = StudentRow {
            id: 9,
            first_name: " ".to_owned(),
            last_name: "Lovelace".to_owned(),
        };

        assert!(row_to_student(row, Vec::new()).is_err());
    }
}
