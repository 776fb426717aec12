//! PostgreSQL-backed course catalogue adapter.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{PAGE_SIZE, Page, PageRequest, SortDirection};

use crate::domain::ports::{CourseRepository, CourseRepositoryError};
use crate::domain::{
    Course, CourseDraft, CourseId, CourseListPlan, CourseName, CourseSort, CourseSortField,
    Department,
};

use super::diesel_helpers::{
    collect_rows, map_basic_diesel_error, map_basic_pool_error, map_write_diesel_error,
    to_sql_limit, to_sql_offset,
};
use super::models::{CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

/// Diesel-backed implementation of the course repository port.
///
/// The unique course title constraint lives in the `courses.course_name`
/// unique index; violations surface as
/// [`CourseRepositoryError::DuplicateName`].
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    map_basic_pool_error(error, CourseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CourseRepositoryError {
    map_basic_diesel_error(
        error,
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

fn map_save_error(error: diesel::result::Error, name: &CourseName) -> CourseRepositoryError {
    map_write_diesel_error(
        error,
        || CourseRepositoryError::duplicate_name(name.as_ref()),
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

/// Convert a database row to a domain course.
pub(crate) fn row_to_course(row: CourseRow) -> Result<Course, String> {
    let name = CourseName::new(row.course_name).map_err(|e| e.to_string())?;
    let department = Department::new(row.department).map_err(|e| e.to_string())?;
    Ok(Course::new(CourseId::new(row.id), name, department))
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

type BoxedCourses = diesel::dsl::IntoBoxed<
    'static,
    diesel::dsl::Select<courses::table, diesel::dsl::AsSelect<CourseRow, Pg>>,
    Pg,
>;

fn filtered_courses(plan: &CourseListPlan) -> BoxedCourses {
    let query = courses::table.select(CourseRow::as_select()).into_boxed();
    match plan {
        CourseListPlan::ByNameAndDepartment {
            course_name,
            department,
        } => query
            .filter(courses::course_name.eq(course_name.clone()))
            .filter(courses::department.eq(department.clone())),
        CourseListPlan::ByName { course_name } => {
            query.filter(courses::course_name.eq(course_name.clone()))
        }
        CourseListPlan::ByDepartment { department } => {
            query.filter(courses::department.eq(department.clone()))
        }
        CourseListPlan::All => query,
    }
}

fn sorted_courses(plan: &CourseListPlan, sort: CourseSort) -> BoxedCourses {
    let query = filtered_courses(plan);
    let query = match (sort.field, sort.direction) {
        (CourseSortField::CourseName, SortDirection::Asc) => {
            query.order(courses::course_name.asc())
        }
        (CourseSortField::CourseName, SortDirection::Desc) => {
            query.order(courses::course_name.desc())
        }
        (CourseSortField::Department, SortDirection::Asc) => {
            query.order(courses::department.asc())
        }
        (CourseSortField::Department, SortDirection::Desc) => {
            query.order(courses::department.desc())
        }
        (CourseSortField::Id, SortDirection::Asc) => query.order(courses::id.asc()),
        (CourseSortField::Id, SortDirection::Desc) => query.order(courses::id.desc()),
    };
    // Tie-break on id so pagination stays stable across equal sort keys.
    query.then_order_by(courses::id.asc())
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn list(
        &self,
        plan: &CourseListPlan,
        page: PageRequest,
        sort: CourseSort,
    ) -> Result<Page<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_courses(plan)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<CourseRow> = sorted_courses(plan, sort)
            .offset(to_sql_offset(page.offset()))
            .limit(to_sql_limit(PAGE_SIZE))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = collect_rows(
            rows.into_iter().map(row_to_course),
            CourseRepositoryError::query,
        )?;
        Ok(Page::from_total(items, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CourseRow> = courses::table
            .filter(courses::id.eq(id.as_i64()))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_course)
            .transpose()
            .map_err(CourseRepositoryError::query)
    }

    async fn find_by_name(
        &self,
        name: &CourseName,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CourseRow> = courses::table
            .filter(courses::course_name.eq(name.as_ref()))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_course)
            .transpose()
            .map_err(CourseRepositoryError::query)
    }

    async fn find_all(&self) -> Result<Vec<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CourseRow> = courses::table
            .select(CourseRow::as_select())
            .order(courses::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(
            rows.into_iter().map(row_to_course),
            CourseRepositoryError::query,
        )
    }

    async fn insert(&self, draft: &CourseDraft) -> Result<Course, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCourseRow {
            course_name: draft.name().as_ref(),
            department: draft.department().as_ref(),
        };

        let stored: CourseRow = diesel::insert_into(courses::table)
            .values(&new_row)
            .returning(CourseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_save_error(error, draft.name()))?;

        row_to_course(stored).map_err(CourseRepositoryError::query)
    }

    async fn update(&self, course: &Course) -> Result<Course, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows =
            diesel::update(courses::table.filter(courses::id.eq(course.id().as_i64())))
                .set((
                    courses::course_name.eq(course.name().as_ref()),
                    courses::department.eq(course.department().as_ref()),
                ))
                .execute(&mut conn)
                .await
                .map_err(|error| map_save_error(error, course.name()))?;

        if updated_rows == 0 {
            return Err(CourseRepositoryError::query("course not found for update"));
        }
        Ok(course.clone())
    }

    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let course_id = id.as_i64();

        // Enrolments go first so the course row never dangles mid-delete.
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        enrollments::table.filter(enrollments::course_id.eq(course_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(courses::table.filter(courses::id.eq(course_id)))
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
        let error = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(error, CourseRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(error, CourseRepositoryError::Query { .. }));
        assert!(error.to_string().contains("record not found"));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_name() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let name = CourseName::new("Maths").expect("valid course name");
        let diesel_error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );

        let error = map_save_error(diesel_error, &name);

        assert_eq!(error, CourseRepositoryError::duplicate_name("Maths"));
    }

    #[rstest]
    fn row_to_course_converts_a_row() {
        let row = CourseRow {
            id: 3,
            course_name: "Databases".to_owned(),
            department: "Engineering".to_owned(),
        };

        let course = row_to_course(row).expect("valid course row");

        assert_eq!(course.id(), CourseId::new(3));
        assert_eq!(course.name().as_ref(), "Databases");
        assert_eq!(course.department().as_ref(), "Engineering");
    }

    #[rstest]
    fn row_to_course_rejects_blank_titles() {
        let row = CourseRow {
            id: 3,
            course_name: "   ".to_owned(),
            department: "Engineering".to_owned(),
        };

        assert!(row_to_course(row).is_err());
    }
}
