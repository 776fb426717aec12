//! Students API handlers.
//!
//! ```text
//! GET /api/v1/students?firstName=&lastName=&courseName=&page=&sortField=&sortOrder=
//! POST /api/v1/students {"firstName":"Ada","lastName":"Lovelace","courseIds":[1]}
//! GET /api/v1/students/{id}
//! PUT /api/v1/students/{id}
//! DELETE /api/v1/students/{id}
//! GET /api/v1/students/by-course/{courseName}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{SaveStudentRequest, StudentListing};
use crate::domain::{
    CourseId, CourseName, Error, FirstName, LastName, Student, StudentFilter, StudentId,
    StudentSort,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::courses::CourseBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, blank_field_error, parse_sort_field, parse_sort_order,
};

/// JSON payload for one student.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Courses the student is enrolled in, ordered by course id.
    pub courses: Vec<CourseBody>,
}

impl From<Student> for StudentBody {
    fn from(student: Student) -> Self {
        Self {
            id: student.id().as_i64(),
            first_name: student.first_name().as_ref().to_owned(),
            last_name: student.last_name().as_ref().to_owned(),
            courses: student
                .courses()
                .iter()
                .cloned()
                .map(CourseBody::from)
                .collect(),
        }
    }
}

/// Query parameters accepted by the student listing.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListQuery {
    /// Exact match on the given name.
    pub first_name: Option<String>,
    /// Exact match on the family name.
    pub last_name: Option<String>,
    /// Substring match on enrolled course titles.
    pub course_name: Option<String>,
    /// Zero-based page index, default 0.
    pub page: Option<u32>,
    /// Sort column: `firstName`, `lastName`, or `id`.
    pub sort_field: Option<String>,
    /// Sort direction: `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Response payload for the student listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListResponse {
    pub students: Vec<StudentBody>,
    /// Full course catalogue, for the course filter control.
    pub courses: Vec<CourseBody>,
    /// Zero-based index of the returned page.
    pub page: u32,
    pub total_pages: u32,
    pub sort_field: String,
    pub sort_order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
}

impl StudentListResponse {
    fn new(listing: StudentListing, filters: StudentListQuery, sort: StudentSort) -> Self {
        let StudentListing { page, courses } = listing;
        let page = page.map(StudentBody::from);
        Self {
            students: page.items,
            courses: courses.into_iter().map(CourseBody::from).collect(),
            page: page.page,
            total_pages: page.total_pages,
            sort_field: sort.field.to_string(),
            sort_order: sort.direction.to_string(),
            first_name: filters.first_name,
            last_name: filters.last_name,
            course_name: filters.course_name,
        }
    }
}

/// Request payload for creating or replacing a student.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveStudentBody {
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Ids of courses to enrol the student in; may be empty.
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct StudentPath {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CourseNamePath {
    course_name: String,
}

fn parse_save_student(payload: SaveStudentBody) -> Result<SaveStudentRequest, Error> {
    let first_name = FirstName::new(payload.first_name)
        .map_err(|_| blank_field_error(FieldName::new("firstName")))?;
    let last_name = LastName::new(payload.last_name)
        .map_err(|_| blank_field_error(FieldName::new("lastName")))?;
    Ok(SaveStudentRequest {
        first_name,
        last_name,
        course_ids: payload.course_ids.into_iter().map(CourseId::new).collect(),
    })
}

/// List students matching the optional filters, one page at a time.
///
/// With only `courseName` present the filter matches enrolled course
/// titles by substring; combined with a name it requires the exact title.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(
        ("firstName" = Option<String>, Query, description = "Exact given name filter"),
        ("lastName" = Option<String>, Query, description = "Exact family name filter"),
        ("courseName" = Option<String>, Query, description = "Course title filter"),
        ("page" = Option<u32>, Query, description = "Zero-based page index, default 0"),
        ("sortField" = Option<String>, Query, description = "Sort column: firstName, lastName, or id"),
        ("sortOrder" = Option<String>, Query, description = "Sort direction: asc or desc")
    ),
    responses(
        (status = 200, description = "One page of students", body = StudentListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(
    state: web::Data<HttpState>,
    query: web::Query<StudentListQuery>,
) -> ApiResult<web::Json<StudentListResponse>> {
    let query = query.into_inner();
    let sort = StudentSort {
        field: parse_sort_field(query.sort_field.as_deref(), FieldName::new("sortField"))?,
        direction: parse_sort_order(query.sort_order.as_deref(), FieldName::new("sortOrder"))?,
    };
    let page = PageRequest::new(query.page.unwrap_or(0));
    let filter = StudentFilter {
        first_name: query.first_name.clone(),
        last_name: query.last_name.clone(),
        course_name: query.course_name.clone(),
    };
    let listing = state.students.list_students(filter, page, sort).await?;
    Ok(web::Json(StudentListResponse::new(listing, query, sort)))
}

/// Save a student.
///
/// When a student with the same full name is already enrolled in every
/// requested course, the save merges into that record instead of creating
/// a duplicate: the existing id is kept and the course sets are unioned.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = SaveStudentBody,
    responses(
        (status = 200, description = "Persisted student", body = StudentBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "A course id does not exist", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "saveStudent"
)]
#[post("/students")]
pub async fn save_student(
    state: web::Data<HttpState>,
    payload: web::Json<SaveStudentBody>,
) -> ApiResult<web::Json<StudentBody>> {
    let request = parse_save_student(payload.into_inner())?;
    let student = state.students.save_student(request).await?;
    Ok(web::Json(StudentBody::from(student)))
}

/// Fetch a student by id.
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(
        ("id" = i64, Path, description = "Student identifier")
    ),
    responses(
        (status = 200, description = "Student", body = StudentBody),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudent"
)]
#[get("/students/{id}")]
pub async fn get_student(
    state: web::Data<HttpState>,
    path: web::Path<StudentPath>,
) -> ApiResult<web::Json<StudentBody>> {
    let student = state
        .students
        .get_student(StudentId::new(path.into_inner().id))
        .await?;
    Ok(web::Json(StudentBody::from(student)))
}

/// Overwrite a student's names and replace their course set wholesale.
#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    request_body = SaveStudentBody,
    params(
        ("id" = i64, Path, description = "Student identifier")
    ),
    responses(
        (status = 200, description = "Updated student", body = StudentBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "updateStudent"
)]
#[put("/students/{id}")]
pub async fn update_student(
    state: web::Data<HttpState>,
    path: web::Path<StudentPath>,
    payload: web::Json<SaveStudentBody>,
) -> ApiResult<web::Json<StudentBody>> {
    let request = parse_save_student(payload.into_inner())?;
    let student = state
        .students
        .replace_student(StudentId::new(path.into_inner().id), request)
        .await?;
    Ok(web::Json(StudentBody::from(student)))
}

/// Delete a student and their enrolments.
#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(
        ("id" = i64, Path, description = "Student identifier")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[delete("/students/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    path: web::Path<StudentPath>,
) -> ApiResult<HttpResponse> {
    state
        .students
        .delete_student(StudentId::new(path.into_inner().id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List every student enrolled in the course with exactly this title.
#[utoipa::path(
    get,
    path = "/api/v1/students/by-course/{courseName}",
    params(
        ("courseName" = String, Path, description = "Exact course title")
    ),
    responses(
        (status = 200, description = "Students enrolled in the course", body = [StudentBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudentsByCourse"
)]
#[get("/students/by-course/{course_name}")]
pub async fn students_by_course(
    state: web::Data<HttpState>,
    path: web::Path<CourseNamePath>,
) -> ApiResult<web::Json<Vec<StudentBody>>> {
    let name = CourseName::new(path.into_inner().course_name)
        .map_err(|_| blank_field_error(FieldName::new("courseName")))?;
    let students = state.students.students_in_course(name).await?;
    Ok(web::Json(
        students.into_iter().map(StudentBody::from).collect(),
    ))
}
