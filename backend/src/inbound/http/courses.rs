//! Course catalogue API handlers.
//!
//! ```text
//! GET /api/v1/courses?courseName=&courseDepartment=&page=&sortField=&sortOrder=
//! POST /api/v1/courses {"courseName":"Maths","department":"Science"}
//! GET /api/v1/courses/{id}
//! PUT /api/v1/courses/{id} {"courseName":"Further Maths"}
//! DELETE /api/v1/courses/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CourseListing, SaveCourseRequest};
use crate::domain::{Course, CourseFilter, CourseId, CourseName, CourseSort, Department, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, blank_field_error, parse_sort_field, parse_sort_order,
};

/// JSON payload for one course.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseBody {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Data Structures")]
    pub course_name: String,
    #[schema(example = "Computer Science")]
    pub department: String,
}

impl From<Course> for CourseBody {
    fn from(course: Course) -> Self {
        Self {
            id: course.id().as_i64(),
            course_name: course.name().as_ref().to_owned(),
            department: course.department().as_ref().to_owned(),
        }
    }
}

/// Query parameters accepted by the course listing.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    /// Exact match on the course title.
    pub course_name: Option<String>,
    /// Exact match on the department.
    pub course_department: Option<String>,
    /// Zero-based page index, default 0.
    pub page: Option<u32>,
    /// Sort column: `courseName`, `department`, or `id`.
    pub sort_field: Option<String>,
    /// Sort direction: `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Response payload for the course listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub courses: Vec<CourseBody>,
    /// Distinct departments across the whole catalogue, for the department
    /// filter control.
    pub departments: Vec<String>,
    /// Zero-based index of the returned page.
    pub page: u32,
    pub total_pages: u32,
    pub sort_field: String,
    pub sort_order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_department: Option<String>,
}

impl CourseListResponse {
    fn new(listing: CourseListing, filters: CourseListQuery, sort: CourseSort) -> Self {
        let CourseListing { page, departments } = listing;
        let page = page.map(CourseBody::from);
        Self {
            courses: page.items,
            departments: departments.iter().map(ToString::to_string).collect(),
            page: page.page,
            total_pages: page.total_pages,
            sort_field: sort.field.to_string(),
            sort_order: sort.direction.to_string(),
            course_name: filters.course_name,
            course_department: filters.course_department,
        }
    }
}

/// Request payload for saving a course.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCourseBody {
    #[schema(example = "Data Structures")]
    pub course_name: String,
    #[schema(example = "Computer Science")]
    pub department: String,
}

/// Request payload for renaming a course.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameCourseBody {
    #[schema(example = "Advanced Data Structures")]
    pub course_name: String,
}

#[derive(Debug, Deserialize)]
struct CoursePath {
    id: i64,
}

fn parse_save_course(payload: SaveCourseBody) -> Result<SaveCourseRequest, Error> {
    let name = CourseName::new(payload.course_name)
        .map_err(|_| blank_field_error(FieldName::new("courseName")))?;
    let department = Department::new(payload.department)
        .map_err(|_| blank_field_error(FieldName::new("department")))?;
    Ok(SaveCourseRequest { name, department })
}

/// List courses matching the optional filters, one page at a time.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(
        ("courseName" = Option<String>, Query, description = "Exact course title filter"),
        ("courseDepartment" = Option<String>, Query, description = "Exact department filter"),
        ("page" = Option<u32>, Query, description = "Zero-based page index, default 0"),
        ("sortField" = Option<String>, Query, description = "Sort column: courseName, department, or id"),
        ("sortOrder" = Option<String>, Query, description = "Sort direction: asc or desc")
    ),
    responses(
        (status = 200, description = "One page of courses", body = CourseListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    query: web::Query<CourseListQuery>,
) -> ApiResult<web::Json<CourseListResponse>> {
    let query = query.into_inner();
    let sort = CourseSort {
        field: parse_sort_field(query.sort_field.as_deref(), FieldName::new("sortField"))?,
        direction: parse_sort_order(query.sort_order.as_deref(), FieldName::new("sortOrder"))?,
    };
    let page = PageRequest::new(query.page.unwrap_or(0));
    let filter = CourseFilter {
        course_name: query.course_name.clone(),
        department: query.course_department.clone(),
    };
    let listing = state.courses.list_courses(filter, page, sort).await?;
    Ok(web::Json(CourseListResponse::new(listing, query, sort)))
}

/// Save a course by title.
///
/// Saving a title that already exists overwrites that course's department
/// and keeps its id, so the catalogue never grows duplicate titles.
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = SaveCourseBody,
    responses(
        (status = 200, description = "Persisted course", body = CourseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "saveCourse"
)]
#[post("/courses")]
pub async fn save_course(
    state: web::Data<HttpState>,
    payload: web::Json<SaveCourseBody>,
) -> ApiResult<web::Json<CourseBody>> {
    let request = parse_save_course(payload.into_inner())?;
    let course = state.courses.save_course(request).await?;
    Ok(web::Json(CourseBody::from(course)))
}

/// Fetch a course by id.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course identifier")
    ),
    responses(
        (status = 200, description = "Course", body = CourseBody),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    path: web::Path<CoursePath>,
) -> ApiResult<web::Json<CourseBody>> {
    let course = state
        .courses
        .get_course(CourseId::new(path.into_inner().id))
        .await?;
    Ok(web::Json(CourseBody::from(course)))
}

/// Rename a course, keeping its department.
///
/// Department edits go through the save path; renaming onto a title that
/// is already taken is a conflict.
#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    request_body = RenameCourseBody,
    params(
        ("id" = i64, Path, description = "Course identifier")
    ),
    responses(
        (status = 200, description = "Renamed course", body = CourseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Title already taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "renameCourse"
)]
#[put("/courses/{id}")]
pub async fn rename_course(
    state: web::Data<HttpState>,
    path: web::Path<CoursePath>,
    payload: web::Json<RenameCourseBody>,
) -> ApiResult<web::Json<CourseBody>> {
    let name = CourseName::new(payload.into_inner().course_name)
        .map_err(|_| blank_field_error(FieldName::new("courseName")))?;
    let course = state
        .courses
        .rename_course(CourseId::new(path.into_inner().id), name)
        .await?;
    Ok(web::Json(CourseBody::from(course)))
}

/// Delete a course together with every enrolment referencing it.
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course identifier")
    ),
    responses(
        (status = 204, description = "Course and its enrolments deleted"),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    path: web::Path<CoursePath>,
) -> ApiResult<HttpResponse> {
    state
        .courses
        .delete_course(CourseId::new(path.into_inner().id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::RosterService;
    use crate::outbound::persistence::in_memory_repositories;

    fn test_state() -> HttpState {
        let (students, courses) = in_memory_repositories();
        let service = Arc::new(RosterService::new(Arc::new(students), Arc::new(courses)));
        HttpState::new(service.clone(), service)
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(test_state())).service(
            web::scope("/api/v1")
                .service(list_courses)
                .service(save_course)
                .service(get_course)
                .service(rename_course)
                .service(delete_course),
        )
    }

    fn save_request(name: &str, department: &str) -> actix_web::test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/courses")
            .set_json(json!({"courseName": name, "department": department}))
    }

    #[actix_web::test]
    async fn save_course_persists_and_returns_camel_case_json() {
        let app = actix_test::init_service(test_app()).await;

        let response =
            actix_test::call_service(&app, save_request("Maths", "Science").to_request()).await;
        assert!(response.status().is_success());
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("course JSON");

        assert_eq!(value.get("id").and_then(Value::as_i64), Some(1));
        assert_eq!(
            value.get("courseName").and_then(Value::as_str),
            Some("Maths")
        );
        assert_eq!(
            value.get("department").and_then(Value::as_str),
            Some("Science")
        );
        assert!(value.get("course_name").is_none());
    }

    #[actix_web::test]
    async fn saving_an_existing_title_overwrites_the_department() {
        let app = actix_test::init_service(test_app()).await;

        let first =
            actix_test::call_service(&app, save_request("Maths", "Science").to_request()).await;
        assert!(first.status().is_success());

        let second =
            actix_test::call_service(&app, save_request("Maths", "Arts").to_request()).await;
        assert!(second.status().is_success());
        let body = actix_test::read_body(second).await;
        let value: Value = serde_json::from_slice(&body).expect("course JSON");
        assert_eq!(value.get("id").and_then(Value::as_i64), Some(1));
        assert_eq!(
            value.get("department").and_then(Value::as_str),
            Some("Arts")
        );

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses")
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(listing).await;
        let value: Value = serde_json::from_slice(&body).expect("listing JSON");
        let courses = value
            .get("courses")
            .and_then(Value::as_array)
            .expect("courses array");
        assert_eq!(courses.len(), 1);
    }

    #[actix_web::test]
    async fn save_course_rejects_blank_titles() {
        let app = actix_test::init_service(test_app()).await;

        let response =
            actix_test::call_service(&app, save_request("   ", "Science").to_request()).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error JSON");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("courseName must not be blank")
        );
        let details = value
            .get("details")
            .and_then(Value::as_object)
            .expect("details present");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("blank_field")
        );
    }

    #[actix_web::test]
    async fn get_course_returns_not_found_for_unknown_ids() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses/999")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error JSON");
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("not_found")
        );
    }

    #[actix_web::test]
    async fn rename_course_keeps_the_department() {
        let app = actix_test::init_service(test_app()).await;

        let created =
            actix_test::call_service(&app, save_request("Maths", "Science").to_request()).await;
        assert!(created.status().is_success());

        let renamed = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/courses/1")
                .set_json(json!({"courseName": "Further Maths"}))
                .to_request(),
        )
        .await;
        assert!(renamed.status().is_success());
        let body = actix_test::read_body(renamed).await;
        let value: Value = serde_json::from_slice(&body).expect("course JSON");
        assert_eq!(
            value.get("courseName").and_then(Value::as_str),
            Some("Further Maths")
        );
        assert_eq!(
            value.get("department").and_then(Value::as_str),
            Some("Science")
        );
    }

    #[actix_web::test]
    async fn renaming_onto_a_taken_title_is_a_conflict() {
        let app = actix_test::init_service(test_app()).await;

        for request in [
            save_request("Maths", "Science"),
            save_request("Physics", "Science"),
        ] {
            let response = actix_test::call_service(&app, request.to_request()).await;
            assert!(response.status().is_success());
        }

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/courses/2")
                .set_json(json!({"courseName": "Maths"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error JSON");
        assert_eq!(value.get("code").and_then(Value::as_str), Some("conflict"));
        let details = value
            .get("details")
            .and_then(Value::as_object)
            .expect("details present");
        assert_eq!(
            details.get("courseName").and_then(Value::as_str),
            Some("Maths")
        );
    }

    #[actix_web::test]
    async fn delete_course_removes_the_record() {
        let app = actix_test::init_service(test_app()).await;

        let created =
            actix_test::call_service(&app, save_request("Maths", "Science").to_request()).await;
        assert!(created.status().is_success());

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/courses/1")
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), actix_web::http::StatusCode::NO_CONTENT);

        let fetched = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses/1")
                .to_request(),
        )
        .await;
        assert_eq!(fetched.status(), actix_web::http::StatusCode::NOT_FOUND);

        let deleted_again = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/courses/1")
                .to_request(),
        )
        .await;
        assert_eq!(
            deleted_again.status(),
            actix_web::http::StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn listing_filters_by_department_and_echoes_the_filter() {
        let app = actix_test::init_service(test_app()).await;

        for request in [
            save_request("Maths", "Science"),
            save_request("Physics", "Science"),
            save_request("Poetry", "Arts"),
        ] {
            let response = actix_test::call_service(&app, request.to_request()).await;
            assert!(response.status().is_success());
        }

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses?courseDepartment=Science")
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("listing JSON");

        let courses = value
            .get("courses")
            .and_then(Value::as_array)
            .expect("courses array");
        assert_eq!(courses.len(), 2);
        // Departments always span the whole catalogue, not the filtered page.
        assert_eq!(
            value.get("departments"),
            Some(&json!(["Arts", "Science"]))
        );
        assert_eq!(
            value.get("courseDepartment").and_then(Value::as_str),
            Some("Science")
        );
        assert_eq!(value.get("sortField").and_then(Value::as_str), Some("courseName"));
        assert_eq!(value.get("sortOrder").and_then(Value::as_str), Some("asc"));
        assert_eq!(value.get("totalPages").and_then(Value::as_u64), Some(1));
    }

    #[actix_web::test]
    async fn listing_rejects_invalid_sort_orders() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses?sortOrder=upwards")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error JSON");
        let details = value
            .get("details")
            .and_then(Value::as_object)
            .expect("details present");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("invalid_sort_order")
        );
        assert_eq!(
            details.get("value").and_then(Value::as_str),
            Some("upwards")
        );
    }
}
