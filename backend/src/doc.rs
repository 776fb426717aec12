//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (students, courses,
//!   health)
//! - **Schemas**: Request and response bodies for the roster endpoints plus
//!   the wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) that document domain
//!   error types without coupling them to the utoipa framework
//!
//! The generated specification is served at `/api-docs/openapi.json` in debug
//! builds and exported via `cargo run --bin openapi-dump` for external
//! tooling.

use crate::inbound::http::courses::{
    CourseBody, CourseListResponse, RenameCourseBody, SaveCourseBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::students::{SaveStudentBody, StudentBody, StudentListResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Served at `/api-docs/openapi.json` in debug builds and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster backend API",
        description = "HTTP interface for managing students, courses, and enrolments, plus health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::save_student,
        crate::inbound::http::students::get_student,
        crate::inbound::http::students::update_student,
        crate::inbound::http::students::delete_student,
        crate::inbound::http::students::students_by_course,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::save_course,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::rename_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        StudentBody,
        SaveStudentBody,
        StudentListResponse,
        CourseBody,
        SaveCourseBody,
        RenameCourseBody,
        CourseListResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "students", description = "Operations on students and their enrolments"),
        (name = "courses", description = "Operations on the course catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
