//! Builders for the HTTP state backing the roster endpoints.

use std::sync::Arc;

use actix_web::web;

use backend::domain::RosterService;
use backend::domain::ports::{CourseCatalog, StudentDirectory};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DieselCourseRepository, DieselStudentRepository, in_memory_repositories,
};

use super::ServerConfig;

/// Build the shared HTTP state, selecting PostgreSQL-backed repositories when
/// a pool is configured and the in-memory roster otherwise.
///
/// One [`RosterService`] serves both driving ports so student and course
/// operations observe the same store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(RosterService::new(
                Arc::new(DieselStudentRepository::new(pool.clone())),
                Arc::new(DieselCourseRepository::new(pool.clone())),
            ));
            HttpState::new(
                service.clone() as Arc<dyn StudentDirectory>,
                service as Arc<dyn CourseCatalog>,
            )
        }
        None => {
            let (students, courses) = in_memory_repositories();
            let service = Arc::new(RosterService::new(Arc::new(students), Arc::new(courses)));
            HttpState::new(
                service.clone() as Arc<dyn StudentDirectory>,
                service as Arc<dyn CourseCatalog>,
            )
        }
    };

    web::Data::new(state)
}
