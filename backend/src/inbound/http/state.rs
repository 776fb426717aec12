//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CourseCatalog, StudentDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub students: Arc<dyn StudentDirectory>,
    pub courses: Arc<dyn CourseCatalog>,
}

impl HttpState {
    /// Construct state from the two driving ports.
    pub fn new(students: Arc<dyn StudentDirectory>, courses: Arc<dyn CourseCatalog>) -> Self {
        Self { students, courses }
    }
}
