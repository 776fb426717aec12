//! Configuration shared between the server binary and its tests.

use backend::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Runtime configuration for [`create_server`](super::create_server).
///
/// Carries the listen address and, when PostgreSQL is configured, the
/// connection pool backing the repositories. Without a pool the server
/// serves the in-memory roster instead.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Create a configuration listening on `bind_addr` with no database pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a PostgreSQL pool so the roster persists across restarts.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
