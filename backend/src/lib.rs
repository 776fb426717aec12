//! Roster backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by API tooling.
pub use doc::ApiDoc;
/// Request-scoped trace identifier shared by logs and error payloads.
pub use domain::TraceId;
/// Trace middleware re-exported for server wiring.
pub use middleware::Trace;
