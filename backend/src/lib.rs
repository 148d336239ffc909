//! Community garden administration backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-tracing middleware attaching a `Trace-Id` header to responses.
pub use middleware::trace::Trace;
