// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: Postgres and catalog-service adapters
// - presentation: HTTP handlers and routing
// - application: ports, use cases and resilience policies
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
