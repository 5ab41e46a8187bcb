/// Router Module Index
///
/// Organizes the HTTP surface the browser shell talks to. Nothing here is
/// session-gated: access control happens client-side in the content loader,
/// and the server only hands out templates and read-only route metadata.

/// Liveness probe and the template resource contract (`/views/*`).
pub mod public;

/// Read-only JSON describing the route table and navigation bars.
pub mod api;
