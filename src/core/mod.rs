//! Vendor dispatch and resource hydration core.
//!
//! - [`resolver`] - classify the EMR vendor behind a session or token
//! - [`endpoints`] - per-vendor OAuth and FHIR endpoint sets
//! - [`transform`] - canonical <-> session resource shapes
//! - [`hydrate`] - patient/encounter/author context enrichment
//!
//! Nothing in here performs I/O of its own. Hydration suspends only on the
//! session's deferred identifier resolution.

pub mod endpoints;
pub mod hydrate;
pub mod resolver;
pub mod transform;
