//! External integrations
//!
//! - [`session`] - the authenticated SMART session and its HTTP implementation
//! - [`emr`] - vendor variants and the vendor-aware client

pub mod emr;
pub mod session;
