//! Session adapter
//!
//! The session is the external collaborator that completed the SMART launch
//! and owns the transport. This module defines the interface emrlink
//! consumes ([`SessionHandle`], [`SmartLauncher`]) and ships one
//! implementation over HTTP ([`HttpSession`], [`StaticLauncher`]).

pub mod http;
pub mod launcher;
mod traits;

pub use http::HttpSession;
pub use launcher::StaticLauncher;
pub use traits::{RequestOptions, SessionHandle, SmartLauncher};
