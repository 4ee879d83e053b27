//! Domain models and types for emrlink.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Vendor classification** ([`VendorTag`], [`EndpointSet`])
//! - **Resource shapes** ([`Resource`], [`SessionResource`], [`Reference`], [`Period`])
//! - **Token inputs** ([`TokenClaims`])
//! - **Error types** ([`EmrError`], [`SessionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, EmrError>`]:
//!
//! ```rust
//! use emrlink::domain::{EmrError, Result, VendorTag};
//! use emrlink::core::endpoints::endpoints_for;
//!
//! fn example() -> Result<()> {
//!     let epic = endpoints_for(VendorTag::Epic)?;
//!     assert!(epic.r4.ends_with("/R4/"));
//!
//!     let smart = endpoints_for(VendorTag::Smart);
//!     assert!(matches!(smart, Err(EmrError::UnsupportedVendor(_))));
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod errors;
pub mod resource;
pub mod result;
pub mod token;
pub mod vendor;

pub use errors::{EmrError, SessionError};
pub use resource::{ContextKind, Period, Reference, Resource, SessionResource};
pub use result::Result;
pub use token::TokenClaims;
pub use vendor::{EndpointSet, VendorTag};
