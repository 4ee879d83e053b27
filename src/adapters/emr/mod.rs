//! EMR vendor adapters
//!
//! Vendor variants, their header policies, and the [`EmrClient`] built on
//! top of them.

pub mod client;
pub mod headers;
pub mod vendor;

pub use client::EmrClient;
pub use headers::{merge_headers, HeaderRule, VendorHeader, FHIR_JSON};
pub use vendor::{
    vendor_for, AthenaPracticeVendor, AthenaVendor, CernerVendor, EcwVendor, EmrVendor,
    EpicVendor, SmartVendor,
};
