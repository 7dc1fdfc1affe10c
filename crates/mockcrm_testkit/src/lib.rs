//! # MockCRM Testkit
//!
//! Test utilities for the mock CRM.
//!
//! This crate provides:
//! - Seeded service fixtures and common scenarios
//! - Property-based test generators using proptest
//! - Concurrent stress helpers and store invariant checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mockcrm_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_service() {
//!     with_service(|service| {
//!         assert_eq!(service.len(), 50);
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
