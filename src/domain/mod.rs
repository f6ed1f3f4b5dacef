//! Domain layer for the LCP node audit
//!
//! Architecture: Domain Model - Pure data and error vocabulary for audits
//! - Contains the input artifacts, the audit result value objects and the metadata contract
//! - Independent of catalogs, configuration files and output formats

pub mod artifacts;
pub mod audit;

// Re-export main domain types for convenience
pub use artifacts::*;
pub use audit::*;
