//! makogen Lister API
//!
//! Shared trait and types for listing the public members of classes declared
//! inside one namespace of a code base.
//!
//! This crate defines:
//!
//! - **MemberLister trait**: The interface a language front end implements
//! - **DeclarationSummary**: One class/struct with its public member names
//! - **Configuration**: Target namespace, compiler arguments, limits
//! - **Output**: Text and JSON rendering of summaries
//! - **Error handling**: The error enum every front end reports through
//!
//! # Example
//!
//! ```rust,ignore
//! use makogen_api::{DeclarationSummary, ListerConfig, ListerError, MemberLister};
//! use std::path::Path;
//!
//! struct MyLister {
//!     config: ListerConfig,
//! }
//!
//! impl MemberLister for MyLister {
//!     fn language(&self) -> &str {
//!         "mylang"
//!     }
//!
//!     fn list_source(&self, source: &str, file_path: &Path)
//!         -> Result<Vec<DeclarationSummary>, ListerError> {
//!         // Implementation here
//!         todo!()
//!     }
//!
//!     fn config(&self) -> &ListerConfig {
//!         &self.config
//!     }
//! }
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod output;
pub mod traits;

// Re-export commonly used types
pub use config::{ListerConfig, DEFAULT_NAMESPACE};
pub use entities::DeclarationSummary;
pub use errors::{ListerError, ListerResult};
pub use output::{render, OutputFormat};
pub use traits::MemberLister;
