//! C++ front end for makogen
//!
//! This crate lists the public members of every class and struct declared
//! directly inside one namespace of a set of C++ sources. Preprocessor
//! conditionals are resolved against the configured `-D`/`-U` flags.
//!
//! # Example
//!
//! ```rust
//! use makogen_api::MemberLister;
//! use makogen_cpp::CppLister;
//! use std::path::Path;
//!
//! let lister = CppLister::new();
//!
//! let source = r#"
//!     namespace PlayPG {
//!     struct Location {
//!         int x;
//!         int y;
//!     };
//!     }
//! "#;
//!
//! let summaries = lister.list_source(source, Path::new("Location.hpp")).unwrap();
//! assert_eq!(summaries[0].to_string(), "Location: x,y");
//! ```

mod extractor;
mod lister_impl;
pub mod preprocessor;
mod visitor;

pub use lister_impl::CppLister;
pub use preprocessor::MacroTable;
pub use visitor::Access;
