//! Core library for docsite
//!
//! This crate implements the **Functional Core** of the docsite application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The docsite project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`docsite_core`** (this crate): Pure view-model shaping with zero I/O
//! - **`docsite`**: Data access, HTML rendering, and the HTTP server (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`directory`]: Two-level directory tree of the packages and modules under a unit
//! - [`pagination`]: Offsets, neighbouring pages, and the window of page links
//! - [`count`]: Thousands separators, approximate totals, and capped counts
//! - [`header`]: Unit kind, breadcrumb, and page header
//! - [`limits`]: Page sizes and count caps passed into the builders
//!
//! # Example Usage
//!
//! ```rust
//! use docsite_core::directory::{build_directory_tree, DirectoryEntry};
//! use docsite_core::pagination::Pagination;
//!
//! let groups = build_directory_tree(vec![
//!     DirectoryEntry::package("b/x", "/m/b/x", ""),
//!     DirectoryEntry::package("a/y", "/m/a/y", ""),
//!     DirectoryEntry::package("a", "/m/a", "Package a."),
//! ]);
//! assert_eq!(groups[0].prefix, "a");
//! assert!(groups[0].root.is_some());
//!
//! let pagination = Pagination::compute(3, 10, 25, 5, 5).unwrap();
//! assert_eq!(pagination.offset, 20);
//! assert_eq!(pagination.next_page, 0);
//! ```

pub mod count;
pub mod directory;
pub mod error;
pub mod header;
pub mod limits;
pub mod pagination;

pub use error::CoreError;
