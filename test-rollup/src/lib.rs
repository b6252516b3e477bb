// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge and roll up XML test results.
//!
//! Independent test executions (different runners, assemblies, distributed workers) each produce
//! an XML result tree. This crate combines those trees into one node, either as a plain structural
//! grouping ([`wrap`]) or as a summary that both contains its constituents and carries rolled-up
//! counts, timing and an overall status ([`aggregate`]).
//!
//! Results are held by a [`ResultContainer`], which keeps each result as raw text and parses it
//! into a [`ResultNode`] tree the first time the structure is needed.
//!
//! ```
//! use test_rollup::{ResultContainer, TestPackage, aggregate};
//!
//! let first = ResultContainer::from_xml(r#"<test-suite result="Passed" total="5" passed="5" />"#);
//! let second = ResultContainer::from_xml(
//!     r#"<test-suite result="Failed" total="3" passed="2" failed="1" />"#,
//! );
//!
//! let package = TestPackage::new("Suite1");
//! let combined = aggregate("test-suite", &package, &[first, second]).unwrap();
//! let node = combined.xml().unwrap();
//!
//! assert_eq!(node.attribute("result"), Some("Failed"));
//! assert_eq!(node.attribute("total"), Some("8"));
//! assert_eq!(node.children().count(), 2);
//! ```

mod aggregate;
pub mod config;
mod container;
pub mod errors;
mod node;
mod package;
mod xml;

pub use aggregate::*;
pub use container::*;
pub use node::*;
pub use package::*;
pub use test_rollup_id::{IdAllocator, TestId, TestIdParseError};
pub use xml::parse_node;
