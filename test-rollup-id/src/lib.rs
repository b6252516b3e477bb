// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-unique identifiers for test entities.
//!
//! Results from concurrent or repeated runs are told apart by a [`TestId`]. Fresh ids are drawn
//! from a single process-wide [`IdAllocator`], seeded at [`IdAllocator::SEED`] so that default or
//! zero values are easy to tell apart from allocated ones.
//!
//! ```
//! use test_rollup_id::TestId;
//!
//! let first = TestId::new();
//! let second = TestId::new();
//! assert!(first < second);
//!
//! let parsed: TestId = first.to_string().parse().unwrap();
//! assert_eq!(parsed, first);
//! ```

mod allocator;
mod errors;
mod id;

pub use allocator::*;
pub use errors::*;
pub use id::*;
