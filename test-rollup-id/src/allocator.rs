// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::TestId;
use std::sync::{
    LazyLock,
    atomic::{AtomicI32, Ordering},
};

static GLOBAL: LazyLock<IdAllocator> = LazyLock::new(IdAllocator::new);

/// Hands out [`TestId`]s from a monotonically increasing counter.
///
/// The process-wide instance is returned by [`IdAllocator::global`]; it is created on first use
/// and lives for the rest of the process. Allocation is a single atomic increment, so any number
/// of threads may allocate concurrently. The order in which concurrent callers observe ids is
/// unspecified, but no two calls return the same id until the counter wraps around.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicI32,
}

impl IdAllocator {
    /// The first id handed out by a fresh allocator.
    pub const SEED: i32 = 1000;

    /// Creates a new allocator starting at [`Self::SEED`].
    pub fn new() -> Self {
        Self::with_seed(Self::SEED)
    }

    /// Creates a new allocator starting at `seed`.
    ///
    /// Ids from this allocator are independent of the global one and may collide with it.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            next: AtomicI32::new(seed),
        }
    }

    /// Returns the process-wide allocator.
    pub fn global() -> &'static IdAllocator {
        &GLOBAL
    }

    /// Allocates the next id.
    ///
    /// Wraps around silently on overflow.
    pub fn next_id(&self) -> TestId {
        // fetch_add wraps on overflow.
        TestId::from_int(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the id the next call to [`Self::next_id`] would hand out, without allocating it.
    pub fn peek(&self) -> TestId {
        TestId::from_int(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
