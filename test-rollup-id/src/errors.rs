// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::num::ParseIntError;
use thiserror::Error;

/// An error that occurs while parsing a [`TestId`](crate::TestId) from a string.
///
/// Returned by [`TestId::parse`](crate::TestId::parse) and the [`FromStr`](std::str::FromStr)
/// implementation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid test id `{input}`: expected a decimal integer")]
pub struct TestIdParseError {
    input: String,
    #[source]
    err: ParseIntError,
}

impl TestIdParseError {
    pub(crate) fn new(input: impl Into<String>, err: ParseIntError) -> Self {
        Self {
            input: input.into(),
            err,
        }
    }

    /// Returns the input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}
