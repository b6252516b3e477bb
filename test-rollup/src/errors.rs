// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by test-rollup.

use quick_xml::events::attributes::AttrError;
use std::str::Utf8Error;
use thiserror::Error;

/// An error that occurred while parsing stored result text into a [`ResultNode`].
///
/// Malformed text is not detected when a result is added to a
/// [`ResultContainer`](crate::ResultContainer); it surfaces the first time the parsed form is
/// requested.
///
/// [`ResultNode`]: crate::ResultNode
#[derive(Debug, Error)]
#[error("failed to parse result XML at byte {position}")]
pub struct ResultParseError {
    position: u64,
    #[source]
    kind: ParseErrorKind,
}

impl ResultParseError {
    pub(crate) fn new(position: u64, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }

    /// Returns the byte offset into the input at which the error was detected.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the reason parsing failed.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

/// The reason a [`ResultParseError`] occurred.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The XML reader rejected the input.
    #[error("malformed XML")]
    Xml(#[source] quick_xml::Error),

    /// An attribute could not be read.
    #[error("malformed attribute")]
    Attribute(#[source] AttrError),

    /// A name or CDATA section was not valid UTF-8.
    #[error("invalid UTF-8")]
    Utf8(#[source] Utf8Error),

    /// The input contained no root element.
    #[error("no root element found")]
    NoRootElement,

    /// A second element was found after the root element was closed.
    #[error("found element `{0}` after the root element")]
    MultipleRootElements(String),

    /// Non-whitespace text was found outside the root element.
    #[error("found text outside the root element")]
    TextOutsideRoot,

    /// An end tag was found with no matching start tag.
    #[error("found end tag with no matching start tag")]
    UnmatchedEndTag,

    /// The input ended while elements were still open.
    #[error("unexpected end of input: `{0}` was not closed")]
    UnexpectedEof(String),
}

/// An error returned when a single result is requested from a container that does not hold
/// exactly one result.
///
/// Returned by [`ResultContainer::xml`](crate::ResultContainer::xml).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("expected a single result, but the container holds {count}")]
pub struct InvalidStateError {
    count: usize,
}

impl InvalidStateError {
    pub(crate) fn new(count: usize) -> Self {
        Self { count }
    }

    /// Returns the number of results the container held.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// An error returned by single-result accessors.
#[derive(Debug, Error)]
pub enum ResultError {
    /// The stored text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ResultParseError),

    /// The container did not hold exactly one result.
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
}

/// Error returned while parsing a [`TestStatus`](crate::TestStatus) from a string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "unrecognized test status: {input}\n(known values: {})",
    crate::TestStatus::variants().join(", "),
)]
pub struct UnknownTestStatus {
    input: String,
}

impl UnknownTestStatus {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the input that was not recognized.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// An error that occurred while parsing a [`RollupConfig`](crate::config::RollupConfig).
#[derive(Debug, Error)]
#[error("failed to parse rollup config")]
pub struct ConfigParseError {
    #[from]
    err: toml::de::Error,
}
