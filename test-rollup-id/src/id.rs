// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{IdAllocator, errors::TestIdParseError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An identifier for a test entity, unique within this process.
///
/// Two ids are equal if and only if their underlying integers are equal. An id is `Copy`: copying
/// it produces an equal, independent value.
///
/// Serialized as the decimal integer, which [`TestId::parse`] turns back into an identical id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(i32);

impl TestId {
    /// Allocates a fresh id from the process-wide [`IdAllocator`].
    #[expect(clippy::new_without_default)]
    pub fn new() -> Self {
        IdAllocator::global().next_id()
    }

    /// Creates an id from a known integer.
    ///
    /// Used when reconstructing ids parsed from persisted names, or when synthesizing the id of an
    /// aggregate.
    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self(value)
    }

    /// Parses a decimal integer into an id.
    pub fn parse(input: &str) -> Result<Self, TestIdParseError> {
        input
            .parse::<i32>()
            .map(Self)
            .map_err(|err| TestIdParseError::new(input, err))
    }

    /// Returns the underlying integer.
    #[inline]
    pub const fn as_int(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TestId {
    type Err = TestIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i32> for TestId {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl From<TestId> for i32 {
    fn from(id: TestId) -> Self {
        id.0
    }
}

#[cfg(feature = "proptest1")]
impl proptest::arbitrary::Arbitrary for TestId {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        any::<i32>().prop_map(Self::from_int).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;
    use test_strategy::proptest;

    #[test_case("1000", 1000 ; "seed value")]
    #[test_case("0", 0 ; "zero")]
    #[test_case("-17", -17 ; "negative")]
    #[test_case("+42", 42 ; "explicit plus sign")]
    #[test_case("2147483647", i32::MAX ; "max")]
    fn parse_valid(input: &str, expected: i32) {
        assert_eq!(
            TestId::parse(input).expect("valid id"),
            TestId::from_int(expected)
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("abc" ; "letters")]
    #[test_case("12.5" ; "decimal point")]
    #[test_case(" 12" ; "leading whitespace")]
    #[test_case("2147483648" ; "overflow")]
    fn parse_invalid(input: &str) {
        let error = TestId::parse(input).expect_err("invalid id");
        assert_eq!(error.input(), input);
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(TestId::from_int(1234).to_string(), "1234");
        assert_eq!(TestId::from_int(-5).to_string(), "-5");
    }

    #[test]
    fn value_semantics() {
        let id = TestId::from_int(1001);
        let copy = id;
        assert_eq!(id, copy);
        assert_ne!(id, TestId::from_int(1002));

        let set: HashSet<TestId> = [id, copy, TestId::from_int(1001)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn serde_as_integer() {
        let id = TestId::from_int(1042);
        let json = serde_json::to_string(&id).expect("serialization succeeds");
        assert_eq!(json, "1042");
        let roundtrip: TestId = serde_json::from_str(&json).expect("deserialization succeeds");
        assert_eq!(roundtrip, id);
    }

    #[proptest]
    fn display_parse_roundtrip(value: i32) {
        let id = TestId::from_int(value);
        let parsed: TestId = id.to_string().parse().expect("display output parses");
        proptest::prop_assert_eq!(parsed, id);
    }
}
