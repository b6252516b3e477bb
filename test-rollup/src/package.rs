// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// The package a set of results was produced from.
///
/// Only its names are used: they annotate the node produced by [`aggregate`](crate::aggregate).
/// Either may be empty, in which case the corresponding attribute is left off.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestPackage {
    /// The short name of the package, written as the `name` attribute.
    pub name: String,

    /// The full name of the package, typically a path, written as the `fullname` attribute.
    pub full_name: String,
}

impl TestPackage {
    /// Creates a new package with the given name and an empty full name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: String::new(),
        }
    }

    /// Sets the full name of the package.
    pub fn set_full_name(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.full_name = full_name.into();
        self
    }
}
