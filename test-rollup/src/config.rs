// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for how combined results are written out.
//!
//! ```toml
//! [output]
//! declaration = true
//! indent = 2
//! ```

use crate::errors::ConfigParseError;
use serde::Deserialize;

/// Top-level rollup configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RollupConfig {
    #[serde(default)]
    output: XmlFormatConfig,
}

impl RollupConfig {
    /// Parses a configuration from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigParseError> {
        Ok(toml::from_str(input)?)
    }

    /// Returns the output format.
    pub fn output(&self) -> &XmlFormatConfig {
        &self.output
    }
}

/// How a [`ResultNode`](crate::ResultNode) is serialized.
///
/// The default is compact output with no XML declaration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct XmlFormatConfig {
    #[serde(default)]
    declaration: bool,
    #[serde(default)]
    indent: Option<usize>,
}

impl XmlFormatConfig {
    /// Creates the default, compact format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether an `<?xml ...?>` declaration is written first.
    pub fn set_declaration(&mut self, declaration: bool) -> &mut Self {
        self.declaration = declaration;
        self
    }

    /// Sets the number of spaces per indentation level, or `None` for compact output.
    pub fn set_indent(&mut self, indent: Option<usize>) -> &mut Self {
        self.indent = indent;
        self
    }

    /// Returns true if an XML declaration is written.
    pub fn declaration(&self) -> bool {
        self.declaration
    }

    /// Returns the number of spaces per indentation level, if output is indented.
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }
}
