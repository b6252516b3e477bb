// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Combining results from several containers into one node.
//!
//! Both [`wrap`] and [`aggregate`] first flatten their input: a result whose tag is
//! `test-wrapper` is replaced by its child elements. `wrap` then groups the flattened nodes
//! under a new element, while `aggregate` also rolls their statistics up onto it.

use crate::{
    ResultContainer, ResultNode, TestPackage,
    errors::{ResultParseError, UnknownTestStatus},
};
use std::{fmt, str::FromStr};
use tracing::{debug, trace};

/// The tag of a pass-through node whose children are spliced in place of the node itself.
pub static WRAPPER_TAG: &str = "test-wrapper";

/// The `id` written on every aggregated node.
///
/// This is a fixed placeholder rather than a real identifier: aggregated nodes are not
/// registered with the [`IdAllocator`](crate::IdAllocator).
pub static PLACEHOLDER_AGGREGATE_ID: &str = "2";

/// The overall outcome of a test node, as carried by its `result` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestStatus {
    /// No outcome could be determined. This is where a rollup starts.
    #[default]
    Inconclusive,

    /// The test was not run.
    Skipped,

    /// The test passed.
    Passed,

    /// The test failed. Once a rollup has seen a failure, it stays failed.
    Failed,
}

impl TestStatus {
    /// Returns the attribute value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inconclusive => "Inconclusive",
            Self::Skipped => "Skipped",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }

    /// Returns the string values of all known statuses.
    pub fn variants() -> &'static [&'static str] {
        &["Inconclusive", "Skipped", "Passed", "Failed"]
    }

    /// Returns the rolled-up status after observing `next`.
    ///
    /// * `Failed` always wins, and nothing replaces it afterwards.
    /// * `Passed` replaces anything other than `Failed`.
    /// * `Skipped` only replaces `Inconclusive`.
    /// * Anything else, including a missing status, leaves the rollup unchanged.
    ///
    /// Folding is order-sensitive: `[Passed, Skipped]` and `[Skipped, Passed]` both roll up to
    /// `Passed`, but only because a later `Skipped` never replaces an earlier `Passed`.
    pub fn fold(self, next: Option<TestStatus>) -> TestStatus {
        match (self, next) {
            (Self::Failed, _) | (_, Some(Self::Failed)) => Self::Failed,
            (_, Some(Self::Passed)) => Self::Passed,
            (Self::Inconclusive, Some(Self::Skipped)) => Self::Skipped,
            (current, _) => current,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = UnknownTestStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Inconclusive" => Ok(Self::Inconclusive),
            "Skipped" => Ok(Self::Skipped),
            "Passed" => Ok(Self::Passed),
            "Failed" => Ok(Self::Failed),
            other => Err(UnknownTestStatus::new(other)),
        }
    }
}

/// Statistics rolled up from a sequence of result nodes.
///
/// Counts and time are plain sums over the nodes' own attributes; a missing or malformed
/// attribute counts as zero. A `time` that is not finite is malformed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RollupSummary {
    /// The rolled-up status, see [`TestStatus::fold`].
    pub status: TestStatus,

    /// Sum of `testcasecount`.
    pub test_case_count: i64,

    /// Sum of `total`.
    pub total: i64,

    /// Sum of `passed`.
    pub passed: i64,

    /// Sum of `failed`.
    pub failed: i64,

    /// Sum of `inconclusive`.
    pub inconclusive: i64,

    /// Sum of `skipped`.
    pub skipped: i64,

    /// Sum of `asserts`.
    pub asserts: i64,

    /// Sum of `time`, in seconds.
    pub time: f64,
}

impl RollupSummary {
    /// Creates an empty summary with an `Inconclusive` status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rolls up the given nodes, left to right.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a ResultNode>) -> Self {
        let mut summary = Self::new();
        for node in nodes {
            summary.add(node);
        }
        summary
    }

    /// Adds a single node to the summary.
    pub fn add(&mut self, node: &ResultNode) -> &mut Self {
        let status = node
            .attribute("result")
            .and_then(|result| result.parse::<TestStatus>().ok());
        self.status = self.status.fold(status);

        let count = |name: &str| node.attribute_or(name, 0_i64);
        self.test_case_count = self.test_case_count.saturating_add(count("testcasecount"));
        self.total = self.total.saturating_add(count("total"));
        self.passed = self.passed.saturating_add(count("passed"));
        self.failed = self.failed.saturating_add(count("failed"));
        self.inconclusive = self.inconclusive.saturating_add(count("inconclusive"));
        self.skipped = self.skipped.saturating_add(count("skipped"));
        self.asserts = self.asserts.saturating_add(count("asserts"));
        self.time += Some(node.attribute_or("time", 0.0_f64))
            .filter(|time| time.is_finite())
            .unwrap_or(0.0);
        self
    }

    /// Writes the summary onto `node` as attributes.
    pub fn write_attributes(&self, node: &mut ResultNode) {
        node.add_attribute("testcasecount", self.test_case_count.to_string())
            .add_attribute("result", self.status.as_str())
            .add_attribute("time", format_time(self.time))
            .add_attribute("total", self.total.to_string())
            .add_attribute("passed", self.passed.to_string())
            .add_attribute("failed", self.failed.to_string())
            .add_attribute("inconclusive", self.inconclusive.to_string())
            .add_attribute("skipped", self.skipped.to_string())
            .add_attribute("asserts", self.asserts.to_string());
    }
}

// Time is written as seconds with 6 decimal places.
fn format_time(time: f64) -> String {
    format!("{time:.6}")
}

/// Splices the children of `test-wrapper` nodes in place of the wrappers themselves.
///
/// Only one level is flattened: a wrapper nested inside a wrapper is kept as-is.
pub fn flatten_wrappers<'a>(
    nodes: impl IntoIterator<Item = &'a ResultNode>,
) -> Vec<&'a ResultNode> {
    let mut flattened = Vec::new();
    for node in nodes {
        if node.is_named(WRAPPER_TAG) {
            trace!(children = node.children().count(), "splicing wrapper node");
            flattened.extend(node.children());
        } else {
            flattened.push(node);
        }
    }
    flattened
}

fn flatten_results(results: &[ResultContainer]) -> Result<Vec<&ResultNode>, ResultParseError> {
    let mut flattened = Vec::new();
    for result in results {
        flattened.extend(flatten_wrappers(result.xml_nodes()?));
    }
    Ok(flattened)
}

/// Groups every result under a new element named `element_name`, without computing statistics.
///
/// Each flattened node is deep-copied into the new element, in order.
pub fn wrap(
    element_name: &str,
    results: &[ResultContainer],
) -> Result<ResultContainer, ResultParseError> {
    let nodes = flatten_results(results)?;

    let mut combined = ResultNode::top_level(element_name);
    for node in &nodes {
        combined.import_child(node);
    }

    debug!(element = element_name, nodes = nodes.len(), "wrapped results");
    Ok(ResultContainer::from_node(combined))
}

/// Rolls every result up into a new element named `element_name`.
///
/// The new element carries the summed statistics and overall status of the flattened nodes, and
/// contains deep copies of them as children. See [`aggregate_nodes`].
pub fn aggregate(
    element_name: &str,
    package: &TestPackage,
    results: &[ResultContainer],
) -> Result<ResultContainer, ResultParseError> {
    let nodes = flatten_results(results)?;
    Ok(ResultContainer::from_node(aggregate_nodes(
        element_name,
        package,
        &nodes,
    )))
}

/// Rolls already-parsed nodes up into a new element named `element_name`.
///
/// Unlike [`aggregate`], `nodes` are used as given: `test-wrapper` nodes are not flattened.
///
/// The new element's attributes are, in order: `id` (always [`PLACEHOLDER_AGGREGATE_ID`]),
/// `name` and `fullname` (from `package`, each only if non-empty), followed by the fields of
/// [`RollupSummary`].
pub fn aggregate_nodes(
    element_name: &str,
    package: &TestPackage,
    nodes: &[&ResultNode],
) -> ResultNode {
    let summary = RollupSummary::from_nodes(nodes.iter().copied());

    let mut combined = ResultNode::top_level(element_name);
    combined.add_attribute("id", PLACEHOLDER_AGGREGATE_ID);
    if !package.name.is_empty() {
        combined.add_attribute("name", package.name.as_str());
    }
    if !package.full_name.is_empty() {
        combined.add_attribute("fullname", package.full_name.as_str());
    }
    summary.write_attributes(&mut combined);

    for node in nodes {
        combined.import_child(node);
    }

    debug!(
        element = element_name,
        nodes = nodes.len(),
        status = %summary.status,
        "aggregated results"
    );
    combined
}
