// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ResultNode,
    config::XmlFormatConfig,
    errors::{InvalidStateError, ResultError, ResultParseError},
    xml::parse_node,
};
use std::sync::OnceLock;
use tracing::trace;

static ERROR_TAG: &str = "error";

/// One or more test results, each held as raw XML text and, once needed, as a parsed tree.
///
/// Text added with [`add_xml`](Self::add_xml) is not parsed until the structure is first
/// requested; the parsed tree is cached from then on. Nodes added with
/// [`add_node`](Self::add_node) have their text form computed up front, so both forms are always
/// available without reparsing.
///
/// Adding results requires exclusive access. Once built, a container may be shared between threads
/// and read concurrently, including the lazy parse.
#[derive(Clone, Debug, Default)]
pub struct ResultContainer {
    entries: Vec<ResultEntry>,
}

impl ResultContainer {
    /// Creates an empty container, for building up incrementally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container holding a single parsed node.
    pub fn from_node(node: ResultNode) -> Self {
        let mut container = Self::new();
        container.add_node(node);
        container
    }

    /// Creates a container holding a single result in text form.
    ///
    /// The text is not parsed until the structure is first requested.
    pub fn from_xml(xml: impl Into<String>) -> Self {
        let mut container = Self::new();
        container.add_xml(xml);
        container
    }

    /// Appends a result in text form.
    pub fn add_xml(&mut self, xml: impl Into<String>) -> &mut Self {
        self.entries.push(ResultEntry::from_xml(xml.into()));
        self
    }

    /// Appends a parsed result.
    pub fn add_node(&mut self, node: ResultNode) -> &mut Self {
        self.entries.push(ResultEntry::from_node(node));
        self
    }

    /// Appends every result held by `other`, keeping any trees it has already parsed.
    pub fn merge(&mut self, other: ResultContainer) -> &mut Self {
        self.entries.extend(other.entries);
        self
    }

    /// Returns the number of results held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no results are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if exactly one result is held.
    pub fn is_single(&self) -> bool {
        self.entries.len() == 1
    }

    /// Iterates over the text form of every result, in order.
    pub fn raw_xml(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|entry| entry.raw.as_str())
    }

    /// Returns the parsed form of every result, in order.
    ///
    /// Results held only as text are parsed and cached. The first parse failure is returned.
    pub fn xml_nodes(&self) -> Result<Vec<&ResultNode>, ResultParseError> {
        self.entries.iter().map(ResultEntry::node).collect()
    }

    /// Returns the parsed form of the only result.
    ///
    /// Fails with [`ResultError::InvalidState`] if the container holds zero or several results;
    /// check [`is_single`](Self::is_single) first.
    pub fn xml(&self) -> Result<&ResultNode, ResultError> {
        match self.entries.as_slice() {
            [entry] => Ok(entry.node()?),
            entries => Err(InvalidStateError::new(entries.len()).into()),
        }
    }

    /// Serializes the only result using the given output format.
    pub fn to_xml_string_with(&self, format: &XmlFormatConfig) -> Result<String, ResultError> {
        Ok(self.xml()?.to_xml_string_with(format))
    }

    /// Returns true if any held result is an `error` node.
    pub fn has_errors(&self) -> Result<bool, ResultParseError> {
        Ok(self
            .xml_nodes()?
            .into_iter()
            .any(|node| node.is_named(ERROR_TAG)))
    }

    /// Collects the `error` nodes held by this container.
    ///
    /// A held result that is itself an `error` node contributes one entry. Any other result
    /// contributes one entry per `error` node found anywhere below it.
    pub fn errors(&self) -> Result<Vec<ErrorInfo>, ResultParseError> {
        let mut errors = Vec::new();
        for node in self.xml_nodes()? {
            if node.is_named(ERROR_TAG) {
                errors.push(ErrorInfo::from_node(node));
            } else {
                errors.extend(
                    node.descendants()
                        .filter(|child| child.is_named(ERROR_TAG))
                        .map(ErrorInfo::from_node),
                );
            }
        }
        Ok(errors)
    }
}

impl From<ResultNode> for ResultContainer {
    fn from(node: ResultNode) -> Self {
        Self::from_node(node)
    }
}

impl From<String> for ResultContainer {
    fn from(xml: String) -> Self {
        Self::from_xml(xml)
    }
}

impl From<&str> for ResultContainer {
    fn from(xml: &str) -> Self {
        Self::from_xml(xml)
    }
}

impl FromIterator<ResultNode> for ResultContainer {
    fn from_iter<I: IntoIterator<Item = ResultNode>>(iter: I) -> Self {
        let mut container = Self::new();
        for node in iter {
            container.add_node(node);
        }
        container
    }
}

/// The message and stack trace carried by an `error` node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// The `message` attribute, or empty if absent.
    pub message: String,

    /// The `stackTrace` attribute, or empty if absent.
    pub stack_trace: String,
}

impl ErrorInfo {
    fn from_node(node: &ResultNode) -> Self {
        Self {
            message: node.attribute("message").unwrap_or_default().to_owned(),
            stack_trace: node.attribute("stackTrace").unwrap_or_default().to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
struct ResultEntry {
    // Always present.
    raw: String,
    // Filled in on first structured access, or up front for entries built from a node.
    parsed: OnceLock<ResultNode>,
}

impl ResultEntry {
    fn from_xml(raw: String) -> Self {
        Self {
            raw,
            parsed: OnceLock::new(),
        }
    }

    fn from_node(node: ResultNode) -> Self {
        Self {
            raw: node.to_xml_string(),
            parsed: OnceLock::from(node),
        }
    }

    fn node(&self) -> Result<&ResultNode, ResultParseError> {
        if let Some(node) = self.parsed.get() {
            return Ok(node);
        }

        trace!(len = self.raw.len(), "parsing result text");
        let node = parse_node(&self.raw)?;
        // If another reader got here first, its tree is kept and this one is dropped.
        Ok(self.parsed.get_or_init(|| node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;
    use test_case::test_case;

    fn error_node(message: Option<&str>, stack_trace: Option<&str>) -> ResultNode {
        let mut node = ResultNode::top_level("error");
        if let Some(message) = message {
            node.add_attribute("message", message);
        }
        if let Some(stack_trace) = stack_trace {
            node.add_attribute("stackTrace", stack_trace);
        }
        node
    }

    #[test]
    fn from_node_caches_text() {
        let mut node = ResultNode::top_level("test-case");
        node.add_attribute("result", "Passed");
        let container = ResultContainer::from_node(node.clone());

        assert!(container.is_single());
        assert_eq!(
            container.raw_xml().collect::<Vec<_>>(),
            vec![r#"<test-case result="Passed" />"#]
        );
        assert_eq!(container.xml().expect("single result"), &node);
    }

    #[test]
    fn from_xml_parses_lazily() {
        let container = ResultContainer::from_xml("<test-case result=\"Failed\"");
        // Construction never fails; the error surfaces on structured access.
        assert!(container.is_single());
        assert_eq!(container.raw_xml().count(), 1);
        container.xml_nodes().expect_err("text is malformed");
        assert!(matches!(container.xml(), Err(ResultError::Parse(_))));
    }

    #[test]
    fn parsed_tree_is_cached() {
        let container = ResultContainer::from_xml(r#"<test-case name="a" />"#);
        let first = container.xml().expect("valid") as *const ResultNode;
        let second = container.xml().expect("valid") as *const ResultNode;
        assert_eq!(first, second);
    }

    #[test]
    fn mixed_entries_keep_order() {
        let mut container = ResultContainer::new();
        container
            .add_xml(r#"<test-suite name="first" />"#)
            .add_node(ResultNode::top_level("test-wrapper"))
            .add_xml(r#"<test-suite name="third" />"#);

        let names: Vec<_> = container
            .xml_nodes()
            .expect("all valid")
            .into_iter()
            .map(ResultNode::name)
            .collect();
        assert_eq!(names, vec!["test-suite", "test-wrapper", "test-suite"]);
        assert_eq!(container.len(), 3);
    }

    #[test_case(0 ; "empty")]
    #[test_case(2 ; "two results")]
    #[test_case(5 ; "five results")]
    fn xml_requires_single(count: usize) {
        let container: ResultContainer = (0..count)
            .map(|_| ResultNode::top_level("test-case"))
            .collect();
        assert!(!container.is_single());
        match container.xml() {
            Err(ResultError::InvalidState(error)) => assert_eq!(error.count(), count),
            other => panic!("expected invalid state error, got {other:?}"),
        }
    }

    #[test]
    fn has_errors_checks_top_level_only() {
        let mut nested = ResultNode::top_level("test-suite");
        nested.add_element("error");
        let container = ResultContainer::from_node(nested);
        assert!(!container.has_errors().expect("valid"));

        let mut container = ResultContainer::from_xml(r#"<test-suite />"#);
        container.add_node(error_node(Some("boom"), None));
        assert!(container.has_errors().expect("valid"));

        assert!(!ResultContainer::new().has_errors().expect("empty is valid"));
    }

    #[test]
    fn errors_per_top_level_error_node() {
        let mut container = ResultContainer::new();
        container
            .add_node(error_node(Some("first"), Some("at one()")))
            .add_node(ResultNode::top_level("test-suite"))
            .add_node(error_node(None, None));

        assert_eq!(
            container.errors().expect("valid"),
            vec![
                ErrorInfo {
                    message: "first".to_owned(),
                    stack_trace: "at one()".to_owned(),
                },
                ErrorInfo::default(),
            ]
        );
    }

    #[test]
    fn errors_within_single_result() {
        let container = ResultContainer::from_xml(
            r#"<test-run>
                <error message="load failed" stackTrace="at load()" />
                <test-suite><error message="setup failed" /></test-suite>
            </test-run>"#,
        );

        assert!(!container.has_errors().expect("valid"));
        let messages: Vec<_> = container
            .errors()
            .expect("valid")
            .into_iter()
            .map(|error| error.message)
            .collect();
        assert_eq!(messages, vec!["load failed", "setup failed"]);
    }

    #[test]
    fn merge_appends_entries() {
        let mut first = ResultContainer::from_xml("<a />");
        let mut second = ResultContainer::from_node(ResultNode::top_level("b"));
        second.add_xml("<c />");
        first.merge(second);

        let names: Vec<_> = first
            .xml_nodes()
            .expect("valid")
            .into_iter()
            .map(ResultNode::name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn shared_readers_see_same_tree() {
        let container = ResultContainer::from_xml(r#"<test-suite total="3" />"#);
        let addresses: Vec<usize> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| container.xml().expect("valid") as *const ResultNode as usize)
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("reader thread panicked"))
                .collect()
        });
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
