// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{config::XmlFormatConfig, errors::ResultParseError, xml};
use indexmap::IndexMap;
use std::{slice, str::FromStr};

/// A node in a parsed result tree, such as `test-suite`, `test-case` or `error`.
///
/// Attributes keep the order in which they were first set. Content is an ordered mix of child
/// elements and character data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultNode {
    name: String,
    attributes: IndexMap<String, String>,
    content: Vec<NodeContent>,
}

/// A single item of content inside a [`ResultNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeContent {
    /// A child element.
    Element(ResultNode),

    /// Character data, stored unescaped.
    Text(String),

    /// A CDATA section, stored verbatim.
    CData(String),
}

impl ResultNode {
    /// Creates a new, empty element that does not belong to any tree.
    ///
    /// This is the root under which imported nodes are attached when results are combined.
    pub fn top_level(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            content: Vec::new(),
        }
    }

    /// Returns the tag name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this node's tag is `name`.
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    /// Returns the value of an attribute, or `None` if it is not set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the value of an attribute parsed as `T`.
    ///
    /// A missing attribute, or a value that does not parse, yields `default`.
    pub fn attribute_or<T: FromStr>(&self, name: &str, default: T) -> T {
        self.attribute(name)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Sets an attribute, overwriting any existing value.
    ///
    /// An overwritten attribute keeps its original position.
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Removes an attribute, returning its value if it was set.
    ///
    /// The relative order of the remaining attributes is preserved.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Iterates over attributes in order.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns all content of this node, in order.
    pub fn content(&self) -> &[NodeContent] {
        &self.content
    }

    /// Iterates over child elements, skipping character data.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &ResultNode> {
        self.content.iter().filter_map(|content| match content {
            NodeContent::Element(node) => Some(node),
            NodeContent::Text(_) | NodeContent::CData(_) => None,
        })
    }

    /// Iterates over child elements with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ResultNode> {
        self.children().filter(move |child| child.is_named(name))
    }

    /// Iterates over every element below this one, depth-first and in document order.
    ///
    /// This node itself is not included.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.content.iter()],
        }
    }

    /// Returns the concatenated text and CDATA directly inside this node.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for content in &self.content {
            match content {
                NodeContent::Text(text) | NodeContent::CData(text) => out.push_str(text),
                NodeContent::Element(_) => {}
            }
        }
        out
    }

    /// Appends a child element and returns a reference to it.
    pub fn append_child(&mut self, child: ResultNode) -> &mut ResultNode {
        self.content.push(NodeContent::Element(child));
        let Some(NodeContent::Element(child)) = self.content.last_mut() else {
            unreachable!("an element was just pushed");
        };
        child
    }

    /// Deep-copies `node` and appends the copy as a child.
    ///
    /// The copy is owned by this tree; later changes to `node` do not affect it.
    pub fn import_child(&mut self, node: &ResultNode) -> &mut ResultNode {
        self.append_child(import_node(node))
    }

    /// Appends a new, empty child element and returns a reference to it.
    pub fn add_element(&mut self, name: impl Into<String>) -> &mut ResultNode {
        self.append_child(ResultNode::top_level(name))
    }

    /// Appends a new child element whose only content is a CDATA section.
    pub fn add_element_with_cdata(
        &mut self,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> &mut ResultNode {
        let child = self.add_element(name);
        child.add_cdata(data);
        child
    }

    /// Appends character data.
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.content.push(NodeContent::Text(text.into()));
        self
    }

    /// Appends a CDATA section.
    pub fn add_cdata(&mut self, data: impl Into<String>) -> &mut Self {
        self.content.push(NodeContent::CData(data.into()));
        self
    }

    /// Removes whitespace-only text from a node that also has child elements.
    pub(crate) fn drop_blank_text_between_elements(&mut self) {
        if self
            .content
            .iter()
            .any(|item| matches!(item, NodeContent::Element(_)))
        {
            self.content.retain(
                |item| !matches!(item, NodeContent::Text(text) if text.trim().is_empty()),
            );
        }
    }

    /// Serializes this node in compact form, without an XML declaration.
    pub fn to_xml_string(&self) -> String {
        xml::write_node(self, &XmlFormatConfig::default())
    }

    /// Serializes this node using the given output format.
    pub fn to_xml_string_with(&self, format: &XmlFormatConfig) -> String {
        xml::write_node(self, format)
    }
}

impl FromStr for ResultNode {
    type Err = ResultParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        xml::parse_node(s)
    }
}

/// Deep-copies a node into a new tree that shares nothing with the original.
pub fn import_node(node: &ResultNode) -> ResultNode {
    node.clone()
}

/// Iterator over the element descendants of a [`ResultNode`].
///
/// Returned by [`ResultNode::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    stack: Vec<slice::Iter<'a, NodeContent>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a ResultNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(NodeContent::Element(node)) => {
                    self.stack.push(node.content.iter());
                    return Some(node);
                }
                Some(NodeContent::Text(_) | NodeContent::CData(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn suite() -> ResultNode {
        let mut node = ResultNode::top_level("test-suite");
        node.add_attribute("total", "5")
            .add_attribute("time", "0.25")
            .add_attribute("passed", "not-a-number")
            .add_attribute("asserts", " 7 ");
        node
    }

    #[test]
    fn string_attributes() {
        let node = suite();
        assert_eq!(node.attribute("total"), Some("5"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test_case("total", 5 ; "present")]
    #[test_case("missing", -1 ; "absent")]
    #[test_case("passed", -1 ; "malformed")]
    #[test_case("asserts", 7 ; "surrounding whitespace")]
    #[test_case("time", -1 ; "float for integer")]
    fn integer_attributes(name: &str, expected: i64) {
        assert_eq!(suite().attribute_or(name, -1_i64), expected);
    }

    #[test]
    fn float_attributes() {
        let node = suite();
        assert_eq!(node.attribute_or("time", 0.0_f64), 0.25);
        assert_eq!(node.attribute_or("total", 0.0_f64), 5.0);
        assert_eq!(node.attribute_or("passed", 1.5_f64), 1.5);
        assert_eq!(node.attribute_or("missing", 0.0_f64), 0.0);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut node = suite();
        node.add_attribute("total", "6");
        let names: Vec<_> = node.attributes().collect();
        assert_eq!(
            names,
            vec![
                ("total", "6"),
                ("time", "0.25"),
                ("passed", "not-a-number"),
                ("asserts", " 7 "),
            ]
        );
    }

    #[test]
    fn remove_attribute_keeps_order() {
        let mut node = suite();
        assert_eq!(node.remove_attribute("time"), Some("0.25".to_owned()));
        assert_eq!(node.remove_attribute("time"), None);
        let names: Vec<_> = node.attributes().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["total", "passed", "asserts"]);
    }

    #[test]
    fn children_skip_text() {
        let mut node = ResultNode::top_level("test-case");
        node.add_text("before");
        node.add_element("reason").add_text("because");
        node.add_cdata("raw <data>");
        node.add_element("output");

        let names: Vec<_> = node.children().map(ResultNode::name).collect();
        assert_eq!(names, vec!["reason", "output"]);
        assert_eq!(node.text(), "beforeraw <data>");
        assert_eq!(node.content().len(), 4);
        assert_eq!(node.children_named("output").count(), 1);
    }

    #[test]
    fn descendants_are_preorder() {
        let mut root = ResultNode::top_level("test-run");
        let suite = root.add_element("test-suite");
        suite.add_element("test-case").add_element("error");
        suite.add_element("test-case");
        root.add_element("error");

        let names: Vec<_> = root.descendants().map(ResultNode::name).collect();
        assert_eq!(
            names,
            vec!["test-suite", "test-case", "error", "test-case", "error"]
        );
        assert_eq!(ResultNode::top_level("empty").descendants().count(), 0);
    }

    #[test]
    fn import_is_independent() {
        let mut original = suite();
        original.add_element("test-case");

        let mut root = ResultNode::top_level("test-run");
        root.import_child(&original);
        original.add_attribute("total", "100");

        let imported = root.children().next().expect("one child");
        assert_eq!(imported.attribute("total"), Some("5"));
        assert_eq!(imported.children().count(), 1);
    }

    #[test]
    fn element_with_cdata() {
        let mut node = ResultNode::top_level("test-case");
        node.add_element_with_cdata("message", "expected <1> but was <2>");
        let message = node.children_named("message").next().expect("message");
        assert_eq!(
            message.content(),
            &[NodeContent::CData("expected <1> but was <2>".to_owned())]
        );
    }
}
