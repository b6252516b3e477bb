// Copyright (c) The test-rollup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read and write result XML.

use crate::{
    NodeContent, ResultNode,
    config::XmlFormatConfig,
    errors::{ParseErrorKind, ResultParseError},
};
use quick_xml::{
    Reader,
    escape::escape,
    events::{BytesStart, Event},
};
use std::{iter, str};
use swrite::{SWrite, swrite};

static XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Parses a single XML element, along with everything inside it, into a [`ResultNode`].
///
/// Declarations, comments, processing instructions and whitespace between elements are ignored.
/// Whitespace that is the only text of an element is kept.
/// The input must contain exactly one root element.
pub fn parse_node(input: &str) -> Result<ResultNode, ResultParseError> {
    let mut reader = Reader::from_str(input);
    let mut builder = TreeBuilder::default();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(error_at(&reader, ParseErrorKind::Xml(err))),
        };

        let res = match event {
            Event::Start(start) => start_node(&start).and_then(|node| builder.open(node)),
            Event::Empty(start) => start_node(&start).and_then(|node| builder.attach(node)),
            Event::End(_) => builder.close(),
            Event::Text(text) => match text.unescape() {
                Ok(text) => builder.text(text.into_owned()),
                Err(err) => Err(ParseErrorKind::Xml(err)),
            },
            Event::CData(data) => match str::from_utf8(&data) {
                Ok(data) => builder.cdata(data.to_owned()),
                Err(err) => Err(ParseErrorKind::Utf8(err)),
            },
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => Ok(()),
            Event::Eof => break,
        };
        res.map_err(|kind| error_at(&reader, kind))?;
    }

    builder.finish().map_err(|kind| error_at(&reader, kind))
}

fn error_at(reader: &Reader<&[u8]>, kind: ParseErrorKind) -> ResultParseError {
    ResultParseError::new(reader.buffer_position(), kind)
}

fn start_node(start: &BytesStart<'_>) -> Result<ResultNode, ParseErrorKind> {
    let qname = start.name();
    let name = str::from_utf8(qname.as_ref()).map_err(ParseErrorKind::Utf8)?;
    let mut node = ResultNode::top_level(name);
    for attr in start.attributes() {
        let attr = attr.map_err(ParseErrorKind::Attribute)?;
        let key = str::from_utf8(attr.key.as_ref()).map_err(ParseErrorKind::Utf8)?;
        let value = attr.unescape_value().map_err(ParseErrorKind::Xml)?;
        node.add_attribute(key, value.into_owned());
    }
    Ok(node)
}

#[derive(Debug, Default)]
struct TreeBuilder {
    // Elements that have been opened but not yet closed, innermost last.
    open: Vec<ResultNode>,
    root: Option<ResultNode>,
}

impl TreeBuilder {
    fn open(&mut self, node: ResultNode) -> Result<(), ParseErrorKind> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(ParseErrorKind::MultipleRootElements(node.name().to_owned()));
        }
        self.open.push(node);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ParseErrorKind> {
        let mut node = self.open.pop().ok_or(ParseErrorKind::UnmatchedEndTag)?;
        node.drop_blank_text_between_elements();
        self.attach(node)
    }

    fn attach(&mut self, node: ResultNode) -> Result<(), ParseErrorKind> {
        match self.open.last_mut() {
            Some(parent) => {
                parent.append_child(node);
                Ok(())
            }
            None if self.root.is_none() => {
                self.root = Some(node);
                Ok(())
            }
            None => Err(ParseErrorKind::MultipleRootElements(node.name().to_owned())),
        }
    }

    // Blank text is kept until its element closes, since it is only layout when the element
    // also has child elements.
    fn text(&mut self, text: String) -> Result<(), ParseErrorKind> {
        match self.open.last_mut() {
            Some(parent) => {
                parent.add_text(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(ParseErrorKind::TextOutsideRoot),
        }
    }

    fn cdata(&mut self, data: String) -> Result<(), ParseErrorKind> {
        let parent = self
            .open
            .last_mut()
            .ok_or(ParseErrorKind::TextOutsideRoot)?;
        parent.add_cdata(data);
        Ok(())
    }

    fn finish(self) -> Result<ResultNode, ParseErrorKind> {
        if let Some(unclosed) = self.open.last() {
            return Err(ParseErrorKind::UnexpectedEof(unclosed.name().to_owned()));
        }
        self.root.ok_or(ParseErrorKind::NoRootElement)
    }
}

pub(crate) fn write_node(node: &ResultNode, format: &XmlFormatConfig) -> String {
    let mut out = String::new();
    if format.declaration() {
        out.push_str(XML_DECLARATION);
        if format.indent().is_some() {
            out.push('\n');
        }
    }
    write_element(&mut out, node, format.indent(), 0);
    out
}

fn write_element(out: &mut String, node: &ResultNode, indent: Option<usize>, depth: usize) {
    swrite!(out, "<{}", node.name());
    for (name, value) in node.attributes() {
        swrite!(out, " {}=\"{}\"", name, escape(value));
    }

    let content = node.content();
    if content.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    // Indenting mixed content would change its text, so only element-only content is indented.
    let indent = indent.filter(|_| {
        content
            .iter()
            .all(|item| matches!(item, NodeContent::Element(_)))
    });

    for item in content {
        match item {
            NodeContent::Element(child) => {
                if let Some(width) = indent {
                    write_newline(out, width * (depth + 1));
                }
                write_element(out, child, indent, depth + 1);
            }
            NodeContent::Text(text) => out.push_str(&escape(text.as_str())),
            NodeContent::CData(data) => write_cdata(out, data),
        }
    }

    if let Some(width) = indent {
        write_newline(out, width * depth);
    }
    swrite!(out, "</{}>", node.name());
}

fn write_cdata(out: &mut String, data: &str) {
    // "]]>" cannot appear inside a CDATA section, so split it across two sections.
    out.push_str("<![CDATA[");
    out.push_str(&data.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>");
}

fn write_newline(out: &mut String, spaces: usize) {
    out.push('\n');
    out.extend(iter::repeat_n(' ', spaces));
}
