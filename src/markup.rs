//! A small XHTML element tree and its serializer
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;
use std::{fmt, io};

/// Serializer settings, passed through verbatim from the calendar options
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(default)]
pub struct OutputOptions {
    /// When set, emit one element per line, indenting each nesting level by
    /// this many spaces.  When unset, the document is written on a single
    /// line.
    pub indent: Option<usize>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Node {
        Node::Element(e)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Node {
        Node::Text(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Node {
        Node::Text(s.to_owned())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new<S: Into<String>>(name: S) -> Element {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the value of the attribute `key`, if set
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any previous value for the same key in
    /// place
    pub fn set_attr<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attributes.push((key, value));
        }
    }

    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Element {
        self.set_attr(key, value);
        self
    }

    pub fn push<N: Into<Node>>(&mut self, child: N) {
        self.children.push(child.into());
    }

    pub fn with_child<N: Into<Node>>(mut self, child: N) -> Element {
        self.push(child);
        self
    }

    /// Iterate over the element children of this element, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenation of all text beneath this element, in document order
    pub fn text(&self) -> String {
        let mut s = String::new();
        self.collect_text(&mut s);
        s
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(t),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }

    /// Serialize this element as XHTML.  Text is escaped; attribute values
    /// additionally have their quotes escaped.
    pub fn to_xhtml(&self, options: OutputOptions) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_xhtml(&mut buf, options);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write this element as XHTML to `out`.
    ///
    /// With `options.indent` set, each element whose children are all
    /// elements has them laid out one per line; elements containing text are
    /// written inline.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_xhtml<W: io::Write>(&self, out: W, options: OutputOptions) -> io::Result<()> {
        match options.indent {
            Some(width) => {
                self.write_indented(&mut Writer::new_with_indent(out, b' ', width), true)
            }
            None => self.write_inline(&mut Writer::new(out)),
        }
    }

    fn write_indented<W: io::Write>(&self, writer: &mut Writer<W>, root: bool) -> io::Result<()> {
        if self.is_block() {
            writer.write_event(Event::Start(self.start_tag()))?;
            for child in self.child_elements() {
                child.write_indented(writer, false)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
        } else {
            // The indenting writer would break the line before the closing
            // tag of mixed content, so inline elements bypass it.
            if !root {
                writer.write_indent()?;
            }
            self.write_inline(&mut Writer::new(writer.get_mut()))
        }
    }

    fn write_inline<W: io::Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.write_event(Event::Start(self.start_tag()))?;
        for child in &self.children {
            match child {
                Node::Text(t) => {
                    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(t))))?;
                }
                Node::Element(e) => e.write_inline(writer)?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }

    fn start_tag(&self) -> BytesStart<'_> {
        BytesStart::new(self.name.as_str()).with_attributes(
            self.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    fn is_block(&self) -> bool {
        !self.children.is_empty() && self.children.iter().all(|n| matches!(n, Node::Element(_)))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xhtml(OutputOptions::default()))
    }
}
