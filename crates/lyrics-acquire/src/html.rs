//! A small owned tree over parsed HTML, with predicate queries.
//!
//! `scraper` does the parsing; the result is copied into [`Element`]s so
//! extraction code can match on tag names and attribute maps directly and
//! get an explicit [`Shape`] back instead of guessing whether a lookup
//! produced one node or several.

use crate::normalize;
use scraper::{Html, Node};
use std::collections::BTreeMap;
use std::ops::Deref;

pub type Attributes = BTreeMap<String, String>;

/// Tags whose content starts on its own line in [`Element::text`]. A
/// subtree containing none of them is plain text for [`simplify`].
const BLOCK_TAGS: &[&str] = &[
    "blockquote", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ol", "p", "pre", "section",
    "table", "tr", "ul",
];

/// Result of a lookup that may match nothing, one node, or several.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<T> {
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Shape<T> {
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() > 1 {
            return Shape::Many(items);
        }
        match items.pop() {
            Some(item) => Shape::One(item),
            None => Shape::None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Shape::None => 0,
            Shape::One(_) => 1,
            Shape::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Shape::None => None,
            Shape::One(item) => Some(item),
            Shape::Many(items) => items.first(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Shape::None => Vec::new(),
            Shape::One(item) => vec![item],
            Shape::Many(items) => items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Shape<U> {
        Shape::from_vec(self.into_vec().into_iter().map(f).collect())
    }
}

/// A child of an element: either a nested element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<Content>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(el) => Some(el),
            Content::Text(_) => None,
        })
    }

    /// Direct children with the given tag.
    pub fn children_named(&self, tag: &str) -> Shape<&Element> {
        Shape::from_vec(self.child_elements().filter(|el| el.tag == tag).collect())
    }

    /// All descendants (not `self`) matching `pred`, in document order.
    pub fn find_all<P>(&self, pred: P) -> Shape<&Element>
    where
        P: Fn(&str, &Attributes) -> bool,
    {
        let mut found = Vec::new();
        collect_matches(&self.children, &pred, &mut found);
        Shape::from_vec(found)
    }

    pub fn find_first<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&str, &Attributes) -> bool,
    {
        first_match(&self.children, &pred)
    }

    /// Text content of the subtree.
    ///
    /// Whitespace inside text runs collapses to one space, `<br>` becomes a
    /// newline, block elements start on a new line, and each line is trimmed.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.push_text(&mut raw);
        normalize::normalize_text(&raw)
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Content::Text(text) => out.push_str(&normalize::collapse_whitespace(text)),
                Content::Element(el) => match el.tag.as_str() {
                    "br" => out.push('\n'),
                    "script" | "style" => {}
                    tag if BLOCK_TAGS.contains(&tag) => {
                        out.push('\n');
                        el.push_text(out);
                        out.push('\n');
                    }
                    _ => el.push_text(out),
                },
            }
        }
    }

    /// True when the subtree holds no block-level elements.
    fn is_phrasing(&self) -> bool {
        self.child_elements()
            .all(|el| !BLOCK_TAGS.contains(&el.tag.as_str()) && el.is_phrasing())
    }
}

/// A parsed HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    roots: Vec<Content>,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let roots = parsed.tree.root().children().filter_map(convert).collect();
        Self { roots }
    }

    /// All elements matching `pred`, in document order.
    pub fn find_all<P>(&self, pred: P) -> Shape<&Element>
    where
        P: Fn(&str, &Attributes) -> bool,
    {
        let mut found = Vec::new();
        collect_matches(&self.roots, &pred, &mut found);
        Shape::from_vec(found)
    }

    pub fn find_first<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&str, &Attributes) -> bool,
    {
        first_match(&self.roots, &pred)
    }
}

/// Predicate: element has the given tag.
pub fn tag_is(tag: &str) -> impl Fn(&str, &Attributes) -> bool + '_ {
    move |name, _| name == tag
}

/// Predicate: element's `class` attribute equals `class` exactly.
pub fn class_is(class: &str) -> impl Fn(&str, &Attributes) -> bool + '_ {
    move |_, attrs| attrs.get("class").map(String::as_str) == Some(class)
}

/// Drop the first literal `</br>` from a page before parsing.
///
/// Song pages carry a stray closing line-break tag that would otherwise
/// show up as an extra line break inside the lyrics.
pub fn strip_stray_line_break(html: &str) -> String {
    html.replacen("</br>", "", 1)
}

/// A subtree flattened into plain values.
#[derive(Debug, Clone, PartialEq)]
pub enum Plain {
    /// An element without block-level descendants, as its text.
    Text(String),
    /// Any other element: its attributes and its child elements grouped by tag.
    Element {
        attributes: Attributes,
        children: BTreeMap<String, Shape<Plain>>,
    },
}

impl Plain {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Plain::Text(text) => Some(text),
            Plain::Element { .. } => None,
        }
    }

    /// Child group for `tag`, if this is an element that has one.
    pub fn get(&self, tag: &str) -> Option<&Shape<Plain>> {
        match self {
            Plain::Text(_) => None,
            Plain::Element { children, .. } => children.get(tag),
        }
    }
}

pub fn simplify(element: &Element) -> Plain {
    if element.is_phrasing() {
        return Plain::Text(element.text());
    }

    let mut grouped: BTreeMap<String, Vec<Plain>> = BTreeMap::new();
    for child in element.child_elements() {
        grouped.entry(child.tag.clone()).or_default().push(simplify(child));
    }

    Plain::Element {
        attributes: element.attributes.clone(),
        children: grouped
            .into_iter()
            .map(|(tag, items)| (tag, Shape::from_vec(items)))
            .collect(),
    }
}

fn convert(node: ego_tree::NodeRef<'_, Node>) -> Option<Content> {
    match node.value() {
        Node::Element(el) => Some(Content::Element(Element {
            tag: el.name().to_ascii_lowercase(),
            attributes: el
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children: node.children().filter_map(convert).collect(),
        })),
        Node::Text(text) => Some(Content::Text(text.deref().to_string())),
        _ => None,
    }
}

fn collect_matches<'a, P>(children: &'a [Content], pred: &P, found: &mut Vec<&'a Element>)
where
    P: Fn(&str, &Attributes) -> bool,
{
    for child in children {
        if let Content::Element(el) = child {
            if pred(&el.tag, &el.attributes) {
                found.push(el);
            }
            collect_matches(&el.children, pred, found);
        }
    }
}

fn first_match<'a, P>(children: &'a [Content], pred: &P) -> Option<&'a Element>
where
    P: Fn(&str, &Attributes) -> bool,
{
    children.iter().find_map(|child| match child {
        Content::Element(el) if pred(&el.tag, &el.attributes) => Some(el),
        Content::Element(el) => first_match(&el.children, pred),
        Content::Text(_) => None,
    })
}
