//! Allow-list enforcement on parser output
//!
//! The HTML a parser produces is parsed with `html5ever` into an `RcDom`, and a filtered copy of
//! the `<body>` subtree is built from it:
//!
//! - an allowed element is copied with only its allowed attributes
//! - a disallowed element is unwrapped: it disappears, its (filtered) children stay
//! - a few elements whose content is never text for the reader ([`DROP_WITH_CONTENT`]) are
//!   removed together with their content
//! - comments and processing instructions are dropped
//!
//! The walk is iterative, so deeply nested input cannot overflow the stack.
//!
//! Attributes are checked with [`crate::query::is_attribute_allowed`]. On top of the allow-list,
//! `on*` event handlers are always removed and URL attributes must be relative or use one of the
//! configured protocols. The filtered tree is written back out with `html5ever::serialize`.

use crate::allowlist::AllowList;
use crate::error::{Result, SieveError};
use crate::query::{is_attribute_allowed, is_tag_allowed};
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute,
    LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use url::Url;

/// Elements removed together with everything inside them
pub const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript", "textarea",
];

/// Attributes whose value is a URL
const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite", "action", "formaction", "poster"];

/// Options for the sanitization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// URL schemes kept on URL attributes; relative URLs are always kept
    pub allowed_protocols: Vec<String>,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            allowed_protocols: ["http", "https", "mailto", "ftp", "tel"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SanitizeOptions {
    pub fn with_protocols<I, S>(protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_protocols: protocols.into_iter().map(Into::into).collect(),
        }
    }
}

/// Remove everything `list` does not permit from an HTML fragment
pub fn sanitize_html(html: &str, list: &AllowList, options: &SanitizeOptions) -> Result<String> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);

    let Some(body) = find_element(&dom.document, "body") else {
        return Ok(String::new());
    };

    let filtered = filter_tree(&body, list, options);
    let kept = filtered.children.borrow();
    serialize_nodes(&kept)
}

/// First element named `name` in document order, found without recursion
fn find_element(root: &Handle, name: &str) -> Option<Handle> {
    let mut pending = vec![root.clone()];
    while let Some(handle) = pending.pop() {
        if let NodeData::Element { name: qual, .. } = &handle.data {
            if qual.local.as_ref() == name {
                return Some(handle);
            }
        }
        pending.extend(handle.children.borrow().iter().rev().cloned());
    }
    None
}

/// Build the filtered copy of `source`'s children under a fresh container node
///
/// The walk keeps its own stack of `(source node, output parent)` pairs, so nesting depth is
/// bounded by memory rather than by the call stack. Children are pushed in reverse, which makes
/// every subtree finish before its next sibling starts and keeps appends in document order.
fn filter_tree(source: &Handle, list: &AllowList, options: &SanitizeOptions) -> Handle {
    let root = create_element("body", Vec::new());
    let mut pending: Vec<(Handle, Handle)> = source
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), root.clone()))
        .collect();

    while let Some((node, target)) = pending.pop() {
        match &node.data {
            NodeData::Text { contents } => target
                .children
                .borrow_mut()
                .push(create_text(&contents.borrow())),
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref();
                if DROP_WITH_CONTENT.contains(&tag) {
                    continue;
                }

                let parent = if is_tag_allowed(list, tag) {
                    let kept_attrs = attrs
                        .borrow()
                        .iter()
                        .filter(|attr| keep_attribute(tag, attr, list, options))
                        .cloned()
                        .collect();
                    let element = create_element(tag, kept_attrs);
                    target.children.borrow_mut().push(element.clone());
                    element
                } else {
                    // unwrap: the children land where the element was
                    target
                };

                pending.extend(
                    node.children
                        .borrow()
                        .iter()
                        .rev()
                        .map(|child| (child.clone(), parent.clone())),
                );
            }
            // comments, doctypes, processing instructions
            _ => {}
        }
    }

    root
}

fn keep_attribute(
    tag: &str,
    attr: &Attribute,
    list: &AllowList,
    options: &SanitizeOptions,
) -> bool {
    let name = attr.name.local.as_ref();
    let value = attr.value.as_ref();

    if name.len() > 2 && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on")) {
        return false;
    }
    if !is_attribute_allowed(list, tag, name, value) {
        return false;
    }
    if URL_ATTRIBUTES.contains(&name) && !is_safe_url(value, &options.allowed_protocols) {
        tracing::warn!(tag, attribute = name, "Dropping URL with disallowed protocol");
        return false;
    }
    true
}

/// Relative URLs, or absolute URLs whose scheme is listed
fn is_safe_url(value: &str, allowed_protocols: &[String]) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => allowed_protocols
            .iter()
            .any(|protocol| protocol.eq_ignore_ascii_case(url.scheme())),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<Attribute>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attrs),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize the kept nodes, each including itself
fn serialize_nodes(nodes: &[Handle]) -> Result<String> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for node in nodes {
        let serializable = SerializableHandle::from(node.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| SieveError::Sanitize(format!("HTML serialization failed: {e}")))?;
    }

    String::from_utf8(output)
        .map_err(|e| SieveError::Sanitize(format!("UTF-8 conversion failed: {e}")))
}
