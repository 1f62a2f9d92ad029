//! DOM tree and selector queries
//!
//! Parses HTML with html5ever into an owned [`DomNode`] tree and answers the
//! three questions the polyfill asks of a document: which elements match a
//! selector, which `<style>` elements exist and what text they hold, and what
//! an element's `style` attribute says. Elements are identified by their
//! pre-order position ([`NodeId`]), stable for the life of the [`Document`].

use crate::css::selectors::parse_selector_list;
use crate::css::selectors::Combinator;
use crate::css::selectors::ComplexSelector;
use crate::css::selectors::CompoundSelector;
use crate::css::selectors::PseudoClass;
use crate::css::selectors::SelectorList;
use crate::css::selectors::SimpleSelector;
use crate::error::Error;
use crate::error::ParseError;
use crate::error::Result;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::Handle;
use markup5ever_rcdom::NodeData;
use markup5ever_rcdom::RcDom;
use serde::Serialize;
use std::io;
use std::ptr;

pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Pre-order index of a node in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct DomNode {
  pub node_type: DomNodeType,
  pub children: Vec<DomNode>,
}

#[derive(Debug, Clone)]
pub enum DomNodeType {
  Document,
  Element {
    tag_name: String,
    namespace: String,
    attributes: Vec<(String, String)>,
  },
  Text {
    content: String,
  },
}

impl DomNode {
  /// Tag name if this is an element.
  pub fn tag_name(&self) -> Option<&str> {
    match &self.node_type {
      DomNodeType::Element { tag_name, .. } => Some(tag_name),
      _ => None,
    }
  }

  /// Element namespace URL, if this is an element.
  pub fn namespace(&self) -> Option<&str> {
    match &self.node_type {
      DomNodeType::Element { namespace, .. } => Some(namespace),
      _ => None,
    }
  }

  pub fn is_element(&self) -> bool {
    matches!(self.node_type, DomNodeType::Element { .. })
  }

  /// True for elements in the HTML namespace (or with none recorded).
  pub fn is_html_element(&self) -> bool {
    match self.namespace() {
      Some(ns) => ns.is_empty() || ns == HTML_NAMESPACE,
      None => false,
    }
  }

  /// Attribute value by name. HTML attribute names are matched
  /// case-insensitively; foreign content is matched exactly.
  pub fn get_attribute_ref(&self, name: &str) -> Option<&str> {
    let DomNodeType::Element { attributes, .. } = &self.node_type else {
      return None;
    };
    let is_html = self.is_html_element();
    attributes
      .iter()
      .find(|(attr_name, _)| {
        if is_html {
          attr_name.eq_ignore_ascii_case(name)
        } else {
          attr_name == name
        }
      })
      .map(|(_, value)| value.as_str())
  }

  /// True if the `class` attribute contains the given token.
  pub fn has_class(&self, class: &str) -> bool {
    self
      .get_attribute_ref("class")
      .map(|value| value.split_ascii_whitespace().any(|token| token == class))
      .unwrap_or(false)
  }

  /// Concatenated text of all descendant text nodes, in document order.
  pub fn text_content(&self) -> String {
    let mut text = String::new();
    collect_text(self, &mut text);
    text
  }
}

fn collect_text(node: &DomNode, out: &mut String) {
  if let DomNodeType::Text { content } = &node.node_type {
    out.push_str(content);
  }
  for child in &node.children {
    collect_text(child, out);
  }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse an HTML document with scripting disabled.
///
/// html5ever recovers from malformed markup, so this only fails if the
/// underlying read does.
pub fn parse_html(html: &str) -> Result<Document> {
  let opts = ParseOpts {
    tree_builder: TreeBuilderOpts {
      scripting_enabled: false,
      ..Default::default()
    },
    ..Default::default()
  };

  let mut reader = io::Cursor::new(html.as_bytes());
  let dom = parse_document(RcDom::default(), opts)
    .from_utf8()
    .read_from(&mut reader)
    .map_err(|e| {
      Error::Parse(ParseError::InvalidHtml {
        message: format!("failed to parse HTML: {}", e),
      })
    })?;

  let root = convert_handle(&dom.document).unwrap_or(DomNode {
    node_type: DomNodeType::Document,
    children: Vec::new(),
  });
  Ok(Document { root })
}

fn convert_handle(handle: &Handle) -> Option<DomNode> {
  let node_type = match &handle.data {
    NodeData::Document => DomNodeType::Document,
    NodeData::Element { name, attrs, .. } => {
      let attributes = attrs
        .borrow()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect();
      DomNodeType::Element {
        tag_name: name.local.to_string(),
        namespace: name.ns.to_string(),
        attributes,
      }
    }
    NodeData::Text { contents } => DomNodeType::Text {
      content: contents.borrow().to_string(),
    },
    // Doctype, comments, and processing instructions carry nothing the
    // polyfill reads.
    _ => return None,
  };

  let children = handle
    .children
    .borrow()
    .iter()
    .filter_map(convert_handle)
    .collect();
  Some(DomNode {
    node_type,
    children,
  })
}

// ============================================================================
// Document
// ============================================================================

/// A parsed document plus the query surface the polyfill consumes.
#[derive(Debug, Clone)]
pub struct Document {
  root: DomNode,
}

impl Document {
  /// Build a document directly from a node tree (tests mostly).
  pub fn from_root(root: DomNode) -> Self {
    Self { root }
  }

  pub fn root(&self) -> &DomNode {
    &self.root
  }

  /// All elements matching a selector list, in document order.
  ///
  /// Selector text this engine cannot parse matches nothing: the polyfill's
  /// error model is silent skip, so a parse failure is debug-logged and an
  /// empty list returned.
  pub fn query_selector_all(&self, selectors: &str) -> Vec<NodeId> {
    let list = match parse_selector_list(selectors) {
      Ok(list) => list,
      Err(error) => {
        log::debug!("skipping unparseable selector: {}", error);
        return Vec::new();
      }
    };

    let mut matches = Vec::new();
    self.for_each_element(&mut |id, node, ancestors| {
      let element = ElementRef {
        node,
        ancestors,
      };
      if matches_selector_list(&element, &list) {
        matches.push(id);
      }
    });
    matches
  }

  /// Every `<style>` element in document order with its text content.
  pub fn style_elements(&self) -> Vec<(NodeId, String)> {
    let mut styles = Vec::new();
    self.for_each_element(&mut |id, node, _| {
      let is_style = node.is_html_element()
        && node
          .tag_name()
          .is_some_and(|tag| tag.eq_ignore_ascii_case("style"));
      if is_style {
        styles.push((id, node.text_content()));
      }
    });
    styles
  }

  /// Attribute value of the node with the given id.
  pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
    self
      .node_at(id)
      .and_then(|node| node.get_attribute_ref(name))
      .map(str::to_string)
  }

  /// Short human-readable description of an element, e.g. `div#box.target`.
  pub fn describe(&self, id: NodeId) -> String {
    let Some(node) = self.node_at(id) else {
      return format!("#{}", id.0);
    };
    let mut description = node.tag_name().unwrap_or("?").to_string();
    if let Some(element_id) = node.get_attribute_ref("id") {
      description.push('#');
      description.push_str(element_id);
    }
    if let Some(classes) = node.get_attribute_ref("class") {
      for class in classes.split_ascii_whitespace() {
        description.push('.');
        description.push_str(class);
      }
    }
    description
  }

  /// Node by pre-order id.
  pub fn node_at(&self, id: NodeId) -> Option<&DomNode> {
    let mut next = 0usize;
    find_node(&self.root, id.0, &mut next)
  }

  /// Visit every element in pre-order with its id and ancestor chain.
  fn for_each_element<'a, F>(&'a self, visit: &mut F)
  where
    F: FnMut(NodeId, &'a DomNode, &[&'a DomNode]),
  {
    let mut ancestors: Vec<&DomNode> = Vec::new();
    let mut next = 0usize;
    walk_elements(&self.root, &mut ancestors, &mut next, visit);
  }
}

fn find_node<'a>(node: &'a DomNode, wanted: usize, next: &mut usize) -> Option<&'a DomNode> {
  let id = *next;
  *next += 1;
  if id == wanted {
    return Some(node);
  }
  for child in &node.children {
    if let Some(found) = find_node(child, wanted, next) {
      return Some(found);
    }
  }
  None
}

fn walk_elements<'a, F>(
  node: &'a DomNode,
  ancestors: &mut Vec<&'a DomNode>,
  next: &mut usize,
  visit: &mut F,
) where
  F: FnMut(NodeId, &'a DomNode, &[&'a DomNode]),
{
  let id = NodeId(*next);
  *next += 1;
  if node.is_element() {
    visit(id, node, ancestors);
  }
  ancestors.push(node);
  for child in &node.children {
    walk_elements(child, ancestors, next, visit);
  }
  ancestors.pop();
}

// ============================================================================
// Selector matching
// ============================================================================

/// An element plus the ancestor chain needed for combinator matching.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
  pub node: &'a DomNode,
  /// Every ancestor node from the document root down to the parent.
  ancestors: &'a [&'a DomNode],
}

impl<'a> ElementRef<'a> {
  pub fn new(node: &'a DomNode, ancestors: &'a [&'a DomNode]) -> Self {
    Self { node, ancestors }
  }

  fn parent_element(&self) -> Option<ElementRef<'a>> {
    let (&parent, rest) = self.ancestors.split_last()?;
    if !parent.is_element() {
      return None;
    }
    Some(ElementRef {
      node: parent,
      ancestors: rest,
    })
  }

  fn prev_sibling_element(&self) -> Option<ElementRef<'a>> {
    let parent = self.ancestors.last()?;
    let mut prev: Option<&'a DomNode> = None;
    for child in &parent.children {
      if ptr::eq(child, self.node) {
        return prev.map(|node| ElementRef {
          node,
          ancestors: self.ancestors,
        });
      }
      if child.is_element() {
        prev = Some(child);
      }
    }
    None
  }

  fn next_sibling_element(&self) -> Option<ElementRef<'a>> {
    let parent = self.ancestors.last()?;
    let mut seen_self = false;
    for child in &parent.children {
      if seen_self && child.is_element() {
        return Some(ElementRef {
          node: child,
          ancestors: self.ancestors,
        });
      }
      if ptr::eq(child, self.node) {
        seen_self = true;
      }
    }
    None
  }
}

/// Match a selector list against an element.
pub fn matches_selector_list(element: &ElementRef<'_>, list: &SelectorList) -> bool {
  list
    .selectors
    .iter()
    .any(|selector| matches_complex(element, selector))
}

/// Match a complex selector right-to-left with backtracking on the
/// descendant and subsequent-sibling combinators.
fn matches_complex(element: &ElementRef<'_>, selector: &ComplexSelector) -> bool {
  matches_from(element, selector, selector.rest.len())
}

fn compound_at(selector: &ComplexSelector, index: usize) -> &CompoundSelector {
  if index == 0 {
    &selector.first
  } else {
    &selector.rest[index - 1].1
  }
}

fn matches_from(element: &ElementRef<'_>, selector: &ComplexSelector, index: usize) -> bool {
  if !matches_compound(element, compound_at(selector, index)) {
    return false;
  }
  if index == 0 {
    return true;
  }

  match selector.rest[index - 1].0 {
    Combinator::Child => element
      .parent_element()
      .is_some_and(|parent| matches_from(&parent, selector, index - 1)),
    Combinator::Descendant => {
      let mut current = element.parent_element();
      while let Some(ancestor) = current {
        if matches_from(&ancestor, selector, index - 1) {
          return true;
        }
        current = ancestor.parent_element();
      }
      false
    }
    Combinator::NextSibling => element
      .prev_sibling_element()
      .is_some_and(|sibling| matches_from(&sibling, selector, index - 1)),
    Combinator::SubsequentSibling => {
      let mut current = element.prev_sibling_element();
      while let Some(sibling) = current {
        if matches_from(&sibling, selector, index - 1) {
          return true;
        }
        current = sibling.prev_sibling_element();
      }
      false
    }
  }
}

/// Match a compound selector against a single element.
pub fn matches_compound(element: &ElementRef<'_>, compound: &CompoundSelector) -> bool {
  compound
    .simples
    .iter()
    .all(|simple| matches_simple(element, simple))
}

fn matches_simple(element: &ElementRef<'_>, simple: &SimpleSelector) -> bool {
  match simple {
    SimpleSelector::Universal => true,
    SimpleSelector::Type(tag) => element
      .node
      .tag_name()
      .is_some_and(|name| name.eq_ignore_ascii_case(tag)),
    SimpleSelector::Id(id) => element.node.get_attribute_ref("id") == Some(id.as_str()),
    SimpleSelector::Class(class) => element.node.has_class(class),
    SimpleSelector::AttrExists(name) => element.node.get_attribute_ref(name).is_some(),
    SimpleSelector::AttrEquals { name, value } => {
      element.node.get_attribute_ref(name) == Some(value.as_str())
    }
    SimpleSelector::Pseudo(pseudo) => matches_pseudo_class(element, *pseudo),
  }
}

fn matches_pseudo_class(element: &ElementRef<'_>, pseudo: PseudoClass) -> bool {
  match pseudo {
    PseudoClass::Root => {
      element.parent_element().is_none()
        && element.node.is_html_element()
        && element
          .node
          .tag_name()
          .is_some_and(|tag| tag.eq_ignore_ascii_case("html"))
    }
    PseudoClass::FirstChild => element.prev_sibling_element().is_none(),
    PseudoClass::LastChild => element.next_sibling_element().is_none(),
    PseudoClass::OnlyChild => {
      element.prev_sibling_element().is_none() && element.next_sibling_element().is_none()
    }
    // Text nodes count, including whitespace; comments were dropped at parse.
    PseudoClass::Empty => element.node.children.is_empty(),
  }
}
