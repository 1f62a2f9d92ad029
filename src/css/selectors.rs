//! CSS selector parsing
//!
//! A small Selectors Level 3 subset: type, universal, id, class, and
//! attribute selectors, the four combinators, comma-separated lists, and a
//! handful of structural pseudo-classes. Anything else fails to parse, and
//! the caller treats the ruleset as matching nothing.
//!
//! Matching lives in [`crate::dom`], next to the element tree it walks.

use crate::error::ParseError;

/// Simple selectors (subset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
  /// `*`
  Universal,
  /// Type selector, stored ASCII-lowercase.
  Type(String),
  /// `#id`
  Id(String),
  /// `.class`
  Class(String),
  /// `[attr]`
  AttrExists(String),
  /// `[attr=value]`
  AttrEquals { name: String, value: String },
  /// `:pseudo-class`
  Pseudo(PseudoClass),
}

/// Structural pseudo-classes we support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
  Root,
  FirstChild,
  LastChild,
  OnlyChild,
  Empty,
}

/// A sequence of simple selectors with no combinators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
  pub simples: Vec<SimpleSelector>,
}

/// Combinators between compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
  /// Whitespace
  Descendant,
  /// `>`
  Child,
  /// `+`
  NextSibling,
  /// `~`
  SubsequentSibling,
}

/// One or more compounds joined by combinators, leftmost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexSelector {
  pub first: CompoundSelector,
  pub rest: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
  /// The compound the subject element itself must match.
  pub fn rightmost(&self) -> &CompoundSelector {
    self
      .rest
      .last()
      .map(|(_, compound)| compound)
      .unwrap_or(&self.first)
  }
}

/// A comma-separated group of selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
  pub selectors: Vec<ComplexSelector>,
}

/// Parse a selector list, e.g. `div.target, #nav > [style]`.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, ParseError> {
  let mut selectors = Vec::new();
  for part in input.split(',') {
    selectors.push(parse_complex(part).map_err(|message| ParseError::InvalidSelector {
      selector: input.trim().to_string(),
      message,
    })?);
  }
  Ok(SelectorList { selectors })
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Simple(SimpleSelector),
  Combinator(Combinator),
  /// Whitespace between compounds; a descendant combinator if a compound
  /// follows, ignorable otherwise.
  Whitespace,
}

struct Tokenizer<'a> {
  input: &'a [u8],
  index: usize,
}

impl<'a> Tokenizer<'a> {
  fn new(input: &'a str) -> Self {
    Self {
      input: input.as_bytes(),
      index: 0,
    }
  }

  fn next(&mut self) -> Result<Option<Token>, String> {
    if self.skip_whitespace() {
      return Ok(Some(Token::Whitespace));
    }
    let Some(&byte) = self.input.get(self.index) else {
      return Ok(None);
    };
    let token = match byte {
      b'*' => {
        self.index += 1;
        Token::Simple(SimpleSelector::Universal)
      }
      b'.' => {
        self.index += 1;
        let name = self.consume_identifier()?;
        Token::Simple(SimpleSelector::Class(name))
      }
      b'#' => {
        self.index += 1;
        let name = self.consume_identifier()?;
        Token::Simple(SimpleSelector::Id(name))
      }
      b'[' => Token::Simple(self.consume_attribute()?),
      b':' => Token::Simple(SimpleSelector::Pseudo(self.consume_pseudo_class()?)),
      b'>' => {
        self.index += 1;
        Token::Combinator(Combinator::Child)
      }
      b'+' => {
        self.index += 1;
        Token::Combinator(Combinator::NextSibling)
      }
      b'~' => {
        self.index += 1;
        Token::Combinator(Combinator::SubsequentSibling)
      }
      _ => {
        let name = self.consume_identifier()?;
        Token::Simple(SimpleSelector::Type(name.to_ascii_lowercase()))
      }
    };
    Ok(Some(token))
  }

  /// Skip whitespace; true if any was skipped and more input remains.
  fn skip_whitespace(&mut self) -> bool {
    let start = self.index;
    while self
      .input
      .get(self.index)
      .is_some_and(|byte| byte.is_ascii_whitespace())
    {
      self.index += 1;
    }
    self.index > start && self.index < self.input.len()
  }

  fn consume_identifier(&mut self) -> Result<String, String> {
    let start = self.index;
    while self.input.get(self.index).is_some_and(is_identifier_byte) {
      self.index += 1;
    }
    if self.index == start {
      return match self.input.get(self.index) {
        Some(&byte) => Err(format!("unexpected character '{}'", byte as char)),
        None => Err("unexpected end of selector".to_string()),
      };
    }
    // Identifier bytes are all ASCII, so this cannot split a code point.
    Ok(String::from_utf8_lossy(&self.input[start..self.index]).into_owned())
  }

  fn consume_attribute(&mut self) -> Result<SimpleSelector, String> {
    debug_assert_eq!(self.input.get(self.index), Some(&b'['));
    self.index += 1;
    self.skip_whitespace();
    let name = self.consume_identifier()?.to_ascii_lowercase();
    self.skip_whitespace();
    match self.input.get(self.index) {
      Some(b']') => {
        self.index += 1;
        Ok(SimpleSelector::AttrExists(name))
      }
      Some(b'=') => {
        self.index += 1;
        self.skip_whitespace();
        let value = self.consume_attribute_value()?;
        self.skip_whitespace();
        match self.input.get(self.index) {
          Some(b']') => {
            self.index += 1;
            Ok(SimpleSelector::AttrEquals { name, value })
          }
          _ => Err("expected ']' after attribute value".to_string()),
        }
      }
      Some(&byte) => Err(format!(
        "unsupported attribute operator '{}'",
        byte as char
      )),
      None => Err("unterminated attribute selector".to_string()),
    }
  }

  fn consume_attribute_value(&mut self) -> Result<String, String> {
    match self.input.get(self.index) {
      Some(&quote) if quote == b'"' || quote == b'\'' => {
        self.index += 1;
        let start = self.index;
        while self.input.get(self.index).is_some_and(|&byte| byte != quote) {
          self.index += 1;
        }
        if self.input.get(self.index).is_none() {
          return Err("unterminated attribute value".to_string());
        }
        let value = String::from_utf8_lossy(&self.input[start..self.index]).into_owned();
        self.index += 1;
        Ok(value)
      }
      _ => self.consume_identifier(),
    }
  }

  fn consume_pseudo_class(&mut self) -> Result<PseudoClass, String> {
    debug_assert_eq!(self.input.get(self.index), Some(&b':'));
    self.index += 1;
    if self.input.get(self.index) == Some(&b':') {
      return Err("pseudo-elements are not supported".to_string());
    }
    let name = self.consume_identifier()?;
    match name.as_str() {
      "root" => Ok(PseudoClass::Root),
      "first-child" => Ok(PseudoClass::FirstChild),
      "last-child" => Ok(PseudoClass::LastChild),
      "only-child" => Ok(PseudoClass::OnlyChild),
      "empty" => Ok(PseudoClass::Empty),
      _ => Err(format!("unsupported pseudo-class ':{name}'")),
    }
  }
}

fn is_identifier_byte(byte: &u8) -> bool {
  byte.is_ascii_alphanumeric() || *byte == b'-' || *byte == b'_'
}

// ============================================================================
// Parser
// ============================================================================

fn parse_complex(input: &str) -> Result<ComplexSelector, String> {
  let mut tokenizer = Tokenizer::new(input.trim());

  // Flat list of compounds, each tagged with the combinator preceding it
  // (None for the leftmost).
  let mut compounds: Vec<(Option<Combinator>, CompoundSelector)> = Vec::new();
  let mut current = CompoundSelector::default();
  let mut current_combinator: Option<Combinator> = None;
  // Separator seen since `current` was completed. Whitespace only commits to
  // a descendant combinator once a simple selector actually follows.
  let mut pending_explicit: Option<Combinator> = None;
  let mut pending_whitespace = false;

  while let Some(token) = tokenizer.next()? {
    match token {
      Token::Simple(simple) => {
        if !current.simples.is_empty() && (pending_explicit.is_some() || pending_whitespace) {
          compounds.push((current_combinator, std::mem::take(&mut current)));
          current_combinator = Some(pending_explicit.take().unwrap_or(Combinator::Descendant));
        }
        pending_whitespace = false;
        current.simples.push(simple);
      }
      Token::Combinator(combinator) => {
        if current.simples.is_empty() {
          return Err("combinator with no preceding compound".to_string());
        }
        if pending_explicit.is_some() {
          return Err("consecutive combinators".to_string());
        }
        pending_explicit = Some(combinator);
        pending_whitespace = false;
      }
      Token::Whitespace => {
        pending_whitespace = true;
      }
    }
  }

  if pending_explicit.is_some() {
    return Err("selector ends with a combinator".to_string());
  }
  if current.simples.is_empty() {
    return Err("empty selector".to_string());
  }
  compounds.push((current_combinator, current));

  let mut parts = compounds.into_iter();
  let first = match parts.next() {
    Some((_, compound)) => compound,
    None => return Err("empty selector".to_string()),
  };
  let mut rest = Vec::with_capacity(parts.len());
  for (combinator, compound) in parts {
    // Every compound after the first was pushed with its combinator set.
    let Some(combinator) = combinator else {
      return Err("missing combinator".to_string());
    };
    rest.push((combinator, compound));
  }
  Ok(ComplexSelector { first, rest })
}
