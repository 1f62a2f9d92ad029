//! Declaration extraction
//!
//! Deliberately not a CSS parser. Declaration blocks are handled with the
//! same naive grammar as the original polyfill: strip comments, split on `;`,
//! split each candidate on its first `:`, look the property up in the
//! allowlist. Values containing further colons (URLs and the like) keep them;
//! that is acceptable for this allowlist's value grammars and nothing more is
//! promised.

use super::properties::polyfilled_properties;
use crate::animation::Keyframe;
use regex::Regex;
use std::sync::OnceLock;

/// Non-greedy `/* ... */` matcher. Nested comments are not handled; the open
/// of the outer comment pairs with the first close.
fn comment_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"))
}

/// Replace every comment span with a single space.
///
/// Applied to whole stylesheets before ruleset splitting (so a `}` inside a
/// comment cannot end a ruleset) and to inline style attribute values.
pub fn strip_comments(css: &str) -> String {
  comment_pattern().replace_all(css, " ").into_owned()
}

/// Extract a keyframe from a raw declaration-block string.
///
/// Input is the text between `{` and `}` of a ruleset, or an inline `style`
/// attribute value. Only allowlisted properties are recorded, keyed by their
/// camel-case names; everything else is dropped silently. A candidate with no
/// `:` separator is malformed and skipped. The result may be empty, in which
/// case the caller starts no animation.
pub fn extract_keyframe(declarations: &str) -> Keyframe {
  let source = strip_comments(declarations);
  let table = polyfilled_properties();

  let mut keyframe = Keyframe::new();
  for candidate in source.split(';') {
    let Some((property, value)) = candidate.split_once(':') else {
      continue;
    };
    if let Some(script_name) = table.get(property.trim()) {
      keyframe.insert(script_name, value.trim());
    }
  }
  keyframe
}
