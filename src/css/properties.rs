//! Polyfilled property table
//!
//! The polyfill recognizes a fixed allowlist of motion path and individual
//! transform properties. Each hyphenated CSS name maps to the camel-case name
//! the host animation API expects; everything outside the table is ignored.

use std::sync::OnceLock;

/// The fixed set of properties the polyfill applies.
///
/// Motion path properties per <https://drafts.fxtf.org/motion-1/>, individual
/// transform properties per
/// <https://drafts.csswg.org/css-transforms-2/#individual-transforms>.
pub const POLYFILLED_PROPERTY_NAMES: [&str; 8] = [
  "offset-anchor",
  "offset-distance",
  "offset-path",
  "offset-position",
  "offset-rotate",
  "rotate",
  "scale",
  "translate",
];

/// Convert a hyphenated CSS property name to its camel-case script name.
///
/// Only the first hyphen is folded: the character following it is upper-cased
/// and the hyphen removed. Names without a hyphen (or with nothing after it)
/// are returned unchanged. This is all the allowlist needs; it is not a
/// general CSS-to-IDL name mapping.
pub fn camel_case(property: &str) -> String {
  let Some(hyphen) = property.find('-') else {
    return property.to_string();
  };
  let rest = &property[hyphen + 1..];
  let Some(first) = rest.chars().next() else {
    return property.to_string();
  };
  let mut camel = String::with_capacity(property.len() - 1);
  camel.push_str(&property[..hyphen]);
  camel.extend(first.to_uppercase());
  camel.push_str(&rest[first.len_utf8()..]);
  camel
}

/// Immutable mapping from hyphenated property name to camel-case name.
///
/// Built once at first use from [`POLYFILLED_PROPERTY_NAMES`]; eight entries,
/// so lookups are a linear scan.
#[derive(Debug)]
pub struct PolyfilledProperties {
  entries: Vec<(&'static str, String)>,
}

impl PolyfilledProperties {
  fn build() -> Self {
    let entries = POLYFILLED_PROPERTY_NAMES
      .iter()
      .map(|name| (*name, camel_case(name)))
      .collect();
    Self { entries }
  }

  /// Look up the camel-case name for a hyphenated property name.
  pub fn get(&self, property: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(name, _)| *name == property)
      .map(|(_, camel)| camel.as_str())
  }

  /// True if the hyphenated name is in the allowlist.
  pub fn contains(&self, property: &str) -> bool {
    self.get(property).is_some()
  }

  /// Number of table entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// True if the table is empty (it never is in practice).
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Shared property table, built on first access.
pub fn polyfilled_properties() -> &'static PolyfilledProperties {
  static TABLE: OnceLock<PolyfilledProperties> = OnceLock::new();
  TABLE.get_or_init(PolyfilledProperties::build)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn camel_case_folds_first_hyphen() {
    assert_eq!(camel_case("offset-path"), "offsetPath");
    assert_eq!(camel_case("offset-anchor"), "offsetAnchor");
    assert_eq!(camel_case("offset-distance"), "offsetDistance");
  }

  #[test]
  fn camel_case_leaves_unhyphenated_names_alone() {
    assert_eq!(camel_case("rotate"), "rotate");
    assert_eq!(camel_case("scale"), "scale");
    assert_eq!(camel_case("translate"), "translate");
  }

  #[test]
  fn camel_case_handles_degenerate_inputs() {
    assert_eq!(camel_case(""), "");
    assert_eq!(camel_case("trailing-"), "trailing-");
    assert_eq!(camel_case("-leading"), "Leading");
  }

  #[test]
  fn table_covers_the_full_allowlist() {
    let table = polyfilled_properties();
    assert_eq!(table.len(), 8);
    for name in POLYFILLED_PROPERTY_NAMES {
      assert!(table.contains(name), "missing {name}");
    }
    assert_eq!(table.get("offset-rotate"), Some("offsetRotate"));
    assert_eq!(table.get("offset-position"), Some("offsetPosition"));
    assert_eq!(table.get("translate"), Some("translate"));
  }

  #[test]
  fn table_rejects_unlisted_properties() {
    let table = polyfilled_properties();
    assert_eq!(table.get("color"), None);
    assert_eq!(table.get("offset"), None);
    assert_eq!(table.get("offsetPath"), None);
    assert_eq!(table.get("transform"), None);
  }
}
