//! The load-time polyfill pass
//!
//! One pass over a finished document, run exactly once:
//!
//! 1. Collect inline `style` attributes into pending animations (no side
//!    effects yet).
//! 2. Walk every `<style>` element, split its text into rulesets, and start
//!    an animation per matched element immediately.
//! 3. Apply the pending inline animations.
//!
//! Inline styles are collected first but applied last so that when both a
//! stylesheet and a `style` attribute target the same property on the same
//! element, the inline value gets the final write, mirroring inline-style
//! precedence. Full selector specificity across rulesets is deliberately not
//! honored: rulesets are processed in document order and later ones simply
//! re-animate. The pass never fails; every malformed input is skipped.

use crate::animation::AnimationPlayer;
use crate::animation::AnimationTiming;
use crate::animation::Keyframe;
use crate::css::declarations::extract_keyframe;
use crate::css::declarations::strip_comments;
use crate::dom::Document;
use crate::dom::NodeId;

/// An inline-style animation held between the collect and apply phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnimation {
  /// Element carrying the `style` attribute.
  pub target: NodeId,
  /// Keyframe extracted from the attribute value.
  pub keyframe: Keyframe,
}

/// Run the whole pass against a document.
pub fn run(document: &Document, player: &mut dyn AnimationPlayer) {
  let pending = collect_inline_styles(document);
  apply_stylesheets(document, player);
  apply_inline_styles(pending, player);
}

/// Collect phase: read every `style` attribute, keep the non-empty keyframes.
///
/// No animation is started here; the result is applied by
/// [`apply_inline_styles`] after stylesheet processing.
pub fn collect_inline_styles(document: &Document) -> Vec<PendingAnimation> {
  let mut pending = Vec::new();
  for target in document.query_selector_all("[style]") {
    let Some(declarations) = document.attribute(target, "style") else {
      continue;
    };
    let keyframe = extract_keyframe(&declarations);
    if keyframe.is_empty() {
      continue;
    }
    log::trace!(
      "collected inline style on {} ({} properties)",
      document.describe(target),
      keyframe.len()
    );
    pending.push(PendingAnimation { target, keyframe });
  }
  pending
}

/// Process every `<style>` element in document order.
///
/// Comments are stripped at whole-stylesheet granularity before ruleset
/// splitting so a `}` inside a comment cannot end a ruleset. The text after
/// the final `}` is never a complete ruleset and is dropped.
pub fn apply_stylesheets(document: &Document, player: &mut dyn AnimationPlayer) {
  for (id, text) in document.style_elements() {
    log::debug!("processing <style> element {}", document.describe(id));
    let text = strip_comments(&text);
    let mut rulesets: Vec<&str> = text.split('}').collect();
    rulesets.pop();
    for ruleset in rulesets {
      process_ruleset(document, ruleset, player);
    }
  }
}

/// Apply phase: start one animation per pending inline style, in collection
/// order.
pub fn apply_inline_styles(pending: Vec<PendingAnimation>, player: &mut dyn AnimationPlayer) {
  for PendingAnimation { target, keyframe } in pending {
    start_animation(player, target, keyframe);
  }
}

/// Process one `selector { declarations` chunk (the closing `}` was consumed
/// by the stylesheet split).
fn process_ruleset(document: &Document, ruleset: &str, player: &mut dyn AnimationPlayer) {
  let parts: Vec<&str> = ruleset.split('{').collect();
  let &[selectors, declarations] = parts.as_slice() else {
    // Zero or multiple `{`: malformed, skip the whole chunk.
    log::debug!("skipping malformed ruleset: {:?}", ruleset.trim());
    return;
  };

  let elements = document.query_selector_all(selectors.trim());
  if elements.is_empty() {
    return;
  }

  let keyframe = extract_keyframe(declarations);
  if keyframe.is_empty() {
    return;
  }

  for element in elements {
    start_animation(player, element, keyframe.clone());
  }
}

fn start_animation(player: &mut dyn AnimationPlayer, target: NodeId, keyframe: Keyframe) {
  // Identical start and end frame: the intent is to set a static value, not
  // interpolate.
  let frames = [keyframe.clone(), keyframe];
  player.animate(target, frames, AnimationTiming::ZERO_FORWARDS);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::animation::RecordingPlayer;
  use crate::dom::parse_html;

  fn run_pass(html: &str) -> (Document, RecordingPlayer) {
    let document = parse_html(html).unwrap();
    let mut player = RecordingPlayer::new();
    run(&document, &mut player);
    (document, player)
  }

  #[test]
  fn stylesheet_ruleset_animates_matching_elements() {
    let html = r#"
      <style>div.target { rotate: 45deg }</style>
      <div class="target"></div>
      <div></div>
    "#;
    let (document, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 1);
    assert_eq!(document.describe(animations[0].target), "div.target");
    assert_eq!(animations[0].frames[0].get("rotate"), Some("45deg"));
    assert_eq!(animations[0].frames[0], animations[0].frames[1]);
    assert_eq!(animations[0].timing, AnimationTiming::ZERO_FORWARDS);
  }

  #[test]
  fn rulesets_with_no_recognized_properties_are_skipped() {
    let html = r#"
      <style>div { color: red; margin: 0 }</style>
      <div></div>
    "#;
    let (_, player) = run_pass(html);
    assert!(player.animations().is_empty());
  }

  #[test]
  fn rulesets_with_no_matching_elements_are_skipped() {
    let html = r#"
      <style>.absent { rotate: 45deg }</style>
      <div></div>
    "#;
    let (_, player) = run_pass(html);
    assert!(player.animations().is_empty());
  }

  #[test]
  fn malformed_rulesets_are_skipped_without_panicking() {
    let html = r#"
      <style>
        div { rotate: 1deg } }
        span { { scale: 2 }
        em { translate: 3px }
      </style>
      <div></div><span></span><em></em>
    "#;
    let (document, player) = run_pass(html);
    // "div { rotate: 1deg " is fine; the stray "}" makes the next chunk " "
    // (zero braces, skipped); "span { { scale: 2 " has two braces (skipped);
    // "em { translate: 3px " is fine again.
    let animations = player.animations();
    assert_eq!(animations.len(), 2);
    assert_eq!(document.describe(animations[0].target), "div");
    assert_eq!(document.describe(animations[1].target), "em");
  }

  #[test]
  fn trailing_text_after_the_final_brace_is_ignored() {
    let html = r#"
      <style>div { rotate: 1deg } span { scale: 2</style>
      <div></div><span></span>
    "#;
    let (document, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 1);
    assert_eq!(document.describe(animations[0].target), "div");
  }

  #[test]
  fn comments_cannot_terminate_a_ruleset() {
    let html = r#"
      <style>div { /* } not a close */ rotate: 1deg }</style>
      <div></div>
    "#;
    let (_, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 1);
    assert_eq!(animations[0].frames[0].get("rotate"), Some("1deg"));
  }

  #[test]
  fn inline_styles_apply_after_stylesheets() {
    let html = r#"
      <style>div { rotate: 10deg }</style>
      <div id="box" style="rotate: 99deg"></div>
    "#;
    let (document, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 2);
    // Both target the same element; the inline-style animation comes last
    // and therefore takes the final write.
    assert_eq!(animations[0].target, animations[1].target);
    assert_eq!(document.describe(animations[1].target), "div#box");
    assert_eq!(animations[0].frames[0].get("rotate"), Some("10deg"));
    assert_eq!(animations[1].frames[0].get("rotate"), Some("99deg"));
  }

  #[test]
  fn inline_styles_keep_only_allowlisted_properties() {
    let html = r#"<div style="scale: 2; color: red"></div>"#;
    let (_, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 1);
    let keyframe = &animations[0].frames[0];
    assert_eq!(keyframe.len(), 1);
    assert_eq!(keyframe.get("scale"), Some("2"));
    assert_eq!(keyframe.get("color"), None);
  }

  #[test]
  fn inline_styles_with_no_recognized_properties_produce_nothing() {
    let html = r#"<div style="color: red"></div>"#;
    let (_, player) = run_pass(html);
    assert!(player.animations().is_empty());
  }

  #[test]
  fn collect_phase_has_no_side_effects() {
    let html = r#"<div style="rotate: 5deg"></div>"#;
    let document = parse_html(html).unwrap();
    let pending = collect_inline_styles(&document);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].keyframe.get("rotate"), Some("5deg"));

    let mut player = RecordingPlayer::new();
    apply_inline_styles(pending, &mut player);
    assert_eq!(player.animations().len(), 1);
  }

  #[test]
  fn later_rulesets_re_animate_earlier_targets() {
    let html = r#"
      <style>
        div { rotate: 1deg }
        div { rotate: 2deg }
      </style>
      <div></div>
    "#;
    let (_, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 2);
    assert_eq!(animations[0].frames[0].get("rotate"), Some("1deg"));
    assert_eq!(animations[1].frames[0].get("rotate"), Some("2deg"));
  }

  #[test]
  fn multiple_stylesheets_process_in_document_order() {
    let html = r#"
      <style>div { rotate: 1deg }</style>
      <style>div { scale: 2 }</style>
      <div></div>
    "#;
    let (_, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 2);
    assert_eq!(animations[0].frames[0].get("rotate"), Some("1deg"));
    assert_eq!(animations[1].frames[0].get("scale"), Some("2"));
  }

  #[test]
  fn selector_groups_animate_every_match() {
    let html = r#"
      <style>#a, #b { translate: 1px }</style>
      <div id="a"></div><div id="b"></div>
    "#;
    let (document, player) = run_pass(html);
    let animations = player.animations();
    assert_eq!(animations.len(), 2);
    assert_eq!(document.describe(animations[0].target), "div#a");
    assert_eq!(document.describe(animations[1].target), "div#b");
  }
}
