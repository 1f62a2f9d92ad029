//! motionfill
//!
//! A load-time polyfill pass for motion path properties
//! (<https://drafts.fxtf.org/motion-1/>) and individual transform properties
//! (<https://drafts.csswg.org/css-transforms-2/#individual-transforms>).
//!
//! Given a parsed document, [`polyfill::run`] scans `<style>` elements and
//! inline `style` attributes for the eight polyfilled properties and asks an
//! [`AnimationPlayer`] to start a zero-duration fill-forwards animation per
//! matched element, which applies the computed values once and keeps them.
//! The pass runs once, observes no later mutations, and does not resolve
//! selector specificity across rulesets.

pub mod animation;
pub mod css;
pub mod dom;
pub mod error;
pub mod polyfill;

pub use animation::{
  AnimationPlayer, AnimationTiming, FillMode, Keyframe, RecordingPlayer, ScheduledAnimation,
};
pub use dom::{parse_html, Document, NodeId};
pub use error::{Error, Result};
pub use polyfill::run;
