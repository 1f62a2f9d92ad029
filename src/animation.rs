//! Animation types and the host player seam
//!
//! The polyfill does not run animations itself. It produces one request per
//! matched element ("animate through `[frame, frame]` with duration 0 and
//! fill forwards") and hands it to an [`AnimationPlayer`]. A zero-duration
//! fill-forwards animation applies the keyframe's computed values immediately
//! and keeps them after the (instantaneous) animation ends, which is how the
//! polyfill sets static values through an animation API.

use crate::dom::NodeId;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;

/// One animation waypoint: camel-case property name to trimmed value string.
///
/// Entries keep insertion order, mirroring declaration order in the source
/// CSS; re-inserting a property overwrites the value in place so the last
/// declaration wins without reordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyframe {
  entries: Vec<(String, String)>,
}

impl Keyframe {
  /// Create an empty keyframe.
  pub fn new() -> Self {
    Self::default()
  }

  /// Set a property, overwriting an existing entry in place.
  pub fn insert(&mut self, property: impl Into<String>, value: impl Into<String>) {
    let property = property.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(name, _)| *name == property) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((property, value)),
    }
  }

  /// Value for a property, if present.
  pub fn get(&self, property: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(name, _)| name == property)
      .map(|(_, value)| value.as_str())
  }

  /// Number of properties in the keyframe.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// True if no recognized property was recorded.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(name, value)| (name.as_str(), value.as_str()))
  }
}

impl Serialize for Keyframe {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (name, value) in &self.entries {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

/// Animation completion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
  /// Effect is removed once the animation finishes.
  None,
  /// Final value persists on the element after the animation finishes.
  Forwards,
}

/// Timing applied to every polyfill animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationTiming {
  /// Animation duration in milliseconds.
  pub duration_ms: f64,
  /// Completion policy.
  pub fill: FillMode,
}

impl AnimationTiming {
  /// The shared timing descriptor: instantaneous, value persists.
  pub const ZERO_FORWARDS: Self = Self {
    duration_ms: 0.0,
    fill: FillMode::Forwards,
  };
}

/// Host animation seam.
///
/// The document owner decides what starting an animation means; the polyfill
/// only issues requests. The two frames are always identical copies of one
/// keyframe since the intent is to set a static value, not interpolate.
pub trait AnimationPlayer {
  /// Start an animation on `target` through `frames` with `timing`.
  fn animate(&mut self, target: NodeId, frames: [Keyframe; 2], timing: AnimationTiming);
}

/// A single recorded animation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledAnimation {
  /// Pre-order id of the animated element.
  pub target: NodeId,
  /// Start and end frame (always identical).
  pub frames: [Keyframe; 2],
  /// Timing descriptor.
  pub timing: AnimationTiming,
}

/// Player that records every request in call order.
///
/// Used by tests and the CLI; also the reference for what a real host binding
/// receives and in what order.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
  animations: Vec<ScheduledAnimation>,
}

impl RecordingPlayer {
  /// Create an empty recorder.
  pub fn new() -> Self {
    Self::default()
  }

  /// Recorded requests in call order.
  pub fn animations(&self) -> &[ScheduledAnimation] {
    &self.animations
  }

  /// Consume the recorder, returning the recorded requests.
  pub fn into_animations(self) -> Vec<ScheduledAnimation> {
    self.animations
  }
}

impl AnimationPlayer for RecordingPlayer {
  fn animate(&mut self, target: NodeId, frames: [Keyframe; 2], timing: AnimationTiming) {
    self.animations.push(ScheduledAnimation {
      target,
      frames,
      timing,
    });
  }
}
