//! CSS support for the polyfill pass
//!
//! Selector parsing is a real (if small) grammar; declaration handling is
//! deliberately naive string splitting. Values are never validated, only
//! carried through to the animation request verbatim.

pub mod declarations;
pub mod properties;
pub mod selectors;
