//! Scalar sense propagation through resistance grids.
//!
//! A [`SenseSource`] spreads intensity outward from its position into a local
//! buffer, attenuated by distance and blocked by cells whose resistance
//! reaches the source's intensity. A [`SenseMap`] owns many sources,
//! aggregates their buffers into one result view by addition, and tracks
//! which positions entered or left the sensed field between calculations.

mod ripple;
mod sense_map;
mod shadowcast;
mod source;

pub use sense_map::{SenseMap, SourceId};
pub use source::{RippleType, SenseSource, SenseSourceError, SourceAlgorithm};
