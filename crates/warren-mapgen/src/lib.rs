//! Composable, staged procedural map generation.
//!
//! A [`Generator`] owns a [`GenerationContext`] (a typed, tagged bag of
//! components such as the wall-floor grid and the room list) and an ordered
//! list of [`GenerationStep`]s that read and mutate it. Steps advance through
//! explicit stages so callers can single-step a generation for debugging, and
//! the safe driver retries the whole configuration when a step signals that
//! the map in progress cannot be repaired.

pub mod connection;
pub mod context;
pub mod error;
pub mod generator;
pub mod pipelines;
pub mod rng;
pub mod step;
pub mod steps;

pub use context::{tags, DoorList, GenerationContext, ItemEntry, ItemList, RoomDoors};
pub use error::GenerationError;
pub use generator::{Generator, SafeStageRunner, Stage, StageRunner};
pub use rng::{derive_stream, RogueRng};
pub use step::{ComponentRequirement, GenerationStep, StepProgress};
