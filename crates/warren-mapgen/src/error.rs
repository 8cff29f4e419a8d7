//! Failure taxonomy for map generation.

use thiserror::Error;

/// Errors raised while configuring or running a generator.
///
/// `RegenerateMap` is the only recoverable variant: it marks the map in
/// progress as unsalvageable and is caught by the safe driver, which retries
/// from a fresh context. Everything else is a programmer error and fails
/// fast.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("invalid configuration for step {step}, parameter {parameter}: {message}")]
    InvalidConfiguration { step: String, parameter: &'static str, message: String },

    #[error("step {step} requires a component of type {type_name} with tag {tag:?}")]
    MissingComponent { step: String, type_name: &'static str, tag: Option<String> },

    #[error("a component of type {type_name} with tag {tag:?} already exists in the context")]
    DuplicateComponent { type_name: &'static str, tag: Option<String> },

    #[error("the map being generated is unsalvageable and must be regenerated: {reason}")]
    RegenerateMap { reason: String },

    #[error("map generation failed after {attempts} attempts")]
    GenerationFailed { attempts: u32 },
}

impl GenerationError {
    pub(crate) fn invalid(
        step: &str,
        parameter: &'static str,
        message: impl Into<String>,
    ) -> Self {
        GenerationError::InvalidConfiguration {
            step: step.to_owned(),
            parameter,
            message: message.into(),
        }
    }

    pub(crate) fn regenerate(reason: impl Into<String>) -> Self {
        GenerationError::RegenerateMap { reason: reason.into() }
    }
}
