//! Query interpretation.
//!
//! Maps free-text messages to a structured intent and the entities
//! (years, regions, top-N) mentioned in them.

pub mod interpreter;

pub use interpreter::*;
