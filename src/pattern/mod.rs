//! Wildcard pattern handling.
//!
//! This module handles:
//! - Compiling `*` wildcard patterns into anchored matchers
//! - Capturing the text bound to each wildcard
//! - Substituting captures into a replacement pattern

pub mod generator;
pub mod matcher;

pub use generator::{generate, generate_from};
pub use matcher::{CompiledMatcher, WILDCARD, WildcardPattern};
