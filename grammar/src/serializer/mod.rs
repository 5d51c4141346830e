//! Serializers for grammars.
//!
//! Two output formats are supported:
//! - **JSON** ([`json`]): the persisted form stored next to model checkpoints.
//!   Reloading verifies that every id still denotes the same entity.
//! - **ASDL text** ([`text`]): a human-readable dump for logs and diffs

#[cfg(feature = "serializers")]
pub mod json;
pub mod text;
