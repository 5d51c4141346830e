//! ASDL grammar model for grammar-constrained decoders.
//!
//! The `asdl-grammar` crate provides the closed, typed vocabulary of an
//! Abstract Syntax Description Language grammar (types, fields,
//! constructors and productions) and the [`Grammar`] aggregate that derives
//! deterministically ordered catalogs and dense integer ids from them. The
//! ids are the classification vocabulary of a neural decoder that predicts
//! grammar actions, so they must be stable across training runs and
//! checkpoint reloads.
//!
//! # Entry Point
//!
//! ```
//! let grammar = asdl_grammar::english::grammar()?;
//! assert_eq!(grammar.root_type().name(), "Sentence");
//! let question = grammar.production_for_constructor("Question")?;
//! let id = grammar.production_id(question);
//! assert_eq!(id.and_then(|id| grammar.production_by_id(id)), Some(question));
//! # Ok::<(), asdl_grammar::GrammarError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! # #[cfg(feature = "serializers")]
//! # {
//! let grammar = asdl_grammar::english::grammar()?;
//! let text = asdl_grammar::serializer::json::to_string_pretty(&grammar)?;
//! let reloaded = asdl_grammar::serializer::json::from_str(&text)?;
//! assert_eq!(reloaded.productions(), grammar.productions());
//! # }
//! # Ok::<(), asdl_grammar::GrammarError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod binding;
pub mod english;
pub mod error;
pub mod grammar;
pub mod model;
pub mod serializer;
pub mod tree;

pub use binding::LanguageBinding;
pub use error::{GrammarError, Result};
pub use grammar::{Grammar, TypeKey};
pub use model::{AsdlType, Cardinality, Constructor, Field, Production, TypeKind};
pub use tree::{AsdlTree, FieldValue, RealizedField};
