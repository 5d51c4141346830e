//! Error type shared by every grammar operation.
//!
//! Every failure here is a programming or data error in a grammar definition,
//! never a transient condition: there is no retry and no partial state.

use thiserror::Error;

/// Errors raised while building, querying or persisting a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// A cardinality label outside `single`, `optional`, `multiple`.
    #[error("invalid cardinality '{0}': expected 'single', 'optional' or 'multiple'")]
    InvalidCardinality(String),

    /// A grammar was built from an empty production sequence.
    #[error("a grammar needs at least one production")]
    EmptyGrammar,

    /// Two productions declare the same constructor name.
    #[error("constructor '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateConstructor {
        /// The repeated constructor name.
        name: String,
        /// Head type of the first declaration.
        first: String,
        /// Head type of the second declaration.
        second: String,
    },

    /// One type name is used as both a primitive and a composite type.
    #[error("type '{0}' is declared both primitive and composite")]
    ConflictingTypeKind(String),

    /// Lookup of a head type the grammar does not know.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Lookup of a constructor name the grammar does not know.
    #[error("unknown constructor '{0}'")]
    UnknownConstructor(String),

    /// Lookup of a field name a constructor does not declare.
    #[error("constructor '{constructor}' has no field '{field}'")]
    UnknownField {
        /// Constructor that was searched.
        constructor: String,
        /// Field name that was not found.
        field: String,
    },

    /// A value was added to a `single` or `optional` field that already holds one.
    #[error("field '{field}' is {cardinality} and already holds a value")]
    CardinalityViolation {
        /// Field name.
        field: String,
        /// Cardinality label of the field.
        cardinality: &'static str,
    },

    /// A `single` field of a tree holds no value.
    #[error("field '{field}' of '{constructor}' requires a value")]
    MissingValue {
        /// Constructor owning the field.
        constructor: String,
        /// Field name.
        field: String,
    },

    /// A tree value does not fit the type of the field holding it.
    #[error("field '{field}' expects type '{expected}', found '{found}'")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Declared field type.
        expected: String,
        /// What the field actually holds.
        found: String,
    },

    /// A persisted grammar document is structurally invalid.
    #[error("malformed grammar document: {0}")]
    MalformedDocument(String),

    /// A persisted vocabulary does not match the ids of the rebuilt grammar.
    #[error("stored {catalog} vocabulary differs from the rebuilt grammar at id {id}")]
    VocabularyMismatch {
        /// Which catalog diverged (`productions`, `types` or `fields`).
        catalog: &'static str,
        /// First id at which the catalogs differ.
        id: usize,
    },

    /// JSON (de)serialization failure.
    #[cfg(feature = "serializers")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
