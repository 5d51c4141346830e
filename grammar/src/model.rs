//! Core grammar entities: types, fields, constructors and productions.
//!
//! All entities are immutable values. Equality and hashing are structural,
//! except for [`AsdlType`], whose identity is its name alone. Entities are
//! assembled bottom-up (types, then fields, then constructors, then
//! productions) and handed to [`Grammar::new`](crate::Grammar::new).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{GrammarError, Result};

/// Whether a type is an atomic leaf or is built from productions.
///
/// - `Primitive`: a token or literal with no further grammar structure
/// - `Composite`: an internal tree node built by one of its constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Atomic leaf value (word, identifier, literal).
    Primitive,
    /// Built recursively through productions.
    Composite,
}

impl TypeKind {
    /// Returns the lowercase label used in persisted grammars.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Composite => "composite",
        }
    }
}

/// A named ASDL type.
///
/// Two types are equal iff their names match; the kind does not take part in
/// identity, hashing or ordering. Types order by name.
#[derive(Debug, Clone)]
pub struct AsdlType {
    name: String,
    kind: TypeKind,
}

impl AsdlType {
    /// Creates a type with an explicit kind.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates a primitive (leaf) type.
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Primitive)
    }

    /// Creates a composite type.
    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Composite)
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primitive or composite.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns `true` for primitive types.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }

    /// Returns `true` for composite types.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.kind == TypeKind::Composite
    }
}

impl PartialEq for AsdlType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for AsdlType {}

impl Hash for AsdlType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for AsdlType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AsdlType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for AsdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one value.
    Single,
    /// Zero or one value.
    Optional,
    /// Zero or more values.
    Multiple,
}

impl Cardinality {
    /// Returns the label (`single`, `optional`, `multiple`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::Single => "single",
            Cardinality::Optional => "optional",
            Cardinality::Multiple => "multiple",
        }
    }

    /// Returns the display suffix: empty, `?` or `*`.
    ///
    /// Textual grammar dumps depend on this exact convention.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Cardinality::Single => "",
            Cardinality::Optional => "?",
            Cardinality::Multiple => "*",
        }
    }

    /// Whether the field can hold more than one value.
    #[must_use]
    pub fn allows_many(self) -> bool {
        self == Cardinality::Multiple
    }
}

impl FromStr for Cardinality {
    type Err = GrammarError;

    fn from_str(label: &str) -> Result<Self> {
        match label {
            "single" => Ok(Cardinality::Single),
            "optional" => Ok(Cardinality::Optional),
            "multiple" => Ok(Cardinality::Multiple),
            other => Err(GrammarError::InvalidCardinality(other.to_owned())),
        }
    }
}

// Catalog sort keys compare cardinality labels as strings.
impl PartialOrd for Cardinality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cardinality {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// A named, typed slot of a constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    ty: AsdlType,
    cardinality: Cardinality,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<String>, ty: AsdlType, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            ty,
            cardinality,
        }
    }

    /// Creates a field from a cardinality label.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidCardinality`] unless `label` is one of
    /// `single`, `optional` or `multiple`.
    pub fn with_label(name: impl Into<String>, ty: AsdlType, label: &str) -> Result<Self> {
        Ok(Self::new(name, ty, label.parse()?))
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field type.
    #[must_use]
    pub fn ty(&self) -> &AsdlType {
        &self.ty
    }

    /// The field cardinality.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by (field name, type name, cardinality label).
impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.ty.cmp(&other.ty))
            .then_with(|| self.cardinality.cmp(&other.cardinality))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.ty, self.cardinality.suffix())
    }
}

/// A named way of building a value from an ordered list of fields.
///
/// Field order is positional argument order when building or decomposing a
/// tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constructor {
    name: String,
    fields: Vec<Field>,
}

impl Constructor {
    /// Creates a constructor. `fields` may be empty.
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// The constructor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in positional order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name. With duplicate names the first one wins.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownField`] if no field has that name.
    pub fn field(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| GrammarError::UnknownField {
                constructor: self.name.clone(),
                field: name.to_owned(),
            })
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> (", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}

/// The rule that a head type can be built by one constructor.
///
/// A production renders as its constructor name. Its [`Ord`] is the
/// *reversed* comparison of renderings: `a < b` iff `b`'s rendering sorts
/// before `a`'s. Ties (same constructor name) fall back to the head type and
/// then the field list, so ordering agrees with equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    ty: AsdlType,
    constructor: Constructor,
}

impl Production {
    /// Pairs a head type with its constructor.
    #[must_use]
    pub fn new(ty: AsdlType, constructor: Constructor) -> Self {
        Self { ty, constructor }
    }

    /// The head type.
    #[must_use]
    pub fn ty(&self) -> &AsdlType {
        &self.ty
    }

    /// The constructor.
    #[must_use]
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Fields of the constructor, in positional order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        self.constructor.fields()
    }

    /// Looks up a constructor field by name.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownField`] if the constructor has no such field.
    pub fn field(&self, name: &str) -> Result<&Field> {
        self.constructor.field(name)
    }
}

impl PartialOrd for Production {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Production {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .constructor
            .name
            .cmp(&self.constructor.name)
            .then_with(|| self.ty.cmp(&other.ty))
            .then_with(|| self.constructor.fields.cmp(&other.constructor.fields))
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.constructor.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noun_phrase() -> AsdlType {
        AsdlType::composite("NounPhrase")
    }

    #[test]
    fn types_compare_by_name_only() {
        let a = AsdlType::composite("word");
        let b = AsdlType::primitive("word");
        assert_eq!(a, b);
        assert!(AsdlType::primitive("a") < AsdlType::composite("b"));
    }

    #[test]
    fn cardinality_labels_parse() {
        assert_eq!("single".parse::<Cardinality>().ok(), Some(Cardinality::Single));
        assert_eq!("optional".parse::<Cardinality>().ok(), Some(Cardinality::Optional));
        assert_eq!("multiple".parse::<Cardinality>().ok(), Some(Cardinality::Multiple));
    }

    #[test]
    fn bogus_cardinality_is_rejected() {
        let err = Field::with_label("subj", noun_phrase(), "bogus").unwrap_err();
        assert!(matches!(err, GrammarError::InvalidCardinality(ref l) if l == "bogus"));
    }

    #[test]
    fn cardinality_orders_by_label() {
        assert!(Cardinality::Multiple < Cardinality::Optional);
        assert!(Cardinality::Optional < Cardinality::Single);
    }

    #[test]
    fn field_display_uses_suffix() {
        let word = AsdlType::primitive("word");
        assert_eq!(Field::new("w", word.clone(), Cardinality::Single).to_string(), "word");
        assert_eq!(Field::new("w", word.clone(), Cardinality::Optional).to_string(), "word?");
        assert_eq!(Field::new("w", word, Cardinality::Multiple).to_string(), "word*");
    }

    #[test]
    fn constructor_display_and_lookup() {
        let ctor = Constructor::new(
            "Declarative",
            [
                Field::new("subj", noun_phrase(), Cardinality::Single),
                Field::new("adv", AsdlType::primitive("word"), Cardinality::Multiple),
            ],
        );
        assert_eq!(ctor.to_string(), "Declarative -> (NounPhrase, word*)");
        assert_eq!(ctor.field("adv").map(Field::cardinality).ok(), Some(Cardinality::Multiple));
        assert!(matches!(
            ctor.field("pred"),
            Err(GrammarError::UnknownField { ref field, .. }) if field == "pred"
        ));
        assert_eq!(Constructor::new("Stop", []).to_string(), "Stop -> ()");
    }

    #[test]
    fn duplicate_field_names_resolve_to_first() {
        let ctor = Constructor::new(
            "Pair",
            [
                Field::new("x", noun_phrase(), Cardinality::Single),
                Field::new("x", noun_phrase(), Cardinality::Optional),
            ],
        );
        assert_eq!(ctor.field("x").map(Field::cardinality).ok(), Some(Cardinality::Single));
    }

    #[test]
    fn production_ordering_is_reversed_rendering() {
        let s = AsdlType::composite("Sentence");
        let alpha = Production::new(s.clone(), Constructor::new("Alpha", []));
        let beta = Production::new(s, Constructor::new("Beta", []));
        assert_eq!(alpha.to_string(), "Alpha");
        assert!(beta < alpha);
        let mut sorted = vec![alpha.clone(), beta.clone()];
        sorted.sort();
        assert_eq!(sorted, vec![beta, alpha]);
    }

    #[test]
    fn production_field_delegates_to_constructor() {
        let prod = Production::new(
            AsdlType::composite("Sentence"),
            Constructor::new(
                "Question",
                [Field::new("qword", AsdlType::primitive("Particle"), Cardinality::Optional)],
            ),
        );
        assert_eq!(prod.field("qword").map(Field::cardinality).ok(), Some(Cardinality::Optional));
        assert!(prod.field("subj").is_err());
    }
}
