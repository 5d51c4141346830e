//! Language-agnostic realized trees over a grammar.
//!
//! An [`AsdlTree`] is one production plus a [`RealizedField`] for every field
//! of its constructor, in constructor order. Composite-typed fields hold
//! child trees; primitive-typed fields hold tokens.

use std::fmt;

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::model::{Cardinality, Field, Production};

/// A value stored in a realized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A child node of a composite-typed field.
    Tree(AsdlTree),
    /// A leaf token of a primitive-typed field.
    Token(String),
}

impl From<AsdlTree> for FieldValue {
    fn from(tree: AsdlTree) -> Self {
        FieldValue::Tree(tree)
    }
}

impl From<&str> for FieldValue {
    fn from(token: &str) -> Self {
        FieldValue::Token(token.to_owned())
    }
}

/// A constructor field together with the values filled into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealizedField {
    field: Field,
    values: Vec<FieldValue>,
}

impl RealizedField {
    /// The declared field.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Values in insertion order.
    #[must_use]
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// The sole value of a `single` or `optional` field, if any.
    #[must_use]
    pub fn value(&self) -> Option<&FieldValue> {
        self.values.first()
    }

    fn is_satisfied(&self) -> bool {
        self.field.cardinality() != Cardinality::Single || self.values.len() == 1
    }
}

/// A tree node built by one production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsdlTree {
    production: Production,
    fields: Vec<RealizedField>,
}

impl AsdlTree {
    /// Creates a node with every field empty.
    #[must_use]
    pub fn new(production: Production) -> Self {
        let fields = production
            .fields()
            .iter()
            .map(|field| RealizedField {
                field: field.clone(),
                values: Vec::new(),
            })
            .collect();
        Self { production, fields }
    }

    /// The production that built this node.
    #[must_use]
    pub fn production(&self) -> &Production {
        &self.production
    }

    /// Realized fields in constructor order.
    #[must_use]
    pub fn fields(&self) -> &[RealizedField] {
        &self.fields
    }

    /// Looks up a realized field by name.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownField`] if the constructor has no such field.
    pub fn field(&self, name: &str) -> Result<&RealizedField> {
        self.fields
            .iter()
            .find(|rf| rf.field.name() == name)
            .ok_or_else(|| self.unknown_field(name))
    }

    /// Appends a value to the named field.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::UnknownField`] if the constructor has no such field.
    /// - [`GrammarError::CardinalityViolation`] if the field is `single` or
    ///   `optional` and already holds a value.
    pub fn add_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let Some(index) = self.fields.iter().position(|rf| rf.field.name() == name) else {
            return Err(self.unknown_field(name));
        };
        let slot = &mut self.fields[index];
        let cardinality = slot.field.cardinality();
        if !cardinality.allows_many() && !slot.values.is_empty() {
            return Err(GrammarError::CardinalityViolation {
                field: name.to_owned(),
                cardinality: cardinality.as_str(),
            });
        }
        slot.values.push(value.into());
        Ok(())
    }

    /// Builder form of [`AsdlTree::add_value`].
    ///
    /// # Errors
    ///
    /// Same as [`AsdlTree::add_value`].
    pub fn with_value(mut self, name: &str, value: impl Into<FieldValue>) -> Result<Self> {
        self.add_value(name, value)?;
        Ok(self)
    }

    /// Whether every `single` field of this node holds exactly one value.
    /// Children are not inspected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(RealizedField::is_satisfied)
    }

    /// Number of nodes in the tree, this one included.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self
            .fields
            .iter()
            .flat_map(|rf| rf.values.iter())
            .map(|v| match v {
                FieldValue::Tree(child) => child.size(),
                FieldValue::Token(_) => 0,
            })
            .sum::<usize>()
    }

    /// Checks the whole tree against `grammar`.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::UnknownConstructor`] if a node's production is not
    ///   declared by the grammar.
    /// - [`GrammarError::MissingValue`] if a `single` field is empty.
    /// - [`GrammarError::TypeMismatch`] if a child's head type differs from
    ///   its field type, or a token sits in a composite field (or a tree in a
    ///   primitive one).
    pub fn validate(&self, grammar: &Grammar) -> Result<()> {
        let ctor = self.production.constructor().name();
        if grammar.production_for_constructor(ctor)? != &self.production {
            return Err(GrammarError::UnknownConstructor(ctor.to_owned()));
        }
        for rf in &self.fields {
            if !rf.is_satisfied() {
                return Err(GrammarError::MissingValue {
                    constructor: ctor.to_owned(),
                    field: rf.field.name().to_owned(),
                });
            }
            let expected = rf.field.ty();
            for value in &rf.values {
                match value {
                    FieldValue::Tree(child)
                        if grammar.is_composite(expected) && child.production.ty() == expected =>
                    {
                        child.validate(grammar)?;
                    }
                    FieldValue::Token(_) if grammar.is_primitive(expected) => {}
                    other => {
                        let found = match other {
                            FieldValue::Tree(child) => child.production.ty().name().to_owned(),
                            FieldValue::Token(tok) => format!("token '{tok}'"),
                        };
                        return Err(GrammarError::TypeMismatch {
                            field: rf.field.name().to_owned(),
                            expected: expected.name().to_owned(),
                            found,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn unknown_field(&self, name: &str) -> GrammarError {
        GrammarError::UnknownField {
            constructor: self.production.constructor().name().to_owned(),
            field: name.to_owned(),
        }
    }
}

/// S-expression form: `(Ctor (Type-field value ...) ...)`.
impl fmt::Display for AsdlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.production)?;
        for rf in &self.fields {
            write!(f, " ({}-{}", rf.field.ty(), rf.field.name())?;
            for value in &rf.values {
                match value {
                    FieldValue::Tree(child) => write!(f, " {child}")?,
                    FieldValue::Token(tok) => write!(f, " {tok}")?,
                }
            }
            f.write_str(")")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AsdlType, Constructor};

    fn grammar() -> Grammar {
        let sentence = AsdlType::composite("Sentence");
        let np = AsdlType::composite("NounPhrase");
        let word = AsdlType::primitive("word");
        Grammar::new([
            Production::new(
                sentence,
                Constructor::new(
                    "Declarative",
                    [
                        Field::new("subj", np.clone(), Cardinality::Single),
                        Field::new("verb", word.clone(), Cardinality::Single),
                        Field::new("adv", word.clone(), Cardinality::Multiple),
                    ],
                ),
            ),
            Production::new(
                np,
                Constructor::new(
                    "Noun",
                    [
                        Field::new("det", word.clone(), Cardinality::Optional),
                        Field::new("head", word, Cardinality::Single),
                    ],
                ),
            ),
        ])
        .unwrap()
    }

    fn node(grammar: &Grammar, ctor: &str) -> AsdlTree {
        AsdlTree::new(grammar.production_for_constructor(ctor).unwrap().clone())
    }

    #[test]
    fn builds_and_validates_tree() {
        let g = grammar();
        let subj = node(&g, "Noun")
            .with_value("det", "the")
            .unwrap()
            .with_value("head", "cat")
            .unwrap();
        let tree = node(&g, "Declarative")
            .with_value("subj", subj)
            .unwrap()
            .with_value("verb", "sleeps")
            .unwrap()
            .with_value("adv", "soundly")
            .unwrap()
            .with_value("adv", "today")
            .unwrap();
        assert!(tree.is_complete());
        assert_eq!(tree.size(), 2);
        tree.validate(&g).unwrap();
        assert_eq!(
            tree.to_string(),
            "(Declarative (NounPhrase-subj (Noun (word-det the) (word-head cat))) \
             (word-verb sleeps) (word-adv soundly today))"
        );
    }

    #[test]
    fn single_and_optional_fields_take_one_value() {
        let g = grammar();
        let mut noun = node(&g, "Noun");
        noun.add_value("det", "a").unwrap();
        assert!(matches!(
            noun.add_value("det", "the"),
            Err(GrammarError::CardinalityViolation { cardinality: "optional", .. })
        ));
        noun.add_value("head", "dog").unwrap();
        assert!(matches!(
            noun.add_value("head", "cat"),
            Err(GrammarError::CardinalityViolation { cardinality: "single", .. })
        ));
        assert!(matches!(noun.add_value("tail", "x"), Err(GrammarError::UnknownField { .. })));
    }

    #[test]
    fn missing_single_field_fails_validation() {
        let g = grammar();
        let noun = node(&g, "Noun");
        assert!(!noun.is_complete());
        assert!(matches!(
            noun.validate(&g),
            Err(GrammarError::MissingValue { ref field, .. }) if field == "head"
        ));
    }

    #[test]
    fn token_in_composite_field_is_a_mismatch() {
        let g = grammar();
        let tree = node(&g, "Declarative")
            .with_value("subj", "cat")
            .unwrap()
            .with_value("verb", "sleeps")
            .unwrap();
        assert!(matches!(
            tree.validate(&g),
            Err(GrammarError::TypeMismatch { ref expected, .. }) if expected == "NounPhrase"
        ));
    }

    #[test]
    fn child_with_wrong_head_type_is_a_mismatch() {
        let g = crate::english::grammar().unwrap();
        let prep = node(&g, "Prep").with_value("prep", "on").unwrap();
        let tree = node(&g, "Transitive")
            .with_value("verb", "sees")
            .unwrap()
            .with_value("obj", prep)
            .unwrap();
        assert!(matches!(
            tree.validate(&g),
            Err(GrammarError::TypeMismatch { ref field, ref expected, ref found })
                if field == "obj" && expected == "NounPhrase" && found == "PrepPhrase"
        ));
    }

    #[test]
    fn tree_in_primitive_field_is_a_mismatch() {
        let g = crate::english::grammar().unwrap();
        let pronoun = node(&g, "Pronoun").with_value("head", "it").unwrap();
        let tree = node(&g, "Noun").with_value("head", pronoun).unwrap();
        assert!(matches!(
            tree.validate(&g),
            Err(GrammarError::TypeMismatch { ref field, ref expected, ref found })
                if field == "head" && expected == "word" && found == "NounPhrase"
        ));
    }

    #[test]
    fn foreign_production_is_rejected() {
        let g = grammar();
        let stray = AsdlTree::new(Production::new(
            AsdlType::composite("Sentence"),
            Constructor::new("Declarative", []),
        ));
        assert!(matches!(stray.validate(&g), Err(GrammarError::UnknownConstructor(_))));
    }
}
