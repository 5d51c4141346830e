//! Reference English sentence grammar.
//!
//! Clause structure for a grammar-constrained sentence generator: sentences
//! are declaratives, questions or imperatives built from noun, verb and
//! prepositional phrases. Leaves are `word` tokens and question `Particle`s.
//!
//! Declaration order starts with `Sentence`, which makes it the root type.
//! Reordering the non-root productions does not change any catalog id.

use crate::error::Result;
use crate::grammar::Grammar;
use crate::model::{AsdlType, Cardinality, Constructor, Field, Production};

/// Builds the reference English grammar.
///
/// # Errors
///
/// Propagates [`Grammar::new`] errors; the built-in productions are valid, so
/// this only fails if they are edited inconsistently.
pub fn grammar() -> Result<Grammar> {
    Grammar::new(productions())
}

/// Returns the reference English productions in declaration order.
#[must_use]
pub fn productions() -> Vec<Production> {
    let mut all = sentences();
    all.extend(noun_phrases());
    all.extend(verb_phrases());
    all.extend(prep_phrases());
    all
}

fn sentence() -> AsdlType {
    AsdlType::composite("Sentence")
}

fn noun_phrase() -> AsdlType {
    AsdlType::composite("NounPhrase")
}

fn verb_phrase() -> AsdlType {
    AsdlType::composite("VerbPhrase")
}

fn prep_phrase() -> AsdlType {
    AsdlType::composite("PrepPhrase")
}

fn word() -> AsdlType {
    AsdlType::primitive("word")
}

fn particle() -> AsdlType {
    AsdlType::primitive("Particle")
}

fn single(name: &str, ty: AsdlType) -> Field {
    Field::new(name, ty, Cardinality::Single)
}

fn optional(name: &str, ty: AsdlType) -> Field {
    Field::new(name, ty, Cardinality::Optional)
}

fn multiple(name: &str, ty: AsdlType) -> Field {
    Field::new(name, ty, Cardinality::Multiple)
}

fn sentences() -> Vec<Production> {
    vec![
        Production::new(
            sentence(),
            Constructor::new(
                "Declarative",
                [single("subj", noun_phrase()), single("pred", verb_phrase())],
            ),
        ),
        Production::new(
            sentence(),
            Constructor::new(
                "Question",
                [
                    single("subj", noun_phrase()),
                    single("pred", verb_phrase()),
                    optional("qword", particle()),
                ],
            ),
        ),
        Production::new(
            sentence(),
            Constructor::new("Imperative", [single("pred", verb_phrase())]),
        ),
    ]
}

fn noun_phrases() -> Vec<Production> {
    vec![
        Production::new(
            noun_phrase(),
            Constructor::new(
                "Noun",
                [
                    optional("det", word()),
                    multiple("adj", word()),
                    single("head", word()),
                ],
            ),
        ),
        Production::new(
            noun_phrase(),
            Constructor::new("Pronoun", [single("head", word())]),
        ),
        Production::new(
            noun_phrase(),
            Constructor::new(
                "Coordinated",
                [multiple("conjuncts", noun_phrase()), single("conj", word())],
            ),
        ),
    ]
}

fn verb_phrases() -> Vec<Production> {
    vec![
        Production::new(
            verb_phrase(),
            Constructor::new(
                "Intransitive",
                [single("verb", word()), multiple("mods", prep_phrase())],
            ),
        ),
        Production::new(
            verb_phrase(),
            Constructor::new(
                "Transitive",
                [
                    single("verb", word()),
                    single("obj", noun_phrase()),
                    multiple("mods", prep_phrase()),
                ],
            ),
        ),
        Production::new(
            verb_phrase(),
            Constructor::new(
                "Copular",
                [single("verb", word()), single("complement", word())],
            ),
        ),
    ]
}

fn prep_phrases() -> Vec<Production> {
    vec![Production::new(
        prep_phrase(),
        Constructor::new("Prep", [single("prep", word()), single("obj", noun_phrase())]),
    )]
}
