//! Plain ASDL-style text dump.
//!
//! One definition per head type, in first-seen declaration order:
//!
//! ```text
//! Sentence = Declarative(NounPhrase subj, VerbPhrase pred)
//!          | Question(NounPhrase subj, VerbPhrase pred, Particle? qword)
//! ```
//!
//! Field types carry the cardinality suffix (`?` optional, `*` multiple).
//! The dump is for logs and diffs; it is not read back.

use std::fmt::Write as FmtWrite;

use crate::grammar::Grammar;
use crate::model::{AsdlType, Constructor};

/// Renders `grammar` as ASDL text.
#[must_use]
pub fn to_asdl_text(grammar: &Grammar) -> String {
    let mut out = String::new();
    let primitives: Vec<&str> = grammar
        .primitive_types()
        .iter()
        .map(AsdlType::name)
        .collect();
    let _ = writeln!(out, "-- root: {}", grammar.root_type());
    if !primitives.is_empty() {
        let _ = writeln!(out, "-- primitive types: {}", primitives.join(", "));
    }

    for (head, productions) in grammar.groups() {
        let indent = " ".repeat(head.name().len() + 1);
        for (i, prod) in productions.iter().enumerate() {
            if i == 0 {
                let _ = write!(out, "{head} = ");
            } else {
                let _ = write!(out, "{indent}| ");
            }
            out.push_str(&constructor_text(prod.constructor()));
            out.push('\n');
        }
    }
    out
}

fn constructor_text(ctor: &Constructor) -> String {
    if ctor.fields().is_empty() {
        return ctor.name().to_owned();
    }
    let args: Vec<String> = ctor
        .fields()
        .iter()
        .map(|f| format!("{f} {}", f.name()))
        .collect();
    format!("{}({})", ctor.name(), args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, Field, Production};

    #[test]
    fn renders_alternatives_with_suffixes() {
        let sentence = AsdlType::composite("Sentence");
        let np = AsdlType::composite("NounPhrase");
        let particle = AsdlType::primitive("Particle");
        let grammar = Grammar::new([
            Production::new(
                sentence.clone(),
                Constructor::new(
                    "Declarative",
                    [Field::new("subj", np.clone(), Cardinality::Single)],
                ),
            ),
            Production::new(
                sentence,
                Constructor::new(
                    "Question",
                    [
                        Field::new("subj", np, Cardinality::Single),
                        Field::new("qword", particle, Cardinality::Optional),
                    ],
                ),
            ),
        ])
        .unwrap();
        let text = to_asdl_text(&grammar);
        assert_eq!(
            text,
            "-- root: Sentence\n\
             -- primitive types: Particle\n\
             Sentence = Declarative(NounPhrase subj)\n         \
             | Question(NounPhrase subj, Particle? qword)\n"
        );
    }

    #[test]
    fn fieldless_constructor_has_no_parens() {
        let grammar = Grammar::new([Production::new(
            AsdlType::composite("Punct"),
            Constructor::new("Period", []),
        )])
        .unwrap();
        assert!(to_asdl_text(&grammar).ends_with("Punct = Period\n"));
    }

    #[test]
    fn every_head_type_gets_a_definition() {
        let grammar = crate::english::grammar().unwrap();
        let text = to_asdl_text(&grammar);
        let heads: Vec<&str> = text
            .lines()
            .filter_map(|line| line.split_once(" = ").map(|(head, _)| head))
            .collect();
        let expected: Vec<&str> = grammar.head_types().map(AsdlType::name).collect();
        assert_eq!(heads, expected);
        let alternatives = text.lines().filter(|line| !line.starts_with("--")).count();
        assert_eq!(alternatives, grammar.size());
    }
}
