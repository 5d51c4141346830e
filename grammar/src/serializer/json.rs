//! JSON persistence for grammars.
//!
//! A persisted grammar stores the declared productions in input order (so the
//! root type survives a reload) together with the derived vocabulary: the
//! rendering of every production, type and field in id order. Reloading
//! rebuilds the grammar and checks that every id still denotes the same
//! entity, which is what a decoder checkpoint relies on.
//!
//! Output is deterministic: object keys are emitted in sorted order and every
//! array follows declaration or catalog order.

use serde_json::{json, Map, Value};

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::model::{AsdlType, Constructor, Field, Production, TypeKind};

/// Format tag written into every document.
pub const FORMAT: &str = "asdl-grammar/1";

/// Serializes a grammar to a JSON `Value`.
#[must_use]
pub fn to_json(grammar: &Grammar) -> Value {
    let productions: Vec<Value> = grammar.declared().iter().map(production_to_json).collect();
    json!({
        "format": FORMAT,
        "root": grammar.root_type().name(),
        "productions": productions,
        "vocabulary": vocabulary(grammar),
    })
}

/// Serializes a grammar to pretty-printed JSON text.
///
/// # Errors
///
/// Returns [`GrammarError::Json`] if serialization fails.
pub fn to_string_pretty(grammar: &Grammar) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(grammar))?)
}

/// Rebuilds a grammar from a document produced by [`to_json`].
///
/// # Errors
///
/// - [`GrammarError::MalformedDocument`] if a required key is missing or has
///   the wrong shape, or the root does not match the first production.
/// - [`GrammarError::VocabularyMismatch`] if the stored ids disagree with the
///   rebuilt grammar.
/// - Any construction error from [`Grammar::new`].
pub fn from_json(doc: &Value) -> Result<Grammar> {
    let format = str_at(doc, "format")?;
    if format != FORMAT {
        return Err(malformed(format!("unsupported format '{format}'")));
    }
    let productions = array_at(doc, "productions")?
        .iter()
        .map(production_from_json)
        .collect::<Result<Vec<_>>>()?;
    let grammar = Grammar::new(productions)?;

    let root = str_at(doc, "root")?;
    if root != grammar.root_type().name() {
        return Err(malformed(format!(
            "root '{root}' is not the head of the first production"
        )));
    }

    let stored = doc
        .get("vocabulary")
        .ok_or_else(|| malformed("missing 'vocabulary'"))?;
    let rebuilt = vocabulary(&grammar);
    for catalog in ["productions", "types", "fields"] {
        check_catalog(catalog, array_at(stored, catalog)?, array_at(&rebuilt, catalog)?)?;
    }
    Ok(grammar)
}

/// Parses JSON text and rebuilds the grammar.
///
/// # Errors
///
/// [`GrammarError::Json`] for invalid JSON, otherwise as [`from_json`].
pub fn from_str(text: &str) -> Result<Grammar> {
    let doc: Value = serde_json::from_str(text)?;
    from_json(&doc)
}

fn vocabulary(grammar: &Grammar) -> Value {
    let productions: Vec<String> = grammar.productions().iter().map(ToString::to_string).collect();
    let types: Vec<&str> = grammar.types().iter().map(AsdlType::name).collect();
    let fields: Vec<String> = grammar
        .fields()
        .iter()
        .map(|f| format!("{f} {}", f.name()))
        .collect();
    json!({
        "productions": productions,
        "types": types,
        "fields": fields,
    })
}

fn check_catalog(catalog: &'static str, stored: &[Value], rebuilt: &[Value]) -> Result<()> {
    let diverged = stored
        .iter()
        .zip(rebuilt)
        .position(|(s, r)| s != r)
        .or_else(|| (stored.len() != rebuilt.len()).then(|| stored.len().min(rebuilt.len())));
    match diverged {
        Some(id) => Err(GrammarError::VocabularyMismatch { catalog, id }),
        None => Ok(()),
    }
}

fn type_to_json(ty: &AsdlType) -> Value {
    json!({ "name": ty.name(), "kind": ty.kind().as_str() })
}

fn production_to_json(prod: &Production) -> Value {
    let fields: Vec<Value> = prod
        .fields()
        .iter()
        .map(|f| {
            json!({
                "name": f.name(),
                "type": type_to_json(f.ty()),
                "cardinality": f.cardinality().as_str(),
            })
        })
        .collect();
    json!({
        "type": type_to_json(prod.ty()),
        "constructor": prod.constructor().name(),
        "fields": fields,
    })
}

fn type_from_json(value: &Value) -> Result<AsdlType> {
    let kind = match str_at(value, "kind")? {
        "primitive" => TypeKind::Primitive,
        "composite" => TypeKind::Composite,
        other => return Err(malformed(format!("unknown type kind '{other}'"))),
    };
    Ok(AsdlType::new(str_at(value, "name")?, kind))
}

fn production_from_json(value: &Value) -> Result<Production> {
    let head = value
        .get("type")
        .ok_or_else(|| malformed("production without 'type'"))?;
    let head = type_from_json(head)?;
    let fields = array_at(value, "fields")?
        .iter()
        .map(|f| {
            let ty = f
                .get("type")
                .ok_or_else(|| malformed("field without 'type'"))?;
            let ty = type_from_json(ty)?;
            Field::with_label(str_at(f, "name")?, ty, str_at(f, "cardinality")?)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Production::new(head, Constructor::new(str_at(value, "constructor")?, fields)))
}

fn object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| malformed("expected a JSON object"))
}

fn str_at<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
    object(value)?
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("missing string '{key}'")))
}

fn array_at<'a>(value: &'a Value, key: &str) -> Result<&'a [Value]> {
    object(value)?
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(format!("missing array '{key}'")))
}

fn malformed(message: impl Into<String>) -> GrammarError {
    GrammarError::MalformedDocument(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::english;

    #[test]
    fn document_has_root_productions_and_vocabulary() {
        let grammar = english::grammar().unwrap();
        let doc = to_json(&grammar);
        assert_eq!(doc["format"], FORMAT);
        assert_eq!(doc["root"], "Sentence");
        assert_eq!(
            doc["productions"].as_array().map(Vec::len),
            Some(grammar.size())
        );
        assert_eq!(
            doc["vocabulary"]["types"].as_array().map(Vec::len),
            Some(grammar.types().len())
        );
    }

    #[test]
    fn reload_preserves_every_id() {
        let grammar = english::grammar().unwrap();
        let text = to_string_pretty(&grammar).unwrap();
        let reloaded = from_str(&text).unwrap();
        assert_eq!(reloaded.root_type(), grammar.root_type());
        assert_eq!(reloaded.productions(), grammar.productions());
        assert_eq!(reloaded.types(), grammar.types());
        assert_eq!(reloaded.fields(), grammar.fields());
        assert_eq!(reloaded.declared(), grammar.declared());
    }

    #[test]
    fn serialization_is_deterministic() {
        let a = to_string_pretty(&english::grammar().unwrap()).unwrap();
        let b = to_string_pretty(&english::grammar().unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tampered_vocabulary_is_rejected() {
        let grammar = english::grammar().unwrap();
        let mut doc = to_json(&grammar);
        doc["vocabulary"]["types"][1] = json!("Zzz");
        assert!(matches!(
            from_json(&doc),
            Err(GrammarError::VocabularyMismatch { catalog: "types", id: 1 })
        ));
    }

    #[test]
    fn truncated_vocabulary_is_rejected() {
        let grammar = english::grammar().unwrap();
        let mut doc = to_json(&grammar);
        if let Some(fields) = doc["vocabulary"]["fields"].as_array_mut() {
            fields.pop();
        }
        let expected = grammar.fields().len() - 1;
        assert!(matches!(
            from_json(&doc),
            Err(GrammarError::VocabularyMismatch { catalog: "fields", id }) if id == expected
        ));
    }

    #[test]
    fn bad_cardinality_in_document_is_rejected() {
        let grammar = english::grammar().unwrap();
        let mut doc = to_json(&grammar);
        doc["productions"][0]["fields"][0]["cardinality"] = json!("bogus");
        assert!(matches!(from_json(&doc), Err(GrammarError::InvalidCardinality(_))));
    }

    #[test]
    fn missing_keys_are_malformed() {
        assert!(matches!(
            from_json(&json!({ "format": FORMAT })),
            Err(GrammarError::MalformedDocument(_))
        ));
        assert!(matches!(from_str("not json"), Err(GrammarError::Json(_))));
    }
}
