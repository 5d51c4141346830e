//! The grammar aggregate.
//!
//! A [`Grammar`] is built once from an ordered production sequence and is
//! read-only afterwards. It derives three deterministically ordered catalogs
//! (productions, types, fields) and a dense integer id for every catalog
//! entry. Those ids are the output vocabulary of a decoder trained against
//! the grammar, so any change to catalog construction or sort order
//! invalidates every checkpoint trained against the old ids.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, trace};

use crate::error::{GrammarError, Result};
use crate::model::{AsdlType, Field, Production};

/// Key for [`Grammar::lookup`]: a bare type name or a type value.
#[derive(Debug, Clone, Copy)]
pub enum TypeKey<'a> {
    /// Look up by type name.
    Name(&'a str),
    /// Look up by type value (matched by name).
    Type(&'a AsdlType),
}

impl<'a> TypeKey<'a> {
    /// The type name this key refers to.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            TypeKey::Name(name) => name,
            TypeKey::Type(ty) => ty.name(),
        }
    }
}

impl<'a> From<&'a str> for TypeKey<'a> {
    fn from(name: &'a str) -> Self {
        TypeKey::Name(name)
    }
}

impl<'a> From<&'a String> for TypeKey<'a> {
    fn from(name: &'a String) -> Self {
        TypeKey::Name(name)
    }
}

impl<'a> From<&'a AsdlType> for TypeKey<'a> {
    fn from(ty: &'a AsdlType) -> Self {
        TypeKey::Type(ty)
    }
}

/// An immutable ASDL grammar with stable catalog ids.
///
/// # Example
///
/// ```
/// use asdl_grammar::{AsdlType, Cardinality, Constructor, Field, Grammar, Production};
///
/// let sentence = AsdlType::composite("Sentence");
/// let word = AsdlType::primitive("word");
/// let grammar = Grammar::new([
///     Production::new(
///         sentence.clone(),
///         Constructor::new("Exclaim", [Field::new("w", word, Cardinality::Single)]),
///     ),
/// ])?;
/// assert_eq!(grammar.size(), 1);
/// assert_eq!(grammar.root_type(), &sentence);
/// # Ok::<(), asdl_grammar::GrammarError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    declared: Vec<Production>,
    groups: Vec<(AsdlType, Vec<Production>)>,
    group_index: HashMap<String, usize>,
    constructor_index: HashMap<String, usize>,
    root_type: AsdlType,
    productions: Vec<Production>,
    types: Vec<AsdlType>,
    primitive_types: Vec<AsdlType>,
    composite_types: Vec<AsdlType>,
    fields: Vec<Field>,
    production_ids: HashMap<Production, usize>,
    type_ids: HashMap<AsdlType, usize>,
    field_ids: HashMap<Field, usize>,
}

impl Grammar {
    /// Builds a grammar from productions in declaration order.
    ///
    /// The head type of the first production becomes the root type. Every
    /// catalog and id map is computed here, eagerly.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::EmptyGrammar`] if `productions` is empty.
    /// - [`GrammarError::DuplicateConstructor`] if two productions share a
    ///   constructor name, whether or not their head types differ.
    /// - [`GrammarError::ConflictingTypeKind`] if one type name is used as
    ///   both primitive and composite.
    pub fn new(productions: impl IntoIterator<Item = Production>) -> Result<Self> {
        let declared: Vec<Production> = productions.into_iter().collect();
        let root_type = declared
            .first()
            .map(|p| p.ty().clone())
            .ok_or(GrammarError::EmptyGrammar)?;

        let mut groups: Vec<(AsdlType, Vec<Production>)> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut constructor_index: HashMap<String, usize> = HashMap::new();
        for (i, prod) in declared.iter().enumerate() {
            let name = prod.constructor().name();
            if let Some(&first) = constructor_index.get(name) {
                return Err(GrammarError::DuplicateConstructor {
                    name: name.to_owned(),
                    first: declared[first].ty().name().to_owned(),
                    second: prod.ty().name().to_owned(),
                });
            }
            constructor_index.insert(name.to_owned(), i);

            let slot = *group_index
                .entry(prod.ty().name().to_owned())
                .or_insert_with(|| {
                    groups.push((prod.ty().clone(), Vec::new()));
                    groups.len() - 1
                });
            groups[slot].1.push(prod.clone());
        }

        // Constructor names are unique, so sorting by rendering is total.
        let mut productions = declared.clone();
        productions.sort_by(|a, b| a.constructor().name().cmp(b.constructor().name()));

        let types = collect_types(&productions)?;
        let fields: Vec<Field> = productions
            .iter()
            .flat_map(Production::fields)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        let (primitive_types, composite_types): (Vec<_>, Vec<_>) =
            types.iter().cloned().partition(AsdlType::is_primitive);

        let production_ids = productions
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let type_ids = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        let field_ids = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.clone(), i))
            .collect();

        for (head, prods) in &groups {
            trace!("head type {head}: {} production(s)", prods.len());
        }
        debug!(
            "built grammar rooted at {root_type}: {} productions, {} types ({} primitive), \
             {} fields",
            productions.len(),
            types.len(),
            primitive_types.len(),
            fields.len()
        );

        Ok(Self {
            declared,
            groups,
            group_index,
            constructor_index,
            root_type,
            productions,
            types,
            primitive_types,
            composite_types,
            fields,
            production_ids,
            type_ids,
            field_ids,
        })
    }

    /// Head type of the first declared production.
    #[must_use]
    pub fn root_type(&self) -> &AsdlType {
        &self.root_type
    }

    /// Number of productions (equivalently, of constructors).
    #[must_use]
    pub fn size(&self) -> usize {
        self.productions.len()
    }

    /// Same as [`Grammar::size`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Always `false`: construction rejects empty grammars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Productions in the order they were supplied to [`Grammar::new`].
    #[must_use]
    pub fn declared(&self) -> &[Production] {
        &self.declared
    }

    /// Head types in first-seen declaration order.
    pub fn head_types(&self) -> impl Iterator<Item = &AsdlType> {
        self.groups.iter().map(|(ty, _)| ty)
    }

    /// Each head type with its productions, in first-seen declaration order.
    pub fn groups(&self) -> impl Iterator<Item = (&AsdlType, &[Production])> {
        self.groups.iter().map(|(ty, prods)| (ty, prods.as_slice()))
    }

    /// All productions whose head type matches `key`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownType`] if no production has that head type.
    pub fn lookup<'a>(&self, key: impl Into<TypeKey<'a>>) -> Result<&[Production]> {
        let key: TypeKey<'a> = key.into();
        let name = key.name();
        self.group_index
            .get(name)
            .map(|&slot| self.groups[slot].1.as_slice())
            .ok_or_else(|| GrammarError::UnknownType(name.to_owned()))
    }

    /// The production declaring constructor `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownConstructor`] if no constructor has that name.
    pub fn production_for_constructor(&self, name: &str) -> Result<&Production> {
        self.constructor_index
            .get(name)
            .map(|&i| &self.declared[i])
            .ok_or_else(|| GrammarError::UnknownConstructor(name.to_owned()))
    }

    /// Whether `ty` names a composite type of this grammar.
    #[must_use]
    pub fn is_composite(&self, ty: &AsdlType) -> bool {
        self.type_by_name(ty.name())
            .is_some_and(AsdlType::is_composite)
    }

    /// Whether `ty` names a primitive type of this grammar.
    #[must_use]
    pub fn is_primitive(&self, ty: &AsdlType) -> bool {
        self.type_by_name(ty.name())
            .is_some_and(AsdlType::is_primitive)
    }

    /// The catalog entry for a type name, carrying its declared kind.
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<&AsdlType> {
        self.types
            .binary_search_by(|t| t.name().cmp(name))
            .ok()
            .map(|i| &self.types[i])
    }

    /// Every production, sorted by rendering (constructor name).
    /// `productions()[i]` has id `i`.
    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Every head and field type, sorted by name. `types()[i]` has id `i`.
    #[must_use]
    pub fn types(&self) -> &[AsdlType] {
        &self.types
    }

    /// Primitive subset of [`Grammar::types`], in catalog order.
    #[must_use]
    pub fn primitive_types(&self) -> &[AsdlType] {
        &self.primitive_types
    }

    /// Composite subset of [`Grammar::types`], in catalog order.
    #[must_use]
    pub fn composite_types(&self) -> &[AsdlType] {
        &self.composite_types
    }

    /// Every distinct field, sorted by (name, type name, cardinality label).
    /// `fields()[i]` has id `i`.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Id of a production.
    #[must_use]
    pub fn production_id(&self, production: &Production) -> Option<usize> {
        self.production_ids.get(production).copied()
    }

    /// Production with id `id`.
    #[must_use]
    pub fn production_by_id(&self, id: usize) -> Option<&Production> {
        self.productions.get(id)
    }

    /// Id of a type (matched by name).
    #[must_use]
    pub fn type_id(&self, ty: &AsdlType) -> Option<usize> {
        self.type_ids.get(ty).copied()
    }

    /// Type with id `id`.
    #[must_use]
    pub fn type_by_id(&self, id: usize) -> Option<&AsdlType> {
        self.types.get(id)
    }

    /// Id of a field.
    #[must_use]
    pub fn field_id(&self, field: &Field) -> Option<usize> {
        self.field_ids.get(field).copied()
    }

    /// Field with id `id`.
    #[must_use]
    pub fn field_by_id(&self, id: usize) -> Option<&Field> {
        self.fields.get(id)
    }
}

/// Head types and field types, deduplicated by name and sorted by name.
fn collect_types(productions: &[Production]) -> Result<Vec<AsdlType>> {
    let mut by_name: BTreeMap<&str, &AsdlType> = BTreeMap::new();
    let referenced = productions
        .iter()
        .flat_map(|p| std::iter::once(p.ty()).chain(p.fields().iter().map(Field::ty)));
    for ty in referenced {
        match by_name.entry(ty.name()) {
            Entry::Vacant(slot) => {
                slot.insert(ty);
            }
            Entry::Occupied(seen) if seen.get().kind() != ty.kind() => {
                return Err(GrammarError::ConflictingTypeKind(ty.name().to_owned()));
            }
            Entry::Occupied(_) => {}
        }
    }
    Ok(by_name.into_values().cloned().collect())
}
