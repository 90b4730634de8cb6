//! Reference table for named definitions.
//!
//! Filled once while the top-level definitions are registered, then sealed.
//! Only a sealed [`ReferenceTable`] can be read, so every lookup happens after
//! registration has finished.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ClassifyErrorKind;
use crate::intake::Primitive;

/// What a named definition is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// Intrinsic scalar.
    Primitive(Primitive),
    /// Another definition, by schema name.
    Alias(String),
    /// Enum with the given value type.
    Enum(Primitive),
    Struct,
    MergedStruct,
    Union,
    KeyedMap,
}

/// One registered definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    /// Emitted Rust type name.
    pub type_name: String,
    /// Array depth of the definition itself.
    pub depth: usize,
    pub target: RefTarget,
}

/// How a scalar reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarForm {
    /// Intrinsic value.
    Plain,
    /// String enum rendered through `as_str()`.
    StringEnum,
    /// Integer or boolean enum newtype rendered through `.0`.
    NewtypeEnum,
}

/// Terminal of an alias chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEnd<'a> {
    /// Array depth accumulated along the whole chain.
    pub depth: usize,
    /// Schema name of the terminal definition.
    pub name: &'a str,
    /// Never [`RefTarget::Alias`].
    pub target: &'a RefTarget,
}

/// Fully dereferenced scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub primitive: Primitive,
    pub depth: usize,
    pub form: ScalarForm,
}

/// Population phase.
#[derive(Debug, Default)]
pub struct ReferenceTableBuilder {
    entries: BTreeMap<String, RefEntry>,
}

impl ReferenceTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one definition.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyErrorKind::DuplicateDefinition`] if `name` is already
    /// registered.
    pub fn register(&mut self, name: &str, entry: RefEntry) -> Result<(), ClassifyErrorKind> {
        if self.entries.contains_key(name) {
            return Err(ClassifyErrorKind::DuplicateDefinition(name.to_string()));
        }
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// Ends the population phase.
    #[must_use]
    pub fn seal(self) -> ReferenceTable {
        ReferenceTable {
            entries: self.entries,
        }
    }
}

/// Read-only phase.
#[derive(Debug)]
pub struct ReferenceTable {
    entries: BTreeMap<String, RefEntry>,
}

impl ReferenceTable {
    /// Looks up one definition without following aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyErrorKind::UnknownReference`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<&RefEntry, ClassifyErrorKind> {
        self.entries
            .get(name)
            .ok_or_else(|| ClassifyErrorKind::UnknownReference(name.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follows aliases from `name` to the first non-alias definition.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names and for chains that loop.
    pub fn chain_end<'a>(&'a self, name: &'a str) -> Result<ChainEnd<'a>, ClassifyErrorKind> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut current: &str = name;
        let mut depth: usize = 0;
        loop {
            if !seen.insert(current) {
                return Err(ClassifyErrorKind::AliasCycle(current.to_string()));
            }
            let entry: &RefEntry = self.get(current)?;
            depth += entry.depth;
            match &entry.target {
                RefTarget::Alias(next) => current = next,
                target => {
                    return Ok(ChainEnd {
                        depth,
                        name: current,
                        target,
                    });
                }
            }
        }
    }

    /// Walks the alias chain from `name` until an intrinsic scalar is reached.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names, cycles, and chains ending in a
    /// struct, merged struct, union, or keyed map.
    pub fn resolve_fully(&self, name: &str) -> Result<Resolved, ClassifyErrorKind> {
        let end: ChainEnd<'_> = self.chain_end(name)?;
        let (primitive, form): (Primitive, ScalarForm) = match end.target {
            RefTarget::Primitive(p) => (*p, ScalarForm::Plain),
            RefTarget::Enum(Primitive::String) => (Primitive::String, ScalarForm::StringEnum),
            RefTarget::Enum(p) => (*p, ScalarForm::NewtypeEnum),
            _ => return Err(ClassifyErrorKind::NotScalar(name.to_string())),
        };
        Ok(Resolved {
            primitive,
            depth: end.depth,
            form,
        })
    }

    /// True when a value of `name` needs `Box` to be held optionally: the
    /// chain ends in a struct-like definition and no level is an array.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names and cycles.
    pub fn is_struct_like(&self, name: &str) -> Result<bool, ClassifyErrorKind> {
        let end: ChainEnd<'_> = self.chain_end(name)?;
        Ok(end.depth == 0 && matches!(end.target, RefTarget::Struct | RefTarget::MergedStruct))
    }
}
