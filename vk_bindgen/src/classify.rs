//! Node classification.
//!
//! Turns intake nodes into one of six shapes. Top-level definitions are first
//! registered (their names and shapes go into the [`ReferenceTable`]), the
//! table is sealed, and only then are objects, responses and method
//! parameters classified against it.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{BindgenError, ClassifyErrorKind};
use crate::intake::{IntakeNode, ItemBounds, Limits, Primitive, Shape, intake};
use crate::json_pointer::JsonPointer;
use crate::naming::{NameArena, const_name, disambiguate, field_name, type_name, variant_name};
use crate::refs::{ReferenceTable, ReferenceTableBuilder, RefEntry, RefTarget};
use crate::schema::{RequiredKeyword, SchemaNode, reference_name};

/// Keys a numeric-key pattern must accept.
const NUMERIC_KEYS: &[&str] = &["0", "7", "42", "1234567890"];
/// Keys a numeric-key pattern must reject.
const NON_NUMERIC_KEYS: &[&str] = &["", "a", "1a", "a1", "-1", "1.5", " 1"];

/// Target of an alias, a keyed-map value, or a union member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTarget {
    Primitive(Primitive),
    Reference {
        /// Schema name of the definition.
        name: String,
        type_name: String,
        /// Array depth accumulated along the referenced alias chain.
        ref_depth: usize,
        /// Chain ends in a struct or merged struct without arrays.
        struct_like: bool,
    },
}

impl TypeTarget {
    #[must_use]
    pub fn rust_type(&self) -> String {
        match self {
            Self::Primitive(p) => p.rust_type().to_string(),
            Self::Reference { type_name, .. } => type_name.clone(),
        }
    }
}

/// One enum literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumLiteral {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl EnumLiteral {
    /// Rust literal expression for this value.
    #[must_use]
    pub fn rust_literal(&self) -> String {
        match self {
            Self::String(s) => format!("{s:?}"),
            Self::Integer(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    pub value: EnumLiteral,
    /// `enumNames` entry, or the literal's text.
    pub label: String,
    /// Variant identifier for string enums, constant name otherwise.
    pub ident: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    /// Never [`Primitive::Float`].
    pub value_type: Primitive,
    pub variants: Vec<EnumVariant>,
}

/// One member of a merged struct.
#[derive(Debug, Clone)]
pub enum MergedMember {
    /// Referenced struct flattened into the parent.
    Embedded {
        ident: String,
        reference: String,
        type_name: String,
    },
    /// Field contributed by an anonymous sub-schema.
    Field(ClassifiedNode),
}

impl MergedMember {
    #[must_use]
    pub fn ident(&self) -> &str {
        match self {
            Self::Embedded { ident, .. } => ident,
            Self::Field(node) => &node.ident,
        }
    }
}

/// One possible shape of an opaque union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember {
    pub target: TypeTarget,
    pub depth: usize,
}

impl UnionMember {
    #[must_use]
    pub fn rust_type(&self) -> String {
        wrap_vec(&self.target.rust_type(), self.depth)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Alias(TypeTarget),
    Enum(EnumShape),
    Struct(Vec<ClassifiedNode>),
    MergedStruct(Vec<MergedMember>),
    OpaqueUnion(Vec<UnionMember>),
    /// Decimal-string keys only.
    KeyedMap { value: TypeTarget },
}

#[derive(Debug, Clone)]
pub struct ClassifiedNode {
    /// JSON key, parameter name, or definition name.
    pub name: String,
    /// Rust field identifier for `name`.
    pub ident: String,
    pub path: JsonPointer,
    pub depth: usize,
    pub required: bool,
    pub description: Option<String>,
    pub limits: Limits,
    /// Item-count bounds per array level, outermost first.
    pub array_bounds: Vec<ItemBounds>,
    /// Emitted type name for enum, struct, merged struct and union shapes.
    pub decl_name: Option<String>,
    pub kind: NodeKind,
}

impl ClassifiedNode {
    /// Rust type of one element, before array wrapping.
    #[must_use]
    pub fn element_type(&self) -> String {
        match &self.kind {
            NodeKind::Alias(target) => target.rust_type(),
            NodeKind::KeyedMap { value } => format!("BTreeMap<String, {}>", value.rust_type()),
            _ => self.decl_name.clone().unwrap_or_default(),
        }
    }

    /// Rust type including array wrapping.
    #[must_use]
    pub fn rust_type(&self) -> String {
        wrap_vec(&self.element_type(), self.depth)
    }

    /// True when the value is a sequence, either directly or through a
    /// referenced array definition.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.depth > 0
            || matches!(
                &self.kind,
                NodeKind::Alias(TypeTarget::Reference { ref_depth, .. }) if *ref_depth > 0
            )
    }

    /// True when an optional value must be boxed.
    #[must_use]
    pub fn needs_box(&self) -> bool {
        !self.is_sequence()
            && matches!(
                &self.kind,
                NodeKind::Alias(TypeTarget::Reference {
                    struct_like: true,
                    ..
                })
            )
    }

    /// This node and every nested node that declares a type, parents first.
    #[must_use]
    pub fn declarations(&self) -> Vec<&ClassifiedNode> {
        let mut out: Vec<&ClassifiedNode> = Vec::new();
        self.collect_declarations(&mut out);
        out
    }

    fn collect_declarations<'a>(&'a self, out: &mut Vec<&'a ClassifiedNode>) {
        if self.decl_name.is_some() {
            out.push(self);
        }
        match &self.kind {
            NodeKind::Struct(fields) => {
                for field in fields {
                    field.collect_declarations(out);
                }
            }
            NodeKind::MergedStruct(members) => {
                for member in members {
                    if let MergedMember::Field(field) = member {
                        field.collect_declarations(out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Wraps `element` in `depth` levels of `Vec`.
#[must_use]
pub fn wrap_vec(element: &str, depth: usize) -> String {
    let mut out: String = element.to_string();
    for _ in 0..depth {
        out = format!("Vec<{out}>");
    }
    out
}

/// How a node's declaration is named.
#[derive(Debug, Clone, Copy)]
enum DeclNaming<'a> {
    /// Top-level definition: its reserved type name, and the reserved element
    /// name used when the definition is an array.
    TopLevel {
        type_name: &'a str,
        item_name: Option<&'a str>,
    },
    /// Anonymous shape under `parent`.
    Nested { parent: &'a str },
}

/// One document's top-level definitions.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionSet<'a> {
    /// Pointer segment naming the document (`objects`, `responses`).
    pub document: &'static str,
    pub definitions: &'a BTreeMap<String, SchemaNode>,
}

/// Result of the registration pass: the sealed table plus reserved names.
#[derive(Debug)]
pub struct Registry {
    pub table: ReferenceTable,
    item_names: BTreeMap<String, String>,
}

impl Registry {
    /// Registers every top-level definition of `documents` and seals the
    /// table. Top-level names are reserved in `arena` before any nested name.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, enums without values, unsupported enum
    /// literals, and nodes without a shape.
    pub fn register(
        documents: &[DefinitionSet<'_>],
        arena: &mut NameArena,
    ) -> Result<Self, BindgenError> {
        let mut builder: ReferenceTableBuilder = ReferenceTableBuilder::new();
        let mut item_names: BTreeMap<String, String> = BTreeMap::new();
        let mut intakes: Vec<(&str, &str, IntakeNode<'_>)> = Vec::new();

        for set in documents {
            for (name, node) in set.definitions {
                let path: JsonPointer = JsonPointer::root().child(set.document).child(name);
                let node: IntakeNode<'_> =
                    intake(node).map_err(|kind| BindgenError::classify(path, kind))?;
                intakes.push((set.document, name, node));
            }
        }

        let mut type_names: Vec<String> = Vec::with_capacity(intakes.len());
        for (_, name, _) in &intakes {
            type_names.push(arena.claim(&type_name(name)));
        }

        for ((document, name, node), reserved) in intakes.iter().zip(type_names) {
            let path: JsonPointer = JsonPointer::root().child(document).child(name);
            let target: RefTarget = match node.shape {
                Shape::Reference(next) => RefTarget::Alias(next.to_string()),
                Shape::Primitive(p) => RefTarget::Primitive(p),
                Shape::Enum { values, names } => {
                    let shape: EnumShape = parse_enum(values, names)
                        .map_err(|kind| BindgenError::classify(path.clone(), kind))?;
                    RefTarget::Enum(shape.value_type)
                }
                Shape::AllOf(_) => RefTarget::MergedStruct,
                Shape::OneOf(_) => RefTarget::Union,
                Shape::Properties { .. } => RefTarget::Struct,
                Shape::PatternProperties(_) => RefTarget::KeyedMap,
            };
            let declares: bool = matches!(
                target,
                RefTarget::Enum(_) | RefTarget::Struct | RefTarget::MergedStruct | RefTarget::Union
            );
            if declares && node.depth > 0 {
                item_names.insert((*name).to_string(), arena.claim(&format!("{reserved}Item")));
            }
            builder
                .register(
                    name,
                    RefEntry {
                        type_name: reserved,
                        depth: node.depth,
                        target,
                    },
                )
                .map_err(|kind| BindgenError::classify(path, kind))?;
        }

        let table: ReferenceTable = builder.seal();
        debug!(definitions = table.len(), "reference table sealed");
        Ok(Self { table, item_names })
    }
}

/// Recursive builder over a sealed table.
pub struct Classifier<'r> {
    registry: &'r Registry,
    arena: NameArena,
    deny_merged_collisions: bool,
}

impl<'r> Classifier<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry, arena: NameArena, deny_merged_collisions: bool) -> Self {
        Self {
            registry,
            arena,
            deny_merged_collisions,
        }
    }

    #[must_use]
    pub fn table(&self) -> &ReferenceTable {
        &self.registry.table
    }

    /// Reserves a globally unique type name, e.g. for a request type.
    pub fn claim_name(&mut self, candidate: &str) -> String {
        self.arena.claim(candidate)
    }

    /// Classifies a registered top-level definition.
    ///
    /// # Errors
    ///
    /// Fails with the JSON Pointer of the offending node.
    pub fn classify_definition(
        &mut self,
        document: &str,
        name: &str,
        node: &SchemaNode,
    ) -> Result<ClassifiedNode, BindgenError> {
        let path: JsonPointer = JsonPointer::root().child(document).child(name);
        let entry: &RefEntry = self
            .registry
            .table
            .get(name)
            .map_err(|kind| BindgenError::classify(path.clone(), kind))?;
        let reserved: String = entry.type_name.clone();
        let item_name: Option<String> = self.registry.item_names.get(name).cloned();
        self.classify(
            name,
            node,
            path,
            DeclNaming::TopLevel {
                type_name: &reserved,
                item_name: item_name.as_deref(),
            },
            Some(true),
        )
    }

    /// Classifies a method parameter; anonymous shapes are named under
    /// `request_type`.
    ///
    /// # Errors
    ///
    /// Fails with the JSON Pointer of the offending node.
    pub fn classify_parameter(
        &mut self,
        request_type: &str,
        name: &str,
        node: &SchemaNode,
        path: JsonPointer,
    ) -> Result<ClassifiedNode, BindgenError> {
        self.classify(
            name,
            node,
            path,
            DeclNaming::Nested {
                parent: request_type,
            },
            None,
        )
    }

    fn classify(
        &mut self,
        name: &str,
        node: &SchemaNode,
        path: JsonPointer,
        naming: DeclNaming<'_>,
        required: Option<bool>,
    ) -> Result<ClassifiedNode, BindgenError> {
        let intake_node: IntakeNode<'_> =
            intake(node).map_err(|kind| BindgenError::classify(path.clone(), kind))?;
        let required: bool = required.unwrap_or_else(|| intake_node.is_required());
        let depth: usize = intake_node.depth;

        let (decl_name, kind): (Option<String>, NodeKind) = match intake_node.shape {
            Shape::Reference(reference) => {
                let target: TypeTarget = self.reference_target(reference, &path)?;
                (None, NodeKind::Alias(target))
            }
            Shape::Primitive(p) => (None, NodeKind::Alias(TypeTarget::Primitive(p))),
            Shape::Enum { values, names } => {
                let shape: EnumShape =
                    parse_enum(values, names).map_err(|kind| BindgenError::classify(path.clone(), kind))?;
                let decl: String = self.decl_name(naming, name, depth);
                (Some(decl), NodeKind::Enum(shape))
            }
            Shape::Properties {
                properties,
                required: required_names,
            } => {
                let decl: String = self.decl_name(naming, name, depth);
                let fields: Vec<ClassifiedNode> =
                    self.classify_properties(&decl, properties, required_names, &path)?;
                (Some(decl), NodeKind::Struct(sort_fields(fields)))
            }
            Shape::AllOf(members) => {
                let decl: String = self.decl_name(naming, name, depth);
                let members: Vec<MergedMember> = self.classify_merged(&decl, members, &path)?;
                (Some(decl), NodeKind::MergedStruct(members))
            }
            Shape::OneOf(members) => {
                let decl: String = self.decl_name(naming, name, depth);
                let members: Vec<UnionMember> = self.classify_union(members, &path)?;
                (Some(decl), NodeKind::OpaqueUnion(members))
            }
            Shape::PatternProperties(patterns) => {
                let value: TypeTarget = self.classify_keyed_map(patterns, &path)?;
                (None, NodeKind::KeyedMap { value })
            }
        };

        Ok(ClassifiedNode {
            name: name.to_string(),
            ident: field_name(name),
            path,
            depth,
            required,
            description: intake_node.description,
            limits: intake_node.limits,
            array_bounds: intake_node.array_bounds,
            decl_name,
            kind,
        })
    }

    fn decl_name(&mut self, naming: DeclNaming<'_>, name: &str, depth: usize) -> String {
        match naming {
            DeclNaming::TopLevel {
                type_name,
                item_name,
            } => {
                if depth > 0 {
                    item_name.map_or_else(
                        || self.arena.claim(&format!("{type_name}Item")),
                        str::to_string,
                    )
                } else {
                    type_name.to_string()
                }
            }
            DeclNaming::Nested { parent } => self.arena.claim_nested(parent, name),
        }
    }

    fn reference_target(
        &self,
        reference: &str,
        path: &JsonPointer,
    ) -> Result<TypeTarget, BindgenError> {
        let table: &ReferenceTable = &self.registry.table;
        let located = |kind: ClassifyErrorKind| BindgenError::classify(path.clone(), kind);
        let entry: &RefEntry = table.get(reference).map_err(located)?;
        let ref_depth: usize = table.chain_end(reference).map_err(located)?.depth;
        let struct_like: bool = table.is_struct_like(reference).map_err(located)?;
        Ok(TypeTarget::Reference {
            name: reference.to_string(),
            type_name: entry.type_name.clone(),
            ref_depth,
            struct_like,
        })
    }

    fn classify_properties(
        &mut self,
        parent: &str,
        properties: &BTreeMap<String, SchemaNode>,
        required_names: &[String],
        path: &JsonPointer,
    ) -> Result<Vec<ClassifiedNode>, BindgenError> {
        let mut fields: Vec<ClassifiedNode> = Vec::with_capacity(properties.len());
        for (key, property) in properties {
            let child_path: JsonPointer = path.child("properties").child(key);
            let listed: bool = required_names.iter().any(|r| r == key);
            let own: bool = matches!(property.required, Some(RequiredKeyword::Flag(true)));
            let field: ClassifiedNode = self.classify(
                key,
                property,
                child_path,
                DeclNaming::Nested { parent },
                Some(listed || own),
            )?;
            fields.push(field);
        }
        Ok(fields)
    }

    fn classify_merged(
        &mut self,
        parent: &str,
        members: &[SchemaNode],
        path: &JsonPointer,
    ) -> Result<Vec<MergedMember>, BindgenError> {
        let mut merged: Vec<MergedMember> = Vec::new();
        let mut by_key: BTreeMap<String, usize> = BTreeMap::new();

        for (index, member) in members.iter().enumerate() {
            let member_path: JsonPointer = path.child("allOf").index(index);
            let member_intake: IntakeNode<'_> =
                intake(member).map_err(|kind| BindgenError::classify(member_path.clone(), kind))?;
            match member_intake.shape {
                Shape::Reference(reference) if member_intake.depth == 0 => {
                    let table: &ReferenceTable = &self.registry.table;
                    let struct_like: bool = table
                        .is_struct_like(reference)
                        .map_err(|kind| BindgenError::classify(member_path.clone(), kind))?;
                    if !struct_like {
                        return Err(BindgenError::classify(
                            member_path,
                            ClassifyErrorKind::UnsupportedMergedMember,
                        ));
                    }
                    let type_name: String = table
                        .get(reference)
                        .map_err(|kind| BindgenError::classify(member_path.clone(), kind))?
                        .type_name
                        .clone();
                    merged.push(MergedMember::Embedded {
                        ident: field_name(reference),
                        reference: reference.to_string(),
                        type_name,
                    });
                }
                Shape::Properties {
                    properties,
                    required,
                } if member_intake.depth == 0 => {
                    let fields: Vec<ClassifiedNode> =
                        self.classify_properties(parent, properties, required, &member_path)?;
                    for field in fields {
                        if let Some(&slot) = by_key.get(&field.name) {
                            if self.deny_merged_collisions {
                                return Err(BindgenError::classify(
                                    field.path,
                                    ClassifyErrorKind::MergedCollision(field.name),
                                ));
                            }
                            warn!(
                                path = %field.path,
                                field = %field.name,
                                "allOf member overrides an earlier field"
                            );
                            merged[slot] = MergedMember::Field(field);
                        } else {
                            by_key.insert(field.name.clone(), merged.len());
                            merged.push(MergedMember::Field(field));
                        }
                    }
                }
                _ => {
                    return Err(BindgenError::classify(
                        member_path,
                        ClassifyErrorKind::UnsupportedMergedMember,
                    ));
                }
            }
        }

        let idents: Vec<String> =
            disambiguate(merged.iter().map(|m| m.ident().to_string()).collect());
        for (member, ident) in merged.iter_mut().zip(idents) {
            match member {
                MergedMember::Embedded { ident: slot, .. } => *slot = ident,
                MergedMember::Field(node) => node.ident = ident,
            }
        }
        merged.sort_by(|a, b| a.ident().cmp(b.ident()));
        Ok(merged)
    }

    fn classify_union(
        &self,
        members: &[SchemaNode],
        path: &JsonPointer,
    ) -> Result<Vec<UnionMember>, BindgenError> {
        let mut out: Vec<UnionMember> = Vec::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            let member_path: JsonPointer = path.child("oneOf").index(index);
            let member_intake: IntakeNode<'_> =
                intake(member).map_err(|kind| BindgenError::classify(member_path.clone(), kind))?;
            let target: TypeTarget = match member_intake.shape {
                Shape::Reference(reference) => self.reference_target(reference, &member_path)?,
                Shape::Primitive(p) => TypeTarget::Primitive(p),
                _ => {
                    return Err(BindgenError::classify(
                        member_path,
                        ClassifyErrorKind::UnsupportedUnionMember,
                    ));
                }
            };
            out.push(UnionMember {
                target,
                depth: member_intake.depth,
            });
        }
        if out.is_empty() {
            return Err(BindgenError::classify(
                path.clone(),
                ClassifyErrorKind::UnsupportedUnionMember,
            ));
        }
        Ok(out)
    }

    fn classify_keyed_map(
        &self,
        patterns: &BTreeMap<String, SchemaNode>,
        path: &JsonPointer,
    ) -> Result<TypeTarget, BindgenError> {
        let mut entries = patterns.iter();
        let (Some((pattern, value)), None) = (entries.next(), entries.next()) else {
            let described: String = patterns.keys().cloned().collect::<Vec<_>>().join(", ");
            return Err(BindgenError::classify(
                path.clone(),
                ClassifyErrorKind::UnsupportedPattern(described),
            ));
        };
        let pattern_path: JsonPointer = path.child("patternProperties").child(pattern);
        if !is_numeric_key_pattern(pattern)
            .map_err(|kind| BindgenError::classify(pattern_path.clone(), kind))?
        {
            return Err(BindgenError::classify(
                pattern_path,
                ClassifyErrorKind::UnsupportedPattern(pattern.clone()),
            ));
        }
        let Some(reference) = value.reference.as_deref() else {
            return Err(BindgenError::classify(
                pattern_path,
                ClassifyErrorKind::KeyedMapWithoutReference,
            ));
        };
        self.reference_target(reference_name(reference), &pattern_path)
    }
}

/// Sorts fields by emitted name after resolving identifier collisions.
pub(crate) fn sort_fields(fields: Vec<ClassifiedNode>) -> Vec<ClassifiedNode> {
    let idents: Vec<String> = disambiguate(fields.iter().map(|f| f.ident.clone()).collect());
    let mut fields: Vec<ClassifiedNode> = fields
        .into_iter()
        .zip(idents)
        .map(|(mut field, ident)| {
            field.ident = ident;
            field
        })
        .collect();
    fields.sort_by(|a, b| a.ident.cmp(&b.ident));
    fields
}

/// True when `pattern` accepts decimal digit strings and nothing else.
///
/// # Errors
///
/// Returns [`ClassifyErrorKind::InvalidPattern`] if `pattern` does not compile.
pub fn is_numeric_key_pattern(pattern: &str) -> Result<bool, ClassifyErrorKind> {
    let regex: regress::Regex =
        regress::Regex::new(pattern).map_err(|e| ClassifyErrorKind::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
    let accepts_digits: bool = NUMERIC_KEYS.iter().all(|key| regex.find(key).is_some());
    let rejects_others: bool = NON_NUMERIC_KEYS.iter().all(|key| regex.find(key).is_none());
    Ok(accepts_digits && rejects_others)
}

/// Builds an enum shape. The value type comes from the first literal; numbers
/// become signed integers even when written as floats. Duplicate literals are
/// dropped.
///
/// # Errors
///
/// Fails for an empty list and for literals that are not strings, numbers or
/// booleans, or that differ in kind from the first literal.
pub fn parse_enum(
    values: &[serde_json::Value],
    names: Option<&[String]>,
) -> Result<EnumShape, ClassifyErrorKind> {
    let first: &serde_json::Value = values.first().ok_or(ClassifyErrorKind::EmptyEnum)?;
    let value_type: Primitive = match first {
        serde_json::Value::String(_) => Primitive::String,
        serde_json::Value::Number(_) => Primitive::Integer,
        serde_json::Value::Bool(_) => Primitive::Bool,
        other => return Err(ClassifyErrorKind::InvalidEnumLiteral(other.to_string())),
    };

    let mut literals: Vec<(EnumLiteral, String)> = Vec::with_capacity(values.len());
    for (index, raw) in values.iter().enumerate() {
        let literal: EnumLiteral = match (value_type, raw) {
            (Primitive::String, serde_json::Value::String(s)) => EnumLiteral::String(s.clone()),
            (Primitive::Integer, serde_json::Value::Number(n)) => {
                #[expect(clippy::cast_possible_truncation)]
                let integer: Option<i64> = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
                EnumLiteral::Integer(
                    integer.ok_or_else(|| ClassifyErrorKind::InvalidEnumLiteral(n.to_string()))?,
                )
            }
            (Primitive::Bool, serde_json::Value::Bool(b)) => EnumLiteral::Bool(*b),
            (_, other) => return Err(ClassifyErrorKind::InvalidEnumLiteral(other.to_string())),
        };
        if literals.iter().any(|(existing, _)| *existing == literal) {
            continue;
        }
        let label: String = names
            .and_then(|n| n.get(index))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| match &literal {
                EnumLiteral::String(s) => s.clone(),
                EnumLiteral::Integer(n) => n.to_string(),
                EnumLiteral::Bool(b) => b.to_string(),
            });
        literals.push((literal, label));
    }

    let base_idents: Vec<String> = literals
        .iter()
        .map(|(_, label)| {
            if value_type == Primitive::String {
                variant_name(label)
            } else {
                const_name(label)
            }
        })
        .collect();
    let idents: Vec<String> = disambiguate(base_idents);
    let variants: Vec<EnumVariant> = literals
        .into_iter()
        .zip(idents)
        .map(|((value, label), ident)| EnumVariant {
            value,
            label,
            ident,
        })
        .collect();
    Ok(EnumShape {
        value_type,
        variants,
    })
}
