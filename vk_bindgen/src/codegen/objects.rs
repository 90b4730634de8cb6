//! Type declarations for object and response definitions.

use std::collections::BTreeMap;
use std::io::Write;

use super::{emit_doc_comment, emit_doc_lines, emit_file_header, emit_node_docs, rename_attr};
use crate::classify::{ClassifiedNode, EnumShape, MergedMember, NodeKind, UnionMember};
use crate::intake::Primitive;

const OPTION_ATTR: &str = "#[serde(default, skip_serializing_if = \"Option::is_none\")]";
const VEC_ATTR: &str = "#[serde(default, skip_serializing_if = \"Vec::is_empty\")]";

/// A classified top-level definition and its reserved type name.
#[derive(Debug, Clone)]
pub struct Definition {
    pub type_name: String,
    pub node: ClassifiedNode,
}

/// One emitted item of an objects or responses file.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    /// `enum` or `struct` declared for a classified shape.
    Declaration(&'a ClassifiedNode),
    /// `pub type` for a top-level definition that declares no type of its own
    /// under its name.
    Alias {
        name: &'a str,
        node: &'a ClassifiedNode,
    },
}

/// Every item declared by `definitions`, keyed and ordered by type name.
#[must_use]
pub fn collect_items(definitions: &[Definition]) -> BTreeMap<String, Item<'_>> {
    let mut items: BTreeMap<String, Item<'_>> = BTreeMap::new();
    for definition in definitions {
        collect_declarations(&definition.node, &mut items);
        if definition.node.decl_name.as_deref() != Some(definition.type_name.as_str()) {
            items.insert(
                definition.type_name.clone(),
                Item::Alias {
                    name: &definition.type_name,
                    node: &definition.node,
                },
            );
        }
    }
    items
}

/// Adds `node` and its nested declarations to `items`.
pub(crate) fn collect_declarations<'a>(
    node: &'a ClassifiedNode,
    items: &mut BTreeMap<String, Item<'a>>,
) {
    for declaration in node.declarations() {
        if let Some(name) = &declaration.decl_name {
            items.insert(name.clone(), Item::Declaration(declaration));
        }
    }
}

/// Emits a complete objects or responses file.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn emit_objects<W: Write>(
    writer: &mut W,
    items: &BTreeMap<String, Item<'_>>,
    runtime_path: &str,
) -> std::io::Result<()> {
    emit_file_header(writer, false)?;
    writeln!(writer, "use std::collections::BTreeMap;")?;
    writeln!(writer)?;
    writeln!(writer, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(writer)?;
    writeln!(writer, "use {runtime_path}::RawJson;")?;
    writeln!(writer)?;
    writeln!(writer, "use super::*;")?;
    writeln!(writer)?;
    for item in items.values() {
        emit_item(writer, *item)?;
    }
    Ok(())
}

pub(crate) fn emit_item<W: Write>(writer: &mut W, item: Item<'_>) -> std::io::Result<()> {
    match item {
        Item::Declaration(node) => emit_declaration(writer, node),
        Item::Alias { name, node } => {
            emit_node_docs(writer, node, "")?;
            writeln!(writer, "pub type {name} = {};", node.rust_type())?;
            writeln!(writer)
        }
    }
}

fn emit_declaration<W: Write>(writer: &mut W, node: &ClassifiedNode) -> std::io::Result<()> {
    let Some(name) = node.decl_name.as_deref() else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Enum(shape) if shape.value_type == Primitive::String => {
            emit_string_enum(writer, name, node, shape)
        }
        NodeKind::Enum(shape) => emit_newtype_enum(writer, name, node, shape),
        NodeKind::Struct(fields) => {
            emit_node_docs(writer, node, "")?;
            writeln!(writer, "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]")?;
            writeln!(writer, "pub struct {name} {{")?;
            for field in fields {
                emit_field(writer, field)?;
            }
            writeln!(writer, "}}")?;
            writeln!(writer)
        }
        NodeKind::MergedStruct(members) => {
            emit_node_docs(writer, node, "")?;
            writeln!(writer, "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]")?;
            writeln!(writer, "pub struct {name} {{")?;
            for member in members {
                match member {
                    MergedMember::Embedded {
                        ident, type_name, ..
                    } => {
                        writeln!(writer, "    #[serde(flatten)]")?;
                        writeln!(writer, "    pub {ident}: {type_name},")?;
                    }
                    MergedMember::Field(field) => emit_field(writer, field)?,
                }
            }
            writeln!(writer, "}}")?;
            writeln!(writer)
        }
        NodeKind::OpaqueUnion(members) => emit_union(writer, name, node, members),
        NodeKind::Alias(_) | NodeKind::KeyedMap { .. } => Ok(()),
    }
}

/// Rust type of a struct field and the serde attribute its optionality needs.
pub(crate) fn field_type(field: &ClassifiedNode) -> (String, Option<&'static str>) {
    let base: String = field.rust_type();
    if field.is_sequence() {
        let attr: Option<&'static str> = if field.required { None } else { Some(VEC_ATTR) };
        (base, attr)
    } else if field.required {
        (base, None)
    } else if field.needs_box() {
        (format!("Option<Box<{base}>>"), Some(OPTION_ATTR))
    } else {
        (format!("Option<{base}>"), Some(OPTION_ATTR))
    }
}

pub(crate) fn emit_field<W: Write>(writer: &mut W, field: &ClassifiedNode) -> std::io::Result<()> {
    emit_node_docs(writer, field, "    ")?;
    if let Some(rename) = rename_attr(&field.ident, &field.name) {
        writeln!(writer, "    {rename}")?;
    }
    let (type_str, attr): (String, Option<&'static str>) = field_type(field);
    if let Some(attr) = attr {
        writeln!(writer, "    {attr}")?;
    }
    writeln!(writer, "    pub {}: {type_str},", field.ident)
}

fn emit_string_enum<W: Write>(
    writer: &mut W,
    name: &str,
    node: &ClassifiedNode,
    shape: &EnumShape,
) -> std::io::Result<()> {
    emit_node_docs(writer, node, "")?;
    writeln!(
        writer,
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]"
    )?;
    writeln!(writer, "pub enum {name} {{")?;
    for variant in &shape.variants {
        let literal: String = variant.value.rust_literal();
        if format!("{:?}", variant.label) != literal {
            emit_doc_comment(writer, Some(variant.label.as_str()), "    ")?;
        }
        writeln!(writer, "    #[serde(rename = {literal})]")?;
        writeln!(writer, "    {},", variant.ident)?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)?;

    writeln!(writer, "impl {name} {{")?;
    emit_all_fn(writer, shape)?;
    writeln!(writer)?;
    writeln!(writer, "    /// Wire value.")?;
    writeln!(writer, "    #[must_use]")?;
    writeln!(writer, "    pub fn as_str(self) -> &'static str {{")?;
    writeln!(writer, "        match self {{")?;
    for variant in &shape.variants {
        writeln!(
            writer,
            "            Self::{} => {},",
            variant.ident,
            variant.value.rust_literal()
        )?;
    }
    writeln!(writer, "        }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

fn emit_newtype_enum<W: Write>(
    writer: &mut W,
    name: &str,
    node: &ClassifiedNode,
    shape: &EnumShape,
) -> std::io::Result<()> {
    emit_node_docs(writer, node, "")?;
    writeln!(
        writer,
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]"
    )?;
    writeln!(writer, "#[serde(transparent)]")?;
    writeln!(writer, "pub struct {name}(pub {});", shape.value_type.rust_type())?;
    writeln!(writer)?;
    writeln!(writer, "impl {name} {{")?;
    for variant in &shape.variants {
        writeln!(
            writer,
            "    pub const {}: Self = Self({});",
            variant.ident,
            variant.value.rust_literal()
        )?;
    }
    writeln!(writer)?;
    emit_all_fn(writer, shape)?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

fn emit_all_fn<W: Write>(writer: &mut W, shape: &EnumShape) -> std::io::Result<()> {
    let values: Vec<String> = shape
        .variants
        .iter()
        .map(|v| format!("Self::{}", v.ident))
        .collect();
    writeln!(writer, "    /// Every declared value, in schema order.")?;
    writeln!(writer, "    #[must_use]")?;
    writeln!(writer, "    pub fn all() -> &'static [Self] {{")?;
    writeln!(writer, "        &[{}]", values.join(", "))?;
    writeln!(writer, "    }}")
}

fn emit_union<W: Write>(
    writer: &mut W,
    name: &str,
    node: &ClassifiedNode,
    members: &[UnionMember],
) -> std::io::Result<()> {
    emit_node_docs(writer, node, "")?;
    let shapes: Vec<String> = members.iter().map(|m| format!("`{}`", m.rust_type())).collect();
    let line: String = format!("May hold one of: {}.", shapes.join(", "));
    emit_doc_lines(writer, &[line], "", node.description.is_some())?;
    writeln!(
        writer,
        "#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]"
    )?;
    writeln!(writer, "#[serde(transparent)]")?;
    writeln!(writer, "pub struct {name}(pub RawJson);")?;
    writeln!(writer)?;
    writeln!(writer, "impl {name} {{")?;
    writeln!(writer, "    /// Undecoded payload.")?;
    writeln!(writer, "    #[must_use]")?;
    writeln!(writer, "    pub fn raw(&self) -> &RawJson {{")?;
    writeln!(writer, "        &self.0")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classifier, DefinitionSet, Registry};
    use crate::naming::NameArena;
    use crate::schema::DefinitionsFile;

    fn definitions(json: &str) -> Vec<Definition> {
        let file: DefinitionsFile = serde_json::from_str(json).unwrap();
        let mut arena: NameArena = NameArena::new();
        let sets: [DefinitionSet<'_>; 1] = [DefinitionSet {
            document: "objects",
            definitions: &file.definitions,
        }];
        let registry: Registry = Registry::register(&sets, &mut arena).unwrap();
        let mut classifier: Classifier<'_> = Classifier::new(&registry, arena, false);
        file.definitions
            .iter()
            .map(|(name, node)| Definition {
                type_name: registry.table.get(name).unwrap().type_name.clone(),
                node: classifier.classify_definition("objects", name, node).unwrap(),
            })
            .collect()
    }

    fn emit(json: &str) -> String {
        let defs: Vec<Definition> = definitions(json);
        let items: BTreeMap<String, Item<'_>> = collect_items(&defs);
        let mut out: Vec<u8> = Vec::new();
        emit_objects(&mut out, &items, "vk_bindgen::support").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn optional_fields_are_options_and_arrays_are_plain() {
        let actual: String = emit(
            r#"{"definitions": {"users_user": {"type": "object", "required": ["id"], "properties": {
                "id": {"type": "integer", "minimum": 0},
                "nickname": {"type": "string"},
                "photos": {"type": "array", "items": {"type": "string"}}
            }}}}"#,
        );
        assert!(actual.contains("    /// Minimum: 0\n    pub id: i64,\n"));
        assert!(actual.contains(
            "    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    pub nickname: Option<String>,\n"
        ));
        assert!(actual.contains(
            "    #[serde(default, skip_serializing_if = \"Vec::is_empty\")]\n    pub photos: Vec<String>,\n"
        ));
    }

    #[test]
    fn renames_keys_that_are_not_identifiers() {
        let actual: String = emit(
            r#"{"definitions": {"thing": {"type": "object", "required": ["isClosed", "type"], "properties": {
                "isClosed": {"type": "boolean"},
                "type": {"type": "string"}
            }}}}"#,
        );
        assert!(actual.contains("    #[serde(rename = \"isClosed\")]\n    pub is_closed: bool,\n"));
        assert!(actual.contains("    pub r#type: String,\n"));
    }

    #[test]
    fn string_enum_declaration() {
        let actual: String = emit(
            r#"{"definitions": {"base_sex": {"type": "string", "enum": ["male", "female"]}}}"#,
        );
        assert!(actual.contains("pub enum BaseSex {\n    #[serde(rename = \"male\")]\n    Male,\n"));
        assert!(actual.contains("Self::Female => \"female\","));
        assert!(actual.contains("&[Self::Male, Self::Female]"));
    }

    #[test]
    fn integer_enum_is_transparent_newtype() {
        let actual: String = emit(
            r#"{"definitions": {"base_bool_int": {"type": "integer", "enum": [0, 1], "enumNames": ["no", "yes"]}}}"#,
        );
        assert!(actual.contains("#[serde(transparent)]\npub struct BaseBoolInt(pub i64);"));
        assert!(actual.contains("    pub const NO: Self = Self(0);\n    pub const YES: Self = Self(1);\n"));
    }

    #[test]
    fn union_holds_raw_payload() {
        let actual: String = emit(
            r#"{"definitions": {"id_or_name": {"description": "Either.", "oneOf": [{"type": "integer"}, {"type": "string"}]}}}"#,
        );
        assert!(actual.contains("/// Either.\n///\n/// May hold one of: `i64`, `String`.\n"));
        assert!(actual.contains("pub struct IdOrName(pub RawJson);"));
    }

    #[test]
    fn aliases_and_array_definitions() {
        let actual: String = emit(
            r##"{"definitions": {
                "users_user_id": {"type": "integer"},
                "users_ids": {"type": "array", "items": {"$ref": "#/definitions/users_user_id"}},
                "photos_list": {"type": "array", "items": {"type": "object", "properties": {"id": {"type": "integer"}}}},
                "counts": {"type": "object", "patternProperties": {"^[0-9]+$": {"$ref": "#/definitions/users_user_id"}}}
            }}"##,
        );
        assert!(actual.contains("pub type UsersUserId = i64;"));
        assert!(actual.contains("pub type UsersIds = Vec<UsersUserId>;"));
        assert!(actual.contains("pub type PhotosList = Vec<PhotosListItem>;"));
        assert!(actual.contains("pub struct PhotosListItem {"));
        assert!(actual.contains("pub type Counts = BTreeMap<String, UsersUserId>;"));
    }

    #[test]
    fn merged_struct_flattens_references() {
        let actual: String = emit(
            r##"{"definitions": {
                "base": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "full": {"allOf": [{"$ref": "#/definitions/base"}, {"type": "object", "properties": {"name": {"type": "string"}}}]}
            }}"##,
        );
        assert!(actual.contains("pub struct Full {\n    #[serde(flatten)]\n    pub base: Base,\n"));
    }

    #[test]
    fn recursive_optional_reference_is_boxed() {
        let actual: String = emit(
            r##"{"definitions": {"comment": {"type": "object", "properties": {"reply": {"$ref": "#/definitions/comment"}}}}}"##,
        );
        assert!(actual.contains("pub reply: Option<Box<Comment>>,"));
    }

    #[test]
    fn items_sorted_by_name() {
        let actual: String = emit(
            r#"{"definitions": {"b_thing": {"type": "string"}, "a_thing": {"type": "integer"}}}"#,
        );
        let a: usize = actual.find("pub type AThing").unwrap();
        let b: usize = actual.find("pub type BThing").unwrap();
        assert!(a < b);
    }
}
