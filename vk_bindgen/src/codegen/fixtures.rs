//! Random fixtures and round-trip tests for emitted types.
//!
//! Every declared type gets an `impl RandomFill`; every emitted type name,
//! aliases included, gets a round-trip test.

use std::collections::BTreeMap;
use std::io::Write;

use heck::ToSnakeCase;

use super::emit_file_header;
use super::objects::Item;
use crate::classify::{ClassifiedNode, MergedMember, NodeKind, UnionMember};
use crate::naming::disambiguate;

/// Emits a complete `*_test.rs` file for an objects or responses file.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn emit_fixtures<W: Write>(
    writer: &mut W,
    items: &BTreeMap<String, Item<'_>>,
    runtime_path: &str,
) -> std::io::Result<()> {
    emit_file_header(writer, true)?;
    emit_test_uses(writer, runtime_path, &["assert_round_trip"])?;
    for item in items.values() {
        if let Item::Declaration(node) = item {
            emit_random_fill(writer, node)?;
        }
    }
    let names: Vec<&str> = items.keys().map(String::as_str).collect();
    emit_round_trip_tests(writer, &names)
}

pub(crate) fn emit_test_uses<W: Write>(
    writer: &mut W,
    runtime_path: &str,
    testing: &[&str],
) -> std::io::Result<()> {
    writeln!(writer, "use {runtime_path}::RawJson;")?;
    writeln!(writer, "use {runtime_path}::random::{{RandomFill, Rng}};")?;
    writeln!(writer, "use {runtime_path}::testing::{{{}}};", testing.join(", "))?;
    writeln!(writer)?;
    writeln!(writer, "use super::*;")?;
    writeln!(writer)
}

/// Emits `impl RandomFill` for one declared shape.
pub(crate) fn emit_random_fill<W: Write>(
    writer: &mut W,
    node: &ClassifiedNode,
) -> std::io::Result<()> {
    let Some(name) = node.decl_name.as_deref() else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Struct(fields) => {
            let idents: Vec<&str> = fields.iter().map(|f| f.ident.as_str()).collect();
            emit_struct_fill(writer, name, &idents)
        }
        NodeKind::MergedStruct(members) => {
            let idents: Vec<&str> = members.iter().map(MergedMember::ident).collect();
            emit_struct_fill(writer, name, &idents)
        }
        NodeKind::Enum(_) => {
            writeln!(writer, "impl RandomFill for {name} {{")?;
            writeln!(
                writer,
                "    fn random_fill<R: Rng + ?Sized>(rng: &mut R, _depth: usize) -> Self {{"
            )?;
            writeln!(writer, "        let all: &[Self] = Self::all();")?;
            writeln!(writer, "        all[rng.gen_range(0..all.len())]")?;
            writeln!(writer, "    }}")?;
            writeln!(writer, "}}")?;
            writeln!(writer)
        }
        NodeKind::OpaqueUnion(members) => emit_union_fill(writer, name, members),
        NodeKind::Alias(_) | NodeKind::KeyedMap { .. } => Ok(()),
    }
}

/// Every field filled one level deeper.
pub(crate) fn emit_struct_fill<W: Write>(
    writer: &mut W,
    name: &str,
    idents: &[&str],
) -> std::io::Result<()> {
    writeln!(writer, "impl RandomFill for {name} {{")?;
    writeln!(
        writer,
        "    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {{"
    )?;
    writeln!(writer, "        Self {{")?;
    for ident in idents {
        writeln!(
            writer,
            "            {ident}: RandomFill::random_fill(rng, depth + 1),"
        )?;
    }
    writeln!(writer, "        }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

/// Picks one member shape, fills it, and keeps only its JSON.
fn emit_union_fill<W: Write>(
    writer: &mut W,
    name: &str,
    members: &[UnionMember],
) -> std::io::Result<()> {
    writeln!(writer, "impl RandomFill for {name} {{")?;
    writeln!(
        writer,
        "    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {{"
    )?;
    let encode = |member: &UnionMember| {
        format!(
            "RawJson::encode(&<{} as RandomFill>::random_fill(rng, depth + 1))",
            member.rust_type()
        )
    };
    match members {
        [only] => {
            writeln!(writer, "        let raw: RawJson = {}", encode(only))?;
        }
        _ => {
            writeln!(
                writer,
                "        let raw: RawJson = match rng.gen_range(0..{}) {{",
                members.len()
            )?;
            let last: usize = members.len() - 1;
            for (index, member) in members.iter().enumerate() {
                let pattern: String = if index == last {
                    "_".to_string()
                } else {
                    index.to_string()
                };
                writeln!(writer, "            {pattern} => {},", encode(member))?;
            }
            writeln!(writer, "        }}")?;
        }
    }
    writeln!(writer, "        .expect(\"union member serializes\");")?;
    writeln!(writer, "        Self(raw)")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

fn emit_round_trip_tests<W: Write>(writer: &mut W, type_names: &[&str]) -> std::io::Result<()> {
    let test_names: Vec<String> = disambiguate(
        type_names
            .iter()
            .map(|name| format!("{}_round_trip", name.to_snake_case()))
            .collect(),
    );
    for (type_name, test_name) in type_names.iter().zip(test_names) {
        writeln!(writer, "#[test]")?;
        writeln!(writer, "fn {test_name}() {{")?;
        writeln!(writer, "    assert_round_trip::<{type_name}>();")?;
        writeln!(writer, "}}")?;
        writeln!(writer)?;
    }
    Ok(())
}
