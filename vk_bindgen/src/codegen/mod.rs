//! Rust source emission.
//!
//! Every emitter writes plain text through [`std::io::Write`]; the output
//! stage parses and formats the result before it is published.

pub mod errors;
pub mod fixtures;
pub mod methods;
pub mod objects;
pub mod version;

use std::io::Write;

use crate::classify::ClassifiedNode;

/// First line of every emitted file.
pub const GENERATED_BANNER: &str = "//! Generated by vk-bindgen. Do not edit manually.";

/// Writes the banner and the crate-level allowances shared by all files.
pub(crate) fn emit_file_header<W: Write>(writer: &mut W, test_file: bool) -> std::io::Result<()> {
    writeln!(writer, "{GENERATED_BANNER}")?;
    writeln!(writer)?;
    if test_file {
        writeln!(writer, "#![allow(unused_imports, unused_mut, unused_variables)]")?;
    } else {
        writeln!(writer, "#![allow(unused_imports, non_camel_case_types)]")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Normalize description: trim and treat empty/whitespace as None.
pub(crate) fn normalize_description(s: Option<&str>) -> Option<String> {
    s.and_then(|t| {
        let trimmed: &str = t.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Emits `///` lines for `description`. Carriage returns are dropped since a
/// doc comment may not contain a bare CR.
pub(crate) fn emit_doc_comment<W: Write>(
    writer: &mut W,
    description: Option<&str>,
    line_prefix: &str,
) -> std::io::Result<()> {
    let Some(desc) = normalize_description(description) else {
        return Ok(());
    };
    for line in desc.lines() {
        let line: String = line.replace('\r', "");
        let line: &str = line.trim_end();
        if line.is_empty() {
            writeln!(writer, "{line_prefix}///")?;
        } else {
            writeln!(writer, "{line_prefix}/// {line}")?;
        }
    }
    Ok(())
}

/// Emits one `///` line per entry, separated from preceding docs by a blank
/// doc line when `separate` is set.
pub(crate) fn emit_doc_lines<W: Write>(
    writer: &mut W,
    lines: &[String],
    line_prefix: &str,
    separate: bool,
) -> std::io::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    if separate {
        writeln!(writer, "{line_prefix}///")?;
    }
    for line in lines {
        writeln!(writer, "{line_prefix}/// {line}")?;
    }
    Ok(())
}

/// Documentation of a classified node: description, then limits and item
/// bounds per array level.
pub(crate) fn emit_node_docs<W: Write>(
    writer: &mut W,
    node: &ClassifiedNode,
    line_prefix: &str,
) -> std::io::Result<()> {
    emit_doc_comment(writer, node.description.as_deref(), line_prefix)?;
    let mut lines: Vec<String> = node.limits.doc_lines();
    for (level, bounds) in node.array_bounds.iter().enumerate() {
        let scope: String = if level == 0 {
            String::new()
        } else {
            format!(" (level {level})")
        };
        if let Some(min) = bounds.min_items {
            lines.push(format!("MinItems{scope}: {min}"));
        }
        if let Some(max) = bounds.max_items {
            lines.push(format!("MaxItems{scope}: {max}"));
        }
    }
    emit_doc_lines(writer, &lines, line_prefix, node.description.is_some())
}

/// Rust string literal for `s`.
pub(crate) fn string_literal(s: &str) -> String {
    format!("{s:?}")
}

/// `#[serde(rename = "...")]` when the field identifier does not spell the
/// JSON key.
pub(crate) fn rename_attr(ident: &str, key: &str) -> Option<String> {
    let bare: &str = ident.strip_prefix("r#").unwrap_or(ident);
    if bare == key {
        None
    } else {
        Some(format!("#[serde(rename = {})]", string_literal(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_comment_lines() {
        let mut out: Vec<u8> = Vec::new();
        emit_doc_comment(&mut out, Some("  first\r\n\nsecond  "), "    ").unwrap();
        let actual: String = String::from_utf8(out).unwrap();
        let expected: &str = "    /// first\n    ///\n    /// second\n";
        assert_eq!(expected, actual);
    }

    #[test]
    fn empty_description_emits_nothing() {
        let mut out: Vec<u8> = Vec::new();
        emit_doc_comment(&mut out, Some("   "), "").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn rename_only_when_needed() {
        assert_eq!(None, rename_attr("r#type", "type"));
        assert_eq!(None, rename_attr("user_id", "user_id"));
        assert_eq!(
            Some("#[serde(rename = \"isClosed\")]".to_string()),
            rename_attr("is_closed", "isClosed")
        );
        assert_eq!(
            Some("#[serde(rename = \"self\")]".to_string()),
            rename_attr("self_", "self")
        );
    }

    #[test]
    fn string_literal_escapes() {
        assert_eq!(r#""a\"b\\c""#, string_literal("a\"b\\c"));
    }
}
