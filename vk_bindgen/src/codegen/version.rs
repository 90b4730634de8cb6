use std::io::Write;

use super::{emit_file_header, string_literal};

/// API version sent with every call: the schema package version without its
/// patch component.
#[must_use]
pub fn api_version(package_version: &str) -> &str {
    package_version
        .rsplit_once('.')
        .map_or(package_version, |(head, _)| head)
}

/// Emits `version.rs`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn emit_version<W: Write>(writer: &mut W, package_version: &str) -> std::io::Result<()> {
    emit_file_header(writer, false)?;
    writeln!(writer, "/// API version the bindings were generated for.")?;
    writeln!(
        writer,
        "pub const VERSION: &str = {};",
        string_literal(api_version(package_version))
    )
}
