//! Output validation, formatting, and publishing.
//!
//! Every file is parsed with `syn` before it is formatted with
//! `prettyplease`. A bundle is published as a whole: files are written into a
//! scratch directory next to the destination, which then replaces the
//! destination in one rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::BindgenError;

/// Generated files keyed by file name, e.g. `objects.rs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    files: BTreeMap<String, String>,
}

impl Bundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and formats `source`, then stores it under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`BindgenError::InvalidOutput`] if `source` is not valid Rust.
    pub fn insert(&mut self, file_name: &str, source: &str) -> Result<(), BindgenError> {
        let formatted: String = render(file_name, source)?;
        self.files.insert(file_name.to_string(), formatted);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(name, source)| (name.as_str(), source.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The bundle as one source for `include!` from a build script: every
    /// `mod name;` of `mod.rs` becomes an inline module holding `name.rs`.
    ///
    /// # Errors
    ///
    /// Returns [`BindgenError::InvalidOutput`] when `mod.rs` is missing or
    /// declares a module the bundle does not hold.
    pub fn inline_source(&self) -> Result<String, BindgenError> {
        let mut root: syn::File = parse(ROOT_MODULE, self.source_of(ROOT_MODULE)?)?;
        // An included file may not start with inner attributes.
        root.attrs.clear();
        for item in &mut root.items {
            let syn::Item::Mod(module) = item else {
                continue;
            };
            if module.content.is_some() {
                continue;
            }
            let file_name: String = format!("{}.rs", module.ident);
            let nested: syn::File = parse(&file_name, self.source_of(&file_name)?)?;
            module.attrs.extend(nested.attrs);
            module.content = Some((syn::token::Brace::default(), nested.items));
            module.semi = None;
        }
        debug!(files = self.len(), "inlined bundle");
        Ok(prettyplease::unparse(&root))
    }

    fn source_of(&self, file_name: &str) -> Result<&str, BindgenError> {
        self.get(file_name).ok_or_else(|| BindgenError::InvalidOutput {
            file: file_name.to_string(),
            message: "not part of the bundle".to_string(),
        })
    }
}

/// File that declares the other modules of a bundle.
pub const ROOT_MODULE: &str = "mod.rs";

fn parse(file_name: &str, source: &str) -> Result<syn::File, BindgenError> {
    syn::parse_file(source).map_err(|e| BindgenError::InvalidOutput {
        file: file_name.to_string(),
        message: e.to_string(),
    })
}

/// Validates `source` as a Rust file and pretty-prints it.
///
/// # Errors
///
/// Returns [`BindgenError::InvalidOutput`] with the parser message on failure.
pub fn render(file_name: &str, source: &str) -> Result<String, BindgenError> {
    let file: syn::File = parse(file_name, source)?;
    Ok(prettyplease::unparse(&file))
}

fn write_error(path: &Path, source: std::io::Error) -> BindgenError {
    BindgenError::WriteError {
        path: path.display().to_string(),
        source,
    }
}

fn sibling(dest: &Path, suffix: &str) -> Result<PathBuf, BindgenError> {
    let name: String = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            BindgenError::GenericError(format!("{} has no directory name", dest.display()))
        })?;
    Ok(dest.with_file_name(format!(".{name}.{suffix}")))
}

/// Replaces `dest` with a directory holding exactly the bundle's files.
///
/// A failed run leaves any previous `dest` in place.
///
/// # Errors
///
/// Returns [`BindgenError::WriteError`] naming the path that could not be
/// written, renamed, or removed.
pub fn publish(bundle: &Bundle, dest: &Path) -> Result<(), BindgenError> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }
    let scratch: PathBuf = sibling(dest, "tmp")?;
    let backup: PathBuf = sibling(dest, "bak")?;
    for stale in [&scratch, &backup] {
        if stale.exists() {
            fs::remove_dir_all(stale).map_err(|e| write_error(stale, e))?;
        }
    }

    fs::create_dir(&scratch).map_err(|e| write_error(&scratch, e))?;
    for (name, source) in bundle.files() {
        let path: PathBuf = scratch.join(name);
        fs::write(&path, source).map_err(|e| write_error(&path, e))?;
        debug!(file = %path.display(), bytes = source.len(), "wrote");
    }

    let had_previous: bool = dest.exists();
    if had_previous {
        fs::rename(dest, &backup).map_err(|e| write_error(dest, e))?;
    }
    if let Err(e) = fs::rename(&scratch, dest) {
        if had_previous {
            fs::rename(&backup, dest).map_err(|e| write_error(&backup, e))?;
        }
        return Err(write_error(dest, e));
    }
    if had_previous {
        fs::remove_dir_all(&backup).map_err(|e| write_error(&backup, e))?;
    }
    info!(dest = %dest.display(), files = bundle.len(), "published bindings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(files: &[(&str, &str)]) -> Bundle {
        let mut bundle: Bundle = Bundle::new();
        for (name, source) in files {
            bundle.insert(name, source).unwrap();
        }
        bundle
    }

    #[test]
    fn render_formats_valid_source() {
        let actual: String = render("a.rs", "pub struct A{pub x:i64}").unwrap();
        let expected: &str = "pub struct A {\n    pub x: i64,\n}\n";
        assert_eq!(expected, actual);
    }

    #[test]
    fn render_keeps_inner_docs_and_attributes() {
        let actual: String =
            render("a.rs", "//! Banner.\n\n#![allow(unused_imports)]\nuse std::fmt;").unwrap();
        assert!(actual.starts_with("//! Banner.\n"));
        assert!(actual.contains("#![allow(unused_imports)]\n"));
    }

    #[test]
    fn render_rejects_invalid_source() {
        let err: BindgenError = render("bad.rs", "pub struct {").unwrap_err();
        match err {
            BindgenError::InvalidOutput { file, .. } => assert_eq!("bad.rs", file),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inline_source_nests_declared_modules() {
        let bundle: Bundle = bundle(&[
            ("mod.rs", "//! Banner.\n\npub mod a;\n\npub use a::*;\n\n#[cfg(test)]\nmod a_test;"),
            ("a.rs", "//! Banner.\n\n#![allow(unused_imports)]\n\npub struct A;"),
            ("a_test.rs", "use super::*;"),
        ]);
        let actual: String = bundle.inline_source().unwrap();
        assert!(actual.starts_with("pub mod a {\n"));
        assert!(actual.contains("    #![allow(unused_imports)]\n"));
        assert!(actual.contains("    pub struct A;\n"));
        assert!(actual.contains("pub use a::*;\n"));
        assert!(actual.contains("#[cfg(test)]\nmod a_test {\n    use super::*;\n}\n"));
        let reparsed: syn::File = syn::parse_file(&actual).unwrap();
        assert_eq!(3, reparsed.items.len());
        assert!(reparsed.attrs.is_empty());
    }

    #[test]
    fn inline_source_requires_declared_files() {
        let bundle: Bundle = bundle(&[("mod.rs", "pub mod objects;")]);
        let err: BindgenError = bundle.inline_source().unwrap_err();
        match err {
            BindgenError::InvalidOutput { file, .. } => assert_eq!("objects.rs", file),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn publish_creates_destination() {
        let tmp: tempfile::TempDir = tempfile::tempdir().unwrap();
        let dest: PathBuf = tmp.path().join("out").join("vk");
        publish(&bundle(&[("a.rs", "pub struct A;")]), &dest).unwrap();
        let actual: String = fs::read_to_string(dest.join("a.rs")).unwrap();
        assert_eq!("pub struct A;\n", actual);
    }

    #[test]
    fn publish_replaces_previous_contents() {
        let tmp: tempfile::TempDir = tempfile::tempdir().unwrap();
        let dest: PathBuf = tmp.path().join("vk");
        publish(&bundle(&[("a.rs", "pub struct A;"), ("b.rs", "pub struct B;")]), &dest).unwrap();
        publish(&bundle(&[("a.rs", "pub struct A2;")]), &dest).unwrap();

        let mut actual: Vec<String> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        actual.sort();
        assert_eq!(vec!["a.rs".to_string()], actual);
        assert_eq!("pub struct A2;\n", fs::read_to_string(dest.join("a.rs")).unwrap());

        let leftovers: usize = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(1, leftovers);
    }

    #[test]
    fn stale_scratch_directory_is_cleared() {
        let tmp: tempfile::TempDir = tempfile::tempdir().unwrap();
        let dest: PathBuf = tmp.path().join("vk");
        let scratch: PathBuf = tmp.path().join(".vk.tmp");
        fs::create_dir(&scratch).unwrap();
        fs::write(scratch.join("junk.rs"), "junk").unwrap();
        publish(&bundle(&[("a.rs", "pub struct A;")]), &dest).unwrap();
        assert!(!dest.join("junk.rs").exists());
        assert!(!scratch.exists());
    }
}
