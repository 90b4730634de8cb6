//! Generate typed Rust bindings and round-trip fixtures from the VK API JSON
//! schema.
//!
//! [`generate`] turns a [`SchemaSet`] into a [`Bundle`] of formatted Rust
//! files; [`generate_to_dir`] reads the schema directory and publishes the
//! bundle. The [`support`] module is the runtime the emitted code links
//! against.

pub mod classify;
pub mod codegen;
pub mod error;
pub mod intake;
pub mod json_pointer;
pub mod naming;
pub mod output;
pub mod refs;
pub mod schema;
pub mod settings;
pub mod support;
pub mod validate;
pub mod variants;

pub use error::{BindgenError, ClassifyErrorKind, SchemaValidationError, SchemaValidationIssue};
pub use output::Bundle;
pub use settings::GenerateSettings;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{ClassifiedNode, Classifier, DefinitionSet, Registry};
use crate::codegen::errors::{ErrorCatalog, emit_errors};
use crate::codegen::fixtures::emit_fixtures;
use crate::codegen::methods::{MethodsModel, build_methods, emit_methods, emit_methods_tests};
use crate::codegen::objects::{Definition, Item, collect_items, emit_objects};
use crate::codegen::GENERATED_BANNER;
use crate::codegen::version::emit_version;
use crate::json_pointer::JsonPointer;
use crate::naming::NameArena;
use crate::schema::{DefinitionsFile, ErrorsFile, MethodsFile, PackageFile, SchemaNode};

/// Names the emitted modules import; no generated type may take them.
const RESERVED_NAMES: &[&str] = &[
    "ApiError",
    "ApiOption",
    "BTreeMap",
    "Box",
    "Caller",
    "Context",
    "Deserialize",
    "EncodeError",
    "ErrorCode",
    "FormValues",
    "MethodError",
    "Option",
    "RandomFill",
    "RawJson",
    "Result",
    "Rng",
    "Serialize",
    "String",
    "Subcode",
    "Vec",
];

/// Text of the five schema documents.
#[derive(Debug, Clone, Copy)]
pub struct SchemaSources<'a> {
    pub objects: &'a str,
    pub responses: &'a str,
    pub methods: &'a str,
    pub errors: &'a str,
    pub package: &'a str,
}

/// Parsed schema documents, read once per run.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    pub objects: DefinitionsFile,
    pub responses: DefinitionsFile,
    pub methods: MethodsFile,
    pub errors: ErrorsFile,
    pub package: PackageFile,
    raw_objects: Value,
    raw_responses: Value,
    raw_methods: Value,
}

fn parse_document<T: DeserializeOwned>(
    document: &str,
    text: &str,
) -> Result<(Value, T), BindgenError> {
    let located = |source: serde_json::Error| BindgenError::DocumentError {
        document: document.to_string(),
        source,
    };
    let value: Value = serde_json::from_str(text).map_err(located)?;
    let typed: T = T::deserialize(&value).map_err(located)?;
    Ok((value, typed))
}

impl SchemaSet {
    /// Parses the five documents.
    ///
    /// # Errors
    ///
    /// Returns [`BindgenError::DocumentError`] naming the first document that
    /// is not valid JSON or does not have the expected layout.
    pub fn from_sources(sources: &SchemaSources<'_>) -> Result<Self, BindgenError> {
        let (raw_objects, objects) = parse_document("objects.json", sources.objects)?;
        let (raw_responses, responses) = parse_document("responses.json", sources.responses)?;
        let (raw_methods, methods) = parse_document("methods.json", sources.methods)?;
        let (_, errors) = parse_document("errors.json", sources.errors)?;
        let (_, package) = parse_document("package.json", sources.package)?;
        Ok(Self {
            objects,
            responses,
            methods,
            errors,
            package,
            raw_objects,
            raw_responses,
            raw_methods,
        })
    }

    /// Reads `objects.json`, `responses.json`, `methods.json`, `errors.json`
    /// and `package.json` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for a missing document, or a document error.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, BindgenError> {
        let dir: &Path = dir.as_ref();
        let read = |name: &str| std::fs::read_to_string(dir.join(name));
        let objects: String = read("objects.json")?;
        let responses: String = read("responses.json")?;
        let methods: String = read("methods.json")?;
        let errors: String = read("errors.json")?;
        let package: String = read("package.json")?;
        info!(dir = %dir.display(), "read schema documents");
        Self::from_sources(&SchemaSources {
            objects: &objects,
            responses: &responses,
            methods: &methods,
            errors: &errors,
            package: &package,
        })
    }
}

fn classify_document(
    classifier: &mut Classifier<'_>,
    document: &'static str,
    definitions: &std::collections::BTreeMap<String, SchemaNode>,
) -> Result<Vec<Definition>, BindgenError> {
    let mut classified: Vec<Definition> = Vec::with_capacity(definitions.len());
    for (name, node) in definitions {
        let type_name: String = classifier
            .table()
            .get(name)
            .map_err(|kind| {
                BindgenError::classify(JsonPointer::root().child(document).child(name), kind)
            })?
            .type_name
            .clone();
        let node: ClassifiedNode = classifier.classify_definition(document, name, node)?;
        classified.push(Definition { type_name, node });
    }
    Ok(classified)
}

fn emit_into<F>(bundle: &mut Bundle, file_name: &str, emit: F) -> Result<(), BindgenError>
where
    F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
{
    let mut out: Vec<u8> = Vec::new();
    emit(&mut out)?;
    let source: String = String::from_utf8(out)
        .map_err(|e| BindgenError::GenericError(format!("{file_name}: {e}")))?;
    bundle.insert(file_name, &source)?;
    debug!(file = file_name, bytes = source.len(), "emitted");
    Ok(())
}

/// The `mod.rs` tying the bundle together.
fn module_source(emit_tests: bool) -> String {
    let mut source: String = format!("{GENERATED_BANNER}\n\n");
    for module in ["error_codes", "methods", "objects", "responses", "version"] {
        source.push_str(&format!("pub mod {module};\n"));
    }
    source.push_str("\npub use objects::*;\npub use responses::*;\n");
    if emit_tests {
        for module in ["methods_test", "objects_test", "responses_test"] {
            source.push_str(&format!("\n#[cfg(test)]\nmod {module};\n"));
        }
    }
    source
}

/// Runs the whole pipeline over one schema snapshot.
///
/// # Errors
///
/// Any classification failure, strict-mode validation issue, or emitted file
/// that does not parse aborts the run; no partial bundle is returned.
pub fn generate(schemas: &SchemaSet, settings: &GenerateSettings) -> Result<Bundle, BindgenError> {
    if settings.deny_invalid_unknown_json_schema {
        validate::validate_documents(
            &schemas.raw_objects,
            &schemas.raw_responses,
            &schemas.raw_methods,
        )?;
        debug!("strict validation passed");
    }

    let mut arena: NameArena = NameArena::new();
    for name in RESERVED_NAMES {
        arena.claim(name);
    }
    let sets: [DefinitionSet<'_>; 2] = [
        DefinitionSet {
            document: "objects",
            definitions: &schemas.objects.definitions,
        },
        DefinitionSet {
            document: "responses",
            definitions: &schemas.responses.definitions,
        },
    ];
    let registry: Registry = Registry::register(&sets, &mut arena)?;
    info!(definitions = registry.table.len(), "registered definitions");

    let mut classifier: Classifier<'_> =
        Classifier::new(&registry, arena, settings.deny_merged_collisions);
    let objects: Vec<Definition> =
        classify_document(&mut classifier, "objects", &schemas.objects.definitions)?;
    let responses: Vec<Definition> =
        classify_document(&mut classifier, "responses", &schemas.responses.definitions)?;
    let methods: MethodsModel = build_methods(&mut classifier, &schemas.methods)?;
    info!(
        objects = objects.len(),
        responses = responses.len(),
        requests = methods.requests.len(),
        bindings = methods.bindings.len(),
        "classified schema"
    );
    let catalog: ErrorCatalog = ErrorCatalog::from_file(&schemas.errors);

    let runtime: &str = settings.runtime_path.as_str();
    let object_items: std::collections::BTreeMap<String, Item<'_>> = collect_items(&objects);
    let response_items: std::collections::BTreeMap<String, Item<'_>> = collect_items(&responses);

    let mut bundle: Bundle = Bundle::new();
    emit_into(&mut bundle, output::ROOT_MODULE, |w| {
        std::io::Write::write_all(w, module_source(settings.emit_tests).as_bytes())
    })?;
    emit_into(&mut bundle, "version.rs", |w| {
        emit_version(w, &schemas.package.version)
    })?;
    emit_into(&mut bundle, "error_codes.rs", |w| emit_errors(w, &catalog, runtime))?;
    emit_into(&mut bundle, "objects.rs", |w| emit_objects(w, &object_items, runtime))?;
    emit_into(&mut bundle, "responses.rs", |w| {
        emit_objects(w, &response_items, runtime)
    })?;
    emit_into(&mut bundle, "methods.rs", |w| emit_methods(w, &methods, runtime))?;
    if settings.emit_tests {
        emit_into(&mut bundle, "objects_test.rs", |w| {
            emit_fixtures(w, &object_items, runtime)
        })?;
        emit_into(&mut bundle, "responses_test.rs", |w| {
            emit_fixtures(w, &response_items, runtime)
        })?;
        emit_into(&mut bundle, "methods_test.rs", |w| {
            emit_methods_tests(w, &methods, runtime)
        })?;
    }
    info!(files = bundle.len(), "generated bundle");
    Ok(bundle)
}

/// Reads the schema from `schema_dir`, generates, and publishes the bundle
/// into `out_dir`.
///
/// # Errors
///
/// See [`SchemaSet::from_dir`], [`generate`] and [`output::publish`].
pub fn generate_to_dir(
    schema_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<Bundle, BindgenError> {
    let schemas: SchemaSet = SchemaSet::from_dir(schema_dir)?;
    let bundle: Bundle = generate(&schemas, settings)?;
    output::publish(&bundle, out_dir.as_ref())?;
    Ok(bundle)
}
