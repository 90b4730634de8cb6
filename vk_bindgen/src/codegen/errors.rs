//! Error code and subcode catalog.

use std::collections::BTreeMap;
use std::io::Write;

use super::{emit_doc_comment, emit_file_header};
use crate::naming::{disambiguate, error_const_name};
use crate::schema::{ErrorsFile, reference_name};

/// Remediation hints keyed by error code.
const SOLUTIONS: &[(i64, &str)] = &[
    (1, "Try again later."),
    (
        2,
        "You need to switch on the app in Settings (https://vk.com/editapp?id={Your API_ID} or use the TestMode (test_mode=1).",
    ),
    (3, "Check the method name: https://vk.com/dev/methods"),
    (
        4,
        "Check if the signature has been formed correctly: https://vk.com/dev/api_nohttps.",
    ),
    (
        5,
        "Make sure that you use a correct TokenType (https://vk.com/dev/access_token).",
    ),
    (
        6,
        "Decrease the request frequency or use the execute method. More details on frequency limits here: https://vk.com/dev/api_requests.",
    ),
    (
        7,
        "Make sure that your have received required AccessPermission during the authorization (see https://vk.com/dev/permissions). You can do it with the account.getAppPermissions method.",
    ),
    (
        8,
        "Check the request syntax (https://vk.com/dev/api_requests) and used parameters list (it can be found on a method description page).",
    ),
    (
        9,
        "You need to decrease the count of identical requests. For more efficient work you may use execute (https://vk.com/dev/execute) or JSONP (https://vk.com/dev/jsonp).",
    ),
    (10, "Try again later."),
    (
        11,
        "Switch the app off in Settings: https://vk.com/editapp?id={Your API_ID}.",
    ),
    (
        14,
        "Work with this error is explained in detail on https://vk.com/dev/captcha_error.",
    ),
    (
        15,
        "Make sure that you use correct identifiers and the content is available for the user in the full version of the site.",
    ),
    (
        16,
        "To avoid this error check if a user has the 'Use secure connection' option enabled with the account.getInfo method.",
    ),
    (
        17,
        "Make sure that you don't use a token received with https://vk.com/dev/auth_mobile for a request from the server. It's restricted. The validation process is described on https://vk.com/dev/need_validation.",
    ),
    (
        20,
        "If you see this error despite your app has the Standalone type, make sure that you use redirect_uri=https://oauth.vk.com/blank.html. Details here: https://vk.com/dev/auth_mobile.",
    ),
    (
        23,
        "All the methods available now are listed here: https://vk.com/dev/methods.",
    ),
    (
        24,
        "Confirmation process is described on https://vk.com/dev/need_confirmation.",
    ),
    (29, "More details on rate limits here: https://vk.com/dev/data_limits"),
    (
        100,
        "Check the required parameters list and their format on a method description page.",
    ),
    (
        101,
        "Find the app in the administrated list in settings: https://vk.com/apps?act=settings and set the correct API_ID in the request.",
    ),
    (
        113,
        "Make sure that you use a correct id. You can get an id using a screen name with the utils.resolveScreenName method",
    ),
    (
        150,
        "You may get a correct value with the utils.getServerTime method.",
    ),
    (
        200,
        "Make sure you use correct ids (owner_id is always positive for users, negative for communities) and the current user has access to the requested content in the full version of the site.",
    ),
    (
        201,
        "Make sure you use correct ids (owner_id is always positive for users, negative for communities) and the current user has access to the requested content in the full version of the site.",
    ),
    (
        203,
        "Make sure that the current user is a member or admin of the community (for closed and private groups and events).",
    ),
    (
        300,
        "You need to delete the odd objects from the album or use another album.",
    ),
    (
        500,
        "Check the app settings: https://vk.com/editapp?id={Your API_ID}&section=payments",
    ),
];

/// Remediation hint for `code`, if one is known.
#[must_use]
pub fn solution(code: i64) -> Option<&'static str> {
    SOLUTIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

/// One catalog constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub const_name: String,
    pub code: i64,
    pub description: Option<String>,
    /// Constant names of the subcodes this error may carry.
    pub subcodes: Vec<String>,
    pub solution: Option<&'static str>,
    pub global: bool,
}

/// Error and subcode constants, sorted by code then name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCatalog {
    pub subcodes: Vec<CatalogEntry>,
    pub errors: Vec<CatalogEntry>,
}

/// Builds constant names for every entry, resolving collisions the same way
/// field identifiers are resolved.
fn const_names<'a, I: Iterator<Item = &'a String>>(names: I) -> BTreeMap<String, String> {
    let names: Vec<&String> = names.collect();
    let consts: Vec<String> = disambiguate(names.iter().map(|n| error_const_name(n)).collect());
    names.into_iter().cloned().zip(consts).collect()
}

fn const_for(consts: &BTreeMap<String, String>, name: &str) -> String {
    consts.get(name).cloned().unwrap_or_else(|| error_const_name(name))
}

fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.const_name.cmp(&b.const_name)));
}

impl ErrorCatalog {
    #[must_use]
    pub fn from_file(file: &ErrorsFile) -> Self {
        let subcode_consts: BTreeMap<String, String> = const_names(file.definitions.subcodes.keys());
        let error_consts: BTreeMap<String, String> = const_names(file.errors.keys());

        let mut subcodes: Vec<CatalogEntry> = file
            .definitions
            .subcodes
            .iter()
            .map(|(name, schema)| CatalogEntry {
                const_name: const_for(&subcode_consts, name),
                code: schema.subcode,
                description: None,
                subcodes: Vec::new(),
                solution: None,
                global: false,
            })
            .collect();
        sort_entries(&mut subcodes);

        let mut errors: Vec<CatalogEntry> = file
            .errors
            .iter()
            .map(|(name, schema)| CatalogEntry {
                const_name: const_for(&error_consts, name),
                code: schema.code,
                description: Some(schema.description.clone()).filter(|d| !d.trim().is_empty()),
                subcodes: schema
                    .subcodes
                    .iter()
                    .flatten()
                    .map(|r| {
                        const_for(&subcode_consts, reference_name(&r.reference))
                    })
                    .collect(),
                solution: solution(schema.code),
                global: schema.global.unwrap_or(false),
            })
            .collect();
        sort_entries(&mut errors);

        Self { subcodes, errors }
    }
}

/// Emits a complete `error_codes.rs`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn emit_errors<W: Write>(
    writer: &mut W,
    catalog: &ErrorCatalog,
    runtime_path: &str,
) -> std::io::Result<()> {
    emit_file_header(writer, false)?;
    writeln!(writer, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(writer)?;
    writeln!(writer, "use {runtime_path}::ApiError;")?;
    writeln!(writer)?;

    writeln!(writer, "/// Secondary code refining an [`ErrorCode`].")?;
    emit_code_newtype(writer, "Subcode")?;
    writeln!(writer, "impl Subcode {{")?;
    for entry in &catalog.subcodes {
        writeln!(
            writer,
            "    pub const {}: Self = Self({});",
            entry.const_name, entry.code
        )?;
    }
    writeln!(writer, "}}")?;
    writeln!(writer)?;

    writeln!(writer, "/// Code of an API error.")?;
    writeln!(writer, "///")?;
    writeln!(
        writer,
        "/// See <https://dev.vk.com/reference/errors> for the full list."
    )?;
    emit_code_newtype(writer, "ErrorCode")?;
    writeln!(writer, "impl ErrorCode {{")?;
    for entry in &catalog.errors {
        emit_doc_comment(writer, entry.description.as_deref(), "    ")?;
        if !entry.subcodes.is_empty() {
            writeln!(
                writer,
                "    /// May contain one of the listed subcodes: [ {} ].",
                entry.subcodes.join(", ")
            )?;
        }
        if let Some(text) = entry.solution {
            writeln!(writer, "    /// Solution: {text}")?;
        }
        writeln!(writer, "    /// IsGlobal: {}", entry.global)?;
        writeln!(
            writer,
            "    pub const {}: Self = Self({});",
            entry.const_name, entry.code
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "    /// Whether `err` carries this code.")?;
    writeln!(writer, "    #[must_use]")?;
    writeln!(writer, "    pub fn matches(self, err: &ApiError) -> bool {{")?;
    writeln!(writer, "        err.is(self.0)")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "}}")?;
    writeln!(writer)
}

fn emit_code_newtype<W: Write>(writer: &mut W, name: &str) -> std::io::Result<()> {
    writeln!(
        writer,
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]"
    )?;
    writeln!(writer, "#[serde(transparent)]")?;
    writeln!(writer, "pub struct {name}(pub i64);")?;
    writeln!(writer)
}
