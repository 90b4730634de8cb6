//! Serde model of the API description documents.
//!
//! Only the keywords the generator reads are modeled; unknown keys are
//! ignored here and reported by strict validation instead.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Wraps the `default` keyword to preserve `null`.
/// Serde deserializes `Option<Value>` with JSON null as `None`; we need to
/// distinguish absent key from `"default": null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DefaultKeyword {
    #[default]
    Absent,
    Present(serde_json::Value),
}

impl<'de> Deserialize<'de> for DefaultKeyword {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
        Ok(DefaultKeyword::Present(v))
    }
}

/// `type` is either one name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    Single(String),
    Many(Vec<String>),
}

/// `required` is a flag on properties and parameters, and a list of property
/// names on objects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RequiredKeyword {
    Flag(bool),
    Names(Vec<String>),
}

/// One node of the API description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    #[serde(default, rename = "type")]
    pub r#type: Option<TypeKeyword>,

    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: Option<RequiredKeyword>,

    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,

    #[serde(default)]
    pub r#enum: Option<Vec<serde_json::Value>>,

    #[serde(default, rename = "enumNames")]
    pub enum_names: Option<Vec<String>>,

    #[serde(default, rename = "allOf")]
    pub all_of: Option<Vec<SchemaNode>>,

    #[serde(default, rename = "oneOf")]
    pub one_of: Option<Vec<SchemaNode>>,

    #[serde(default)]
    pub properties: Option<BTreeMap<String, SchemaNode>>,

    #[serde(default, rename = "patternProperties")]
    pub pattern_properties: Option<BTreeMap<String, SchemaNode>>,

    #[serde(default)]
    pub minimum: Option<serde_json::Number>,

    #[serde(default)]
    pub maximum: Option<serde_json::Number>,

    #[serde(default, rename = "minLength")]
    pub min_length: Option<u64>,

    #[serde(default, rename = "maxLength")]
    pub max_length: Option<u64>,

    #[serde(default, rename = "minItems")]
    pub min_items: Option<u64>,

    #[serde(default, rename = "maxItems")]
    pub max_items: Option<u64>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub default: DefaultKeyword,
}

/// `objects.json` and `responses.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionsFile {
    #[serde(default)]
    pub definitions: BTreeMap<String, SchemaNode>,
}

/// A `{"$ref": "..."}` pointer to another document's definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// A named method parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(flatten)]
    pub node: SchemaNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodSchema {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub access_token_type: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
    #[serde(default)]
    pub responses: BTreeMap<String, SchemaNode>,
    #[serde(default)]
    pub errors: Vec<Reference>,
}

/// `methods.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MethodsFile {
    #[serde(default)]
    pub methods: Vec<MethodSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubcodeSchema {
    pub subcode: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorSchema {
    pub code: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub global: Option<bool>,
    #[serde(default)]
    pub subcodes: Option<Vec<Reference>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDefinitions {
    #[serde(default)]
    pub subcodes: BTreeMap<String, SubcodeSchema>,
}

/// `errors.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorsFile {
    #[serde(default)]
    pub definitions: ErrorDefinitions,
    #[serde(default)]
    pub errors: BTreeMap<String, ErrorSchema>,
}

/// `package.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageFile {
    pub version: String,
}

/// Definition name a reference points at: the text after the last `/`.
#[must_use]
pub fn reference_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
