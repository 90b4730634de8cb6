//! Schema validation for strict mode.
//!
//! Walks the raw documents (as `serde_json::Value`) and collects every
//! unknown or unsupported construct without stopping at the first one.

use serde_json::{Map, Value};

use crate::classify::is_numeric_key_pattern;
use crate::error::{SchemaValidationError, SchemaValidationIssue, SchemaValidationIssueKind};
use crate::json_pointer::JsonPointer;

/// Keywords a schema node may carry.
const KNOWN_KEYWORDS: &[&str] = &[
    "$ref",
    "title",
    "description",
    "type",
    "properties",
    "patternProperties",
    "additionalProperties",
    "required",
    "enum",
    "enumNames",
    "items",
    "allOf",
    "oneOf",
    "format",
    "default",
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
];

/// Keywords that are valid JSON Schema but have no generated counterpart.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$defs",
    "$id",
    "anyOf",
    "not",
    "const",
    "pattern",
    "examples",
    "uniqueItems",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minProperties",
    "maxProperties",
    "propertyNames",
    "additionalItems",
    "readOnly",
    "writeOnly",
    "deprecated",
];

const SUPPORTED_TYPES: &[&str] = &["string", "boolean", "integer", "number", "object", "array"];

/// Document-level keys that never hold schema nodes.
const METHOD_KEYS: &[&str] = &[
    "name",
    "description",
    "access_token_type",
    "parameters",
    "responses",
    "errors",
    "emptyResponse",
];

/// Validates every document. Returns all collected issues together.
///
/// # Errors
///
/// Returns [`SchemaValidationError`] when at least one issue was found.
pub fn validate_documents(
    objects: &Value,
    responses: &Value,
    methods: &Value,
) -> Result<(), SchemaValidationError> {
    let mut issues: Vec<SchemaValidationIssue> = Vec::new();
    validate_definitions("objects", objects, &mut issues);
    validate_definitions("responses", responses, &mut issues);
    validate_methods(methods, &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError { issues })
    }
}

fn push_issue(
    issues: &mut Vec<SchemaValidationIssue>,
    path: &JsonPointer,
    kind: SchemaValidationIssueKind,
) {
    issues.push(SchemaValidationIssue {
        path: path.to_string(),
        kind,
    });
}

fn validate_definitions(document: &str, value: &Value, issues: &mut Vec<SchemaValidationIssue>) {
    let path: JsonPointer = JsonPointer::root().child(document);
    let Some(obj) = value.as_object() else {
        push_issue(issues, &path, SchemaValidationIssueKind::DocumentNotObject);
        return;
    };
    let Some(definitions) = obj.get("definitions").and_then(Value::as_object) else {
        push_issue(issues, &path, SchemaValidationIssueKind::MissingDefinitions);
        return;
    };
    for (name, node) in definitions {
        validate_node(node, &path.child(name), issues);
    }
}

fn validate_methods(value: &Value, issues: &mut Vec<SchemaValidationIssue>) {
    let path: JsonPointer = JsonPointer::root().child("methods");
    let Some(methods) = value
        .as_object()
        .and_then(|obj| obj.get("methods"))
        .and_then(Value::as_array)
    else {
        push_issue(issues, &path, SchemaValidationIssueKind::DocumentNotObject);
        return;
    };
    for method in methods {
        let Some(obj) = method.as_object() else {
            push_issue(issues, &path, SchemaValidationIssueKind::NodeNotObject);
            continue;
        };
        let name: &str = obj.get("name").and_then(Value::as_str).unwrap_or_default();
        let method_path: JsonPointer = path.child(name);
        for key in obj.keys() {
            if !METHOD_KEYS.contains(&key.as_str()) {
                push_issue(
                    issues,
                    &method_path.child(key),
                    SchemaValidationIssueKind::UnknownKeyword(key.clone()),
                );
            }
        }
        for parameter in obj
            .get("parameters")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let param_name: &str = parameter
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let param_path: JsonPointer = method_path.child("parameters").child(param_name);
            match parameter.as_object() {
                Some(param) => {
                    let mut node: Map<String, Value> = param.clone();
                    node.remove("name");
                    validate_object(&node, &param_path, issues);
                }
                None => push_issue(issues, &param_path, SchemaValidationIssueKind::NodeNotObject),
            }
        }
        for (key, node) in obj
            .get("responses")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
        {
            validate_node(node, &method_path.child("responses").child(key), issues);
        }
    }
}

fn validate_node(value: &Value, path: &JsonPointer, issues: &mut Vec<SchemaValidationIssue>) {
    match value.as_object() {
        Some(obj) => validate_object(obj, path, issues),
        None => push_issue(issues, path, SchemaValidationIssueKind::NodeNotObject),
    }
}

fn validate_object(
    obj: &Map<String, Value>,
    path: &JsonPointer,
    issues: &mut Vec<SchemaValidationIssue>,
) {
    if obj.get("type").and_then(Value::as_str) == Some("array") && !obj.contains_key("items") {
        push_issue(issues, path, SchemaValidationIssueKind::ArrayMissingItems);
    }

    for (key, val) in obj {
        let key_path: JsonPointer = path.child(key);
        if UNSUPPORTED_KEYWORDS.contains(&key.as_str()) {
            push_issue(
                issues,
                &key_path,
                SchemaValidationIssueKind::UnsupportedKeyword(key.clone()),
            );
            continue;
        }
        if !KNOWN_KEYWORDS.contains(&key.as_str()) {
            push_issue(
                issues,
                &key_path,
                SchemaValidationIssueKind::UnknownKeyword(key.clone()),
            );
            continue;
        }
        match key.as_str() {
            "$ref" if !val.is_string() => {
                push_issue(issues, &key_path, SchemaValidationIssueKind::ReferenceNotString);
            }
            "type" => validate_type(val, &key_path, issues),
            "enum" => validate_enum(val, obj.get("enumNames"), &key_path, issues),
            "items" => validate_node(val, &key_path, issues),
            "allOf" | "oneOf" => {
                for (index, member) in val.as_array().into_iter().flatten().enumerate() {
                    validate_node(member, &key_path.index(index), issues);
                }
            }
            "properties" => {
                for (name, node) in val.as_object().into_iter().flatten() {
                    validate_node(node, &key_path.child(name), issues);
                }
            }
            "patternProperties" => {
                for (pattern, node) in val.as_object().into_iter().flatten() {
                    let pattern_path: JsonPointer = key_path.child(pattern);
                    if !is_numeric_key_pattern(pattern).unwrap_or(false) {
                        push_issue(
                            issues,
                            &pattern_path,
                            SchemaValidationIssueKind::UnsupportedPatternKey(pattern.clone()),
                        );
                    }
                    validate_node(node, &pattern_path, issues);
                }
            }
            _ => {}
        }
    }
}

fn validate_type(value: &Value, path: &JsonPointer, issues: &mut Vec<SchemaValidationIssue>) {
    match value {
        Value::String(ty) if !SUPPORTED_TYPES.contains(&ty.as_str()) => {
            push_issue(
                issues,
                path,
                SchemaValidationIssueKind::UnsupportedType(ty.clone()),
            );
        }
        // A list of types collapses to string.
        Value::String(_) | Value::Array(_) => {}
        other => push_issue(
            issues,
            path,
            SchemaValidationIssueKind::UnsupportedType(other.to_string()),
        ),
    }
}

fn validate_enum(
    value: &Value,
    names: Option<&Value>,
    path: &JsonPointer,
    issues: &mut Vec<SchemaValidationIssue>,
) {
    let Some(values) = value.as_array() else {
        push_issue(issues, path, SchemaValidationIssueKind::EnumNotArray);
        return;
    };
    if values.is_empty() {
        push_issue(issues, path, SchemaValidationIssueKind::EnumEmpty);
    }
    if let Some(names) = names.and_then(Value::as_array)
        && names.len() != values.len()
    {
        push_issue(issues, path, SchemaValidationIssueKind::EnumNamesLengthMismatch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(err: &SchemaValidationError) -> Vec<SchemaValidationIssueKind> {
        err.issues.iter().map(|i| i.kind.clone()).collect()
    }

    fn empty() -> Value {
        json!({"definitions": {}})
    }

    fn no_methods() -> Value {
        json!({"methods": []})
    }

    #[test]
    fn valid_documents_pass() {
        let objects: Value = json!({"definitions": {
            "base_bool_int": {"type": "integer", "enum": [0, 1], "enumNames": ["no", "yes"]},
            "users_user": {"type": "object", "required": ["id"], "properties": {
                "id": {"type": "integer", "minimum": 0},
                "counters": {"type": "object", "patternProperties": {"^[0-9]+$": {"$ref": "#/definitions/base_bool_int"}}},
                "tags": {"type": "array", "items": {"type": "string"}, "maxItems": 10}
            }},
            "mixed": {"allOf": [{"$ref": "#/definitions/users_user"}, {"type": "object", "properties": {}}]}
        }});
        let methods: Value = json!({"methods": [{
            "name": "users.get",
            "access_token_type": ["user"],
            "parameters": [{"name": "user_ids", "type": "array", "items": {"type": "string"}}],
            "responses": {"response": {"$ref": "responses.json#/definitions/users_get_response"}},
            "errors": []
        }]});
        assert!(validate_documents(&objects, &empty(), &methods).is_ok());
    }

    #[test]
    fn document_shape_issues() {
        let err: SchemaValidationError =
            validate_documents(&json!([]), &json!({}), &json!({})).unwrap_err();
        let expected: Vec<SchemaValidationIssueKind> = vec![
            SchemaValidationIssueKind::DocumentNotObject,
            SchemaValidationIssueKind::MissingDefinitions,
            SchemaValidationIssueKind::DocumentNotObject,
        ];
        assert_eq!(expected, kinds(&err));
    }

    #[test]
    fn all_issues_collected_with_paths() {
        let objects: Value = json!({"definitions": {
            "a": {"type": "array", "anyOf": [], "x-extra": 1},
            "b": {"type": "null", "enum": [], "enumNames": ["one"]},
            "c": {"type": "object", "patternProperties": {"^[a-z]+$": {"type": "string"}}}
        }});
        let err: SchemaValidationError =
            validate_documents(&objects, &empty(), &no_methods()).unwrap_err();
        let actual: Vec<String> = err.issues.iter().map(ToString::to_string).collect();
        let expected: Vec<String> = vec![
            "/objects/a: array type without items".to_string(),
            "/objects/a/anyOf: unsupported keyword \"anyOf\"".to_string(),
            "/objects/a/x-extra: unknown keyword \"x-extra\"".to_string(),
            "/objects/b/enum: enum must not be empty".to_string(),
            "/objects/b/enum: enumNames length differs from enum length".to_string(),
            "/objects/b/type: unsupported type \"null\"".to_string(),
            "/objects/c/patternProperties/^[a-z]+$: unsupported patternProperties key \"^[a-z]+$\""
                .to_string(),
        ];
        assert_eq!(expected, actual);
    }

    #[test]
    fn method_parameters_and_responses_are_walked() {
        let methods: Value = json!({"methods": [{
            "name": "a.b",
            "parameters": [{"name": "p", "type": "string", "pattern": "x"}],
            "responses": {"response": {"$ref": 5}},
            "deprecated_since": "5.0"
        }]});
        let err: SchemaValidationError =
            validate_documents(&empty(), &empty(), &methods).unwrap_err();
        let actual: Vec<String> = err.issues.iter().map(ToString::to_string).collect();
        let expected: Vec<String> = vec![
            "/methods/a.b/deprecated_since: unknown keyword \"deprecated_since\"".to_string(),
            "/methods/a.b/parameters/p/pattern: unsupported keyword \"pattern\"".to_string(),
            "/methods/a.b/responses/response/$ref: $ref must be a string".to_string(),
        ];
        assert_eq!(expected, actual);
    }

    #[test]
    fn type_lists_are_accepted() {
        let objects: Value = json!({"definitions": {"a": {"type": ["string", "integer"]}}});
        assert!(validate_documents(&objects, &empty(), &no_methods()).is_ok());
    }
}
