//! Schema intake: one shape discriminator per node.
//!
//! Precedence, first match wins: `$ref`, `items`, `enum`, `allOf`, `oneOf`,
//! `properties`, `patternProperties`, then the primitive `type`.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ClassifyErrorKind;
use crate::schema::{DefaultKeyword, RequiredKeyword, SchemaNode, TypeKeyword, reference_name};

/// Intrinsic scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Bool,
}

impl Primitive {
    /// Maps a schema type name. `object`, `array` and unknown names are not
    /// primitives.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Float),
            "boolean" => Some(Self::Bool),
            _ => None,
        }
    }

    #[must_use]
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_type())
    }
}

/// Scalar limits carried to documentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Limits {
    pub minimum: Option<serde_json::Number>,
    pub maximum: Option<serde_json::Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub format: Option<String>,
    pub default: Option<serde_json::Value>,
}

impl Limits {
    fn from_node(node: &SchemaNode) -> Self {
        Self {
            minimum: node.minimum.clone(),
            maximum: node.maximum.clone(),
            min_length: node.min_length,
            max_length: node.max_length,
            format: node.format.clone(),
            default: match &node.default {
                DefaultKeyword::Present(v) => Some(v.clone()),
                DefaultKeyword::Absent => None,
            },
        }
    }

    /// Fills every unset field from `outer`. Set fields are never overwritten.
    pub fn fill_unset_from(&mut self, outer: &Self) {
        if self.minimum.is_none() {
            self.minimum.clone_from(&outer.minimum);
        }
        if self.maximum.is_none() {
            self.maximum.clone_from(&outer.maximum);
        }
        if self.min_length.is_none() {
            self.min_length = outer.min_length;
        }
        if self.max_length.is_none() {
            self.max_length = outer.max_length;
        }
        if self.format.is_none() {
            self.format.clone_from(&outer.format);
        }
        if self.default.is_none() {
            self.default.clone_from(&outer.default);
        }
    }

    /// True when the value is sent as a JSON document.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }

    /// Documentation lines, one per set limit.
    #[must_use]
    pub fn doc_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        if let Some(default) = &self.default {
            lines.push(format!("Default: {default}"));
        }
        if let Some(format) = &self.format {
            lines.push(format!("Format: {format}"));
        }
        if let Some(minimum) = &self.minimum {
            lines.push(format!("Minimum: {minimum}"));
        }
        if let Some(maximum) = &self.maximum {
            lines.push(format!("Maximum: {maximum}"));
        }
        if let Some(min_length) = self.min_length {
            lines.push(format!("MinLength: {min_length}"));
        }
        if let Some(max_length) = self.max_length {
            lines.push(format!("MaxLength: {max_length}"));
        }
        lines
    }
}

/// Item-count bounds of one array level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemBounds {
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl ItemBounds {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_items.is_none() && self.max_items.is_none()
    }
}

/// Shape selected for a node.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Definition name after the last `/` of the `$ref`.
    Reference(&'a str),
    Enum {
        values: &'a [serde_json::Value],
        names: Option<&'a [String]>,
    },
    AllOf(&'a [SchemaNode]),
    OneOf(&'a [SchemaNode]),
    Properties {
        properties: &'a BTreeMap<String, SchemaNode>,
        required: &'a [String],
    },
    PatternProperties(&'a BTreeMap<String, SchemaNode>),
    Primitive(Primitive),
}

/// A node with its array wrappers peeled off.
#[derive(Debug, Clone)]
pub struct IntakeNode<'a> {
    /// Number of `items` wrappers unwrapped.
    pub depth: usize,
    pub description: Option<String>,
    /// The node's own `required` flag, if it has one.
    pub required: Option<bool>,
    pub limits: Limits,
    /// Item-count bounds per array level, outermost first. Has `depth` entries.
    pub array_bounds: Vec<ItemBounds>,
    pub shape: Shape<'a>,
}

impl IntakeNode<'_> {
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Normalize description: trim and treat empty/whitespace as None.
fn normalize_description(s: Option<&String>) -> Option<String> {
    s.and_then(|t| {
        let trimmed: &str = t.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn required_flag(node: &SchemaNode) -> Option<bool> {
    match &node.required {
        Some(RequiredKeyword::Flag(flag)) => Some(*flag),
        _ => None,
    }
}

/// Classifies `node` into exactly one shape.
///
/// # Errors
///
/// Returns [`ClassifyErrorKind::MissingShape`] when no discriminator applies:
/// no `type`, `type: "object"` without properties, `type: "array"` without
/// `items`, or an unknown type name.
pub fn intake(node: &SchemaNode) -> Result<IntakeNode<'_>, ClassifyErrorKind> {
    let mut current: &SchemaNode = node;
    let mut depth: usize = 0;
    let mut description: Option<String> = normalize_description(node.description.as_ref());
    let required: Option<bool> = required_flag(node);
    let mut limits: Limits = Limits::from_node(node);
    let mut array_bounds: Vec<ItemBounds> = Vec::new();

    while current.reference.is_none() {
        let Some(inner) = current.items.as_deref() else {
            break;
        };
        array_bounds.push(ItemBounds {
            min_items: current.min_items,
            max_items: current.max_items,
        });
        depth += 1;
        let mut inner_limits: Limits = Limits::from_node(inner);
        inner_limits.fill_unset_from(&limits);
        limits = inner_limits;
        if description.is_none() {
            description = normalize_description(inner.description.as_ref());
        }
        current = inner;
    }

    let shape: Shape<'_> = select_shape(current)?;
    Ok(IntakeNode {
        depth,
        description,
        required,
        limits,
        array_bounds,
        shape,
    })
}

fn select_shape(node: &SchemaNode) -> Result<Shape<'_>, ClassifyErrorKind> {
    if let Some(reference) = &node.reference {
        return Ok(Shape::Reference(reference_name(reference)));
    }
    if let Some(values) = &node.r#enum {
        return Ok(Shape::Enum {
            values,
            names: node.enum_names.as_deref(),
        });
    }
    if let Some(members) = &node.all_of {
        return Ok(Shape::AllOf(members));
    }
    if let Some(members) = &node.one_of {
        return Ok(Shape::OneOf(members));
    }
    if let Some(properties) = &node.properties {
        let required: &[String] = match &node.required {
            Some(RequiredKeyword::Names(names)) => names,
            _ => &[],
        };
        return Ok(Shape::Properties {
            properties,
            required,
        });
    }
    if let Some(patterns) = &node.pattern_properties {
        return Ok(Shape::PatternProperties(patterns));
    }
    match &node.r#type {
        Some(TypeKeyword::Many(_)) => Ok(Shape::Primitive(Primitive::String)),
        Some(TypeKeyword::Single(name)) => {
            Primitive::from_type_name(name).map_or(Err(ClassifyErrorKind::MissingShape), |p| {
                Ok(Shape::Primitive(p))
            })
        }
        None => Err(ClassifyErrorKind::MissingShape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SchemaNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reference_wins_over_everything() {
        let node: SchemaNode =
            parse(r##"{"$ref":"objects.json#/definitions/base_bool_int","type":"integer","enum":[0,1]}"##);
        let actual: IntakeNode<'_> = intake(&node).unwrap();
        assert!(matches!(actual.shape, Shape::Reference("base_bool_int")));
        assert_eq!(0, actual.depth);
    }

    #[test]
    fn items_increment_depth() {
        let node: SchemaNode = parse(r#"{"type":"array","items":{"type":"array","items":{"type":"integer"}}}"#);
        let actual: IntakeNode<'_> = intake(&node).unwrap();
        assert_eq!(2, actual.depth);
        assert!(matches!(actual.shape, Shape::Primitive(Primitive::Integer)));
    }

    #[test]
    fn enum_wins_over_properties() {
        let node: SchemaNode = parse(r#"{"type":"string","enum":["a","b"],"properties":{"x":{"type":"string"}}}"#);
        assert!(matches!(intake(&node).unwrap().shape, Shape::Enum { .. }));
    }

    #[test]
    fn all_of_wins_over_one_of() {
        let node: SchemaNode = parse(r#"{"allOf":[{"type":"string"}],"oneOf":[{"type":"string"}]}"#);
        assert!(matches!(intake(&node).unwrap().shape, Shape::AllOf(_)));
    }

    #[test]
    fn outer_limits_fill_only_unset_inner_fields() {
        let node: SchemaNode = parse(
            r#"{"type":"array","maximum":10,"minimum":1,"items":{"type":"integer","minimum":5}}"#,
        );
        let actual: IntakeNode<'_> = intake(&node).unwrap();
        assert_eq!(Some(serde_json::Number::from(5)), actual.limits.minimum);
        assert_eq!(Some(serde_json::Number::from(10)), actual.limits.maximum);
    }

    #[test]
    fn item_bounds_stay_with_their_level() {
        let node: SchemaNode = parse(
            r##"{"type":"array","maxItems":5,"items":{"type":"array","minItems":1,"items":{"$ref":"#/definitions/base_sex"}}}"##,
        );
        let actual: IntakeNode<'_> = intake(&node).unwrap();
        assert_eq!(2, actual.depth);
        let expected: Vec<ItemBounds> = vec![
            ItemBounds {
                min_items: None,
                max_items: Some(5),
            },
            ItemBounds {
                min_items: Some(1),
                max_items: None,
            },
        ];
        assert_eq!(expected, actual.array_bounds);
        assert!(matches!(actual.shape, Shape::Reference("base_sex")));
    }

    #[test]
    fn wrapper_description_and_required_carry_inward() {
        let node: SchemaNode = parse(
            r#"{"type":"array","description":" User IDs ","required":true,"items":{"type":"integer","description":"inner"}}"#,
        );
        let actual: IntakeNode<'_> = intake(&node).unwrap();
        assert_eq!(Some("User IDs".to_string()), actual.description);
        assert!(actual.is_required());
    }

    #[test]
    fn type_list_collapses_to_string() {
        let node: SchemaNode = parse(r#"{"type":["integer","string"]}"#);
        assert!(matches!(intake(&node).unwrap().shape, Shape::Primitive(Primitive::String)));
    }

    #[test]
    fn number_is_float() {
        let node: SchemaNode = parse(r#"{"type":"number"}"#);
        assert!(matches!(intake(&node).unwrap().shape, Shape::Primitive(Primitive::Float)));
    }

    #[test]
    fn object_without_properties_is_missing_shape() {
        let node: SchemaNode = parse(r#"{"type":"object"}"#);
        assert_eq!(ClassifyErrorKind::MissingShape, intake(&node).unwrap_err());
    }

    #[test]
    fn no_type_is_missing_shape() {
        let node: SchemaNode = parse(r#"{"description":"nothing"}"#);
        assert_eq!(ClassifyErrorKind::MissingShape, intake(&node).unwrap_err());
    }

    #[test]
    fn required_names_reach_properties_shape() {
        let node: SchemaNode = parse(r#"{"type":"object","required":["id"],"properties":{"id":{"type":"integer"}}}"#);
        let actual: IntakeNode<'_> = intake(&node).unwrap();
        match actual.shape {
            Shape::Properties { required, .. } => {
                assert_eq!(vec!["id".to_string()], required.to_vec());
            }
            other => panic!("unexpected shape {other:?}"),
        }
        assert_eq!(None, actual.required);
    }

    #[test]
    fn limit_doc_lines() {
        let limits: Limits = Limits {
            minimum: Some(serde_json::Number::from(0)),
            max_length: Some(100),
            format: Some("json".to_string()),
            ..Limits::default()
        };
        let expected: Vec<String> = vec![
            "Format: json".to_string(),
            "Minimum: 0".to_string(),
            "MaxLength: 100".to_string(),
        ];
        assert_eq!(expected, limits.doc_lines());
        assert!(limits.is_json());
    }
}
