use std::fmt;

use thiserror::Error;

/// Error type for binding generation.
///
/// Every variant is fatal: generation is an offline batch step and a run
/// either produces a complete bundle or nothing.
#[derive(Debug, Error)]
pub enum BindgenError {
    /// Generic error with a message.
    #[error("{0}")]
    GenericError(String),

    /// I/O error (e.g., reading a schema document).
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// JSON parsing error outside of a named document.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// A schema document could not be parsed.
    #[error("failed to parse {document}: {source}")]
    DocumentError {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    /// A schema node could not be classified or emitted.
    #[error("{path}: {kind}")]
    Classify { path: String, kind: ClassifyErrorKind },

    /// Strict validation found unsupported or unknown constructs.
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),

    /// An emitted file does not parse as Rust.
    #[error("generated {file} is not valid Rust: {message}")]
    InvalidOutput { file: String, message: String },

    /// Writing the output bundle failed.
    #[error("failed to write '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BindgenError {
    pub(crate) fn classify(path: impl Into<String>, kind: ClassifyErrorKind) -> Self {
        Self::Classify {
            path: path.into(),
            kind,
        }
    }
}

impl From<&str> for BindgenError {
    fn from(message: &str) -> Self {
        Self::GenericError(message.to_string())
    }
}

impl From<String> for BindgenError {
    fn from(message: String) -> Self {
        Self::GenericError(message)
    }
}

/// Why a schema node was rejected during classification or emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyErrorKind {
    /// Node has no shape discriminator and no usable `type`.
    MissingShape,
    /// `patternProperties` key other than the numeric-key pattern.
    UnsupportedPattern(String),
    /// `patternProperties` key that is not a valid regular expression.
    InvalidPattern { pattern: String, message: String },
    /// `patternProperties` value without a `$ref`.
    KeyedMapWithoutReference,
    /// `$ref` naming a definition that does not exist.
    UnknownReference(String),
    /// The same definition name registered twice.
    DuplicateDefinition(String),
    /// Alias chain that loops back on itself.
    AliasCycle(String),
    /// Reference that does not resolve to a primitive (e.g. a struct).
    NotScalar(String),
    /// Two merged sub-schemas declare the same field.
    MergedCollision(String),
    /// `oneOf` member that is neither a reference nor a primitive.
    UnsupportedUnionMember,
    /// `allOf` member that is neither a reference nor an object.
    UnsupportedMergedMember,
    /// Method parameter shape that cannot be form-encoded.
    UnsupportedParameter(String),
    /// `enum` with no literals.
    EmptyEnum,
    /// `enum` literal that is not a string, integer, or boolean.
    InvalidEnumLiteral(String),
    /// A paired response key is missing its partner.
    MismatchedResponses(String),
    /// A response entry without a `$ref`.
    ResponseWithoutReference(String),
}

impl fmt::Display for ClassifyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingShape => write!(f, "node has no supported shape"),
            Self::UnsupportedPattern(pattern) => {
                write!(f, "unsupported patternProperties key {pattern:?}")
            }
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid patternProperties key {pattern:?}: {message}")
            }
            Self::KeyedMapWithoutReference => {
                write!(f, "patternProperties value must be a $ref")
            }
            Self::UnknownReference(name) => write!(f, "unknown reference {name:?}"),
            Self::DuplicateDefinition(name) => write!(f, "definition {name:?} registered twice"),
            Self::AliasCycle(name) => write!(f, "alias chain through {name:?} never terminates"),
            Self::NotScalar(name) => write!(f, "{name:?} does not resolve to a primitive type"),
            Self::MergedCollision(name) => {
                write!(f, "field {name:?} is declared by more than one allOf member")
            }
            Self::UnsupportedUnionMember => {
                write!(f, "oneOf members must be references or primitives")
            }
            Self::UnsupportedMergedMember => {
                write!(f, "allOf members must be references or objects")
            }
            Self::UnsupportedParameter(reason) => write!(f, "unsupported parameter: {reason}"),
            Self::EmptyEnum => write!(f, "enum declares no values"),
            Self::InvalidEnumLiteral(literal) => write!(f, "unsupported enum literal {literal}"),
            Self::MismatchedResponses(key) => write!(f, "response {key:?} has no partner"),
            Self::ResponseWithoutReference(key) => write!(f, "response {key:?} must be a $ref"),
        }
    }
}

/// Validation failure: all issues found in the schema documents.
#[derive(Debug, Error)]
pub struct SchemaValidationError {
    pub issues: Vec<SchemaValidationIssue>,
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema validation failed with {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

/// One invalid or unsupported construct, located by JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationIssue {
    pub path: String,
    pub kind: SchemaValidationIssueKind,
}

impl fmt::Display for SchemaValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: &str = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaValidationIssueKind {
    DocumentNotObject,
    MissingDefinitions,
    NodeNotObject,
    UnknownKeyword(String),
    UnsupportedKeyword(String),
    UnsupportedType(String),
    ArrayMissingItems,
    UnsupportedPatternKey(String),
    EnumNotArray,
    EnumEmpty,
    EnumNamesLengthMismatch,
    ReferenceNotString,
}

impl fmt::Display for SchemaValidationIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentNotObject => write!(f, "document root must be an object"),
            Self::MissingDefinitions => write!(f, "document has no definitions"),
            Self::NodeNotObject => write!(f, "schema node must be an object"),
            Self::UnknownKeyword(key) => write!(f, "unknown keyword {key:?}"),
            Self::UnsupportedKeyword(key) => write!(f, "unsupported keyword {key:?}"),
            Self::UnsupportedType(ty) => write!(f, "unsupported type {ty:?}"),
            Self::ArrayMissingItems => write!(f, "array type without items"),
            Self::UnsupportedPatternKey(key) => {
                write!(f, "unsupported patternProperties key {key:?}")
            }
            Self::EnumNotArray => write!(f, "enum must be an array"),
            Self::EnumEmpty => write!(f, "enum must not be empty"),
            Self::EnumNamesLengthMismatch => {
                write!(f, "enumNames length differs from enum length")
            }
            Self::ReferenceNotString => write!(f, "$ref must be a string"),
        }
    }
}
