//! JSON Pointer (RFC 6901) paths used as stable node identifiers.
//!
//! Segments are `/`-separated, with `~` escaped as `~0` and `/` escaped as `~1`.

use std::fmt;

/// Location of one schema node across all input documents.
///
/// The first segment names the document (`objects`, `responses`, `methods`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonPointer(String);

impl JsonPointer {
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Returns a new pointer with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut path: String = self.0.clone();
        push_segment(&mut path, segment);
        Self(path)
    }

    /// Returns a new pointer with an array index appended.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(&index.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<JsonPointer> for String {
    fn from(pointer: JsonPointer) -> Self {
        pointer.to_string()
    }
}

/// Appends a segment to a path, applying RFC 6901 escaping.
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}
