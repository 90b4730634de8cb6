//! Raw JSON payload holder for untyped unions.
//!
//! A union without a discriminant is never decoded into one of its members.
//! The payload is kept as compact JSON text and written back verbatim.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawJson(String);

impl RawJson {
    /// Wraps already encoded JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid JSON.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self(value.to_string()))
    }

    /// Encodes `value` and stores the resulting JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::to_value(value)?;
        Ok(Self(value.to_string()))
    }

    /// Decodes the payload as `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for RawJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text: &str = if self.0.is_empty() { "null" } else { &self.0 };
        let raw: Box<RawValue> = RawValue::from_string(text.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

// Goes through `Value` rather than `RawValue` so the holder also works inside
// `#[serde(flatten)]` structs, where the deserializer is buffered.
impl<'de> Deserialize<'de> for RawJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        id: i64,
        payload: RawJson,
    }

    #[test]
    fn payload_survives_round_trip() {
        let json: &str = r#"{"id":7,"payload":{"b":[1,2],"a":"x"}}"#;
        let holder: Holder = serde_json::from_str(json).unwrap();
        assert_eq!(r#"{"a":"x","b":[1,2]}"#, holder.payload.as_str());
        let encoded: String = serde_json::to_string(&holder).unwrap();
        let decoded: Holder = serde_json::from_str(&encoded).unwrap();
        assert_eq!(holder, decoded);
    }

    #[test]
    fn encode_matches_decode_of_same_value() {
        let encoded: RawJson = RawJson::encode(&vec![1.5_f64, -2.0]).unwrap();
        let text: String = serde_json::to_string(&encoded).unwrap();
        let decoded: RawJson = serde_json::from_str(&text).unwrap();
        assert_eq!(encoded, decoded);
        let back: Vec<f64> = decoded.decode().unwrap();
        assert_eq!(vec![1.5, -2.0], back);
    }

    #[test]
    fn works_inside_flatten() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Outer {
            #[serde(flatten)]
            inner: Holder,
            extra: bool,
        }
        let outer: Outer = Outer {
            inner: Holder {
                id: 1,
                payload: RawJson::from_text("[\"a\"]").unwrap(),
            },
            extra: true,
        };
        let text: String = serde_json::to_string(&outer).unwrap();
        let decoded: Outer = serde_json::from_str(&text).unwrap();
        assert_eq!(outer, decoded);
    }

    #[test]
    fn rejects_invalid_text() {
        assert!(RawJson::from_text("{not json").is_err());
    }
}
