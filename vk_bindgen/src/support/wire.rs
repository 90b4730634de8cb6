//! Form-value encoding for method requests.
//!
//! Every emitted `fill_in` goes through [`FormValues`], so the rendering rules
//! for scalars, lists, and JSON-hinted fields live in one place.

use std::collections::BTreeMap;

use serde::Serialize;

use super::caller::EncodeError;
use super::options::ApiOption;

/// A scalar that renders to a single wire value.
pub trait WireScalar {
    fn render(&self) -> String;
}

impl WireScalar for str {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl WireScalar for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl WireScalar for i64 {
    fn render(&self) -> String {
        self.to_string()
    }
}

/// Floats always carry exactly six fractional digits.
impl WireScalar for f64 {
    fn render(&self) -> String {
        format!("{self:.6}")
    }
}

impl WireScalar for bool {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl<T: WireScalar + ?Sized> WireScalar for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}

/// Flat key/value pairs sent as a form-encoded request body.
///
/// Setting a key that is already present overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to the rendering of one scalar.
    pub fn set<V: WireScalar + ?Sized>(&mut self, key: &str, value: &V) {
        self.values.insert(key.to_string(), value.render());
    }

    /// Sets `key` to the comma-joined renderings of `items`.
    ///
    /// The key is set even when `items` is empty.
    pub fn set_list<I>(&mut self, key: &str, items: I)
    where
        I: IntoIterator,
        I::Item: WireScalar,
    {
        let rendered: Vec<String> = items.into_iter().map(|item| item.render()).collect();
        self.values.insert(key.to_string(), rendered.join(","));
    }

    /// Sets `key` to the JSON encoding of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if `value` cannot be serialized; `self` is left
    /// unchanged in that case.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), EncodeError> {
        let encoded: String = serde_json::to_string(value).map_err(|source| EncodeError {
            key: key.to_string(),
            source,
        })?;
        self.values.insert(key.to_string(), encoded);
        Ok(())
    }

    /// Applies cross-cutting options in order. Later options win.
    pub fn apply_options(&mut self, options: &[ApiOption]) {
        for option in options {
            self.values
                .insert(option.name().to_string(), option.value().to_string());
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates pairs in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
