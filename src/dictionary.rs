//! Bidirectional tag name <-> number table.
//!
//! Built once and then only read. The inverse map is computed at
//! construction so lookups in both directions are O(1).

use cmf_error::{ensure, CmfResult, DictionaryError};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value as JsonValue;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    by_name: IndexMap<String, u64>,
    by_number: FxHashMap<u64, String>,
}

impl Dictionary {
    /// Empty dictionary; every tag is used as a plain number.
    pub fn new() -> Self {
        Self::default()
    }

    /// List form: the name at index `i` maps to `i`.
    ///
    /// A name listed twice keeps its last index.
    pub fn from_names<I, S>(names: I) -> CmfResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (name, i as i128)),
        )
    }

    /// Map form: explicit name -> number pairs. A repeated name keeps its
    /// last number.
    ///
    /// # Errors
    /// - `NegativeValue` for a number below zero
    /// - `ValueOutOfRange` for a number above `u64::MAX`
    /// - `DuplicateValue` if two names share a number
    pub fn from_entries<I, S>(entries: I) -> CmfResult<Self>
    where
        I: IntoIterator<Item = (S, i128)>,
        S: Into<String>,
    {
        let mut by_name = IndexMap::new();
        for (name, number) in entries {
            by_name.insert(name.into(), number);
        }

        let mut validated = IndexMap::with_capacity(by_name.len());
        let mut by_number = FxHashMap::default();
        for (name, number) in by_name {
            ensure!(
                number >= 0,
                DictionaryError::NegativeValue {
                    key: name,
                    value: number,
                }
            );
            let number = u64::try_from(number).map_err(|_| DictionaryError::ValueOutOfRange {
                key: name.clone(),
                value: number,
            })?;
            if let Some(first) = by_number.insert(number, name.clone()) {
                return Err(DictionaryError::DuplicateValue {
                    value: number,
                    first,
                    second: name,
                }
                .into());
            }
            validated.insert(name, number);
        }

        debug!(entries = validated.len(), "Dictionary built");
        Ok(Self {
            by_name: validated,
            by_number,
        })
    }

    /// Parses a JSON array of names or a JSON object of name -> number.
    ///
    /// ```
    /// use cmf::Dictionary;
    ///
    /// let list = Dictionary::from_json(r#"["name", "email"]"#).unwrap();
    /// let map = Dictionary::from_json(r#"{"name": 0, "email": 1}"#).unwrap();
    /// assert_eq!(list.number("email"), map.number("email"));
    /// ```
    pub fn from_json(text: &str) -> CmfResult<Self> {
        let json: JsonValue =
            serde_json::from_str(text).map_err(|e| DictionaryError::InvalidShape {
                reason: e.to_string(),
            })?;

        match json {
            JsonValue::Array(items) => {
                let names = items
                    .into_iter()
                    .map(json_key)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_names(names)
            }
            JsonValue::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let number = json_number(&value).ok_or_else(|| {
                        DictionaryError::NonIntegerValue {
                            key: key.clone(),
                            value: value.to_string(),
                        }
                    })?;
                    entries.push((key, number));
                }
                Self::from_entries(entries)
            }
            other => Err(DictionaryError::InvalidShape {
                reason: format!("got {other}"),
            }
            .into()),
        }
    }

    /// Number for a tag name.
    pub fn number(
        &self,
        name: &str,
    ) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    /// Name for a tag number.
    pub fn name(
        &self,
        number: u64,
    ) -> Option<&str> {
        self.by_number.get(&number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// (name, number) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.by_name.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a str, u64);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, u64)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Integer JSON number, in whichever of `i64`/`u64` holds it.
fn json_number(value: &JsonValue) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

fn json_key(item: JsonValue) -> Result<String, DictionaryError> {
    match item {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => {
            Err(DictionaryError::IntegerKey { key: n.to_string() })
        }
        other => Err(DictionaryError::InvalidShape {
            reason: format!("dictionary names must be strings, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use cmf_error::StatusCode;

    use super::*;

    fn dictionary_error(err: &cmf_error::StackError) -> &DictionaryError {
        err.downcast_ref::<DictionaryError>()
            .expect("expected a DictionaryError")
    }

    #[test]
    fn test_list_form() {
        let dict = Dictionary::from_names(["tag0", "tag1"]).unwrap();
        assert_eq!(dict.number("tag0"), Some(0));
        assert_eq!(dict.number("tag1"), Some(1));
        assert_eq!(dict.name(1), Some("tag1"));
        assert_eq!(dict.name(2), None);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_list_form_repeated_name_keeps_last_index() {
        let dict = Dictionary::from_names(["a", "b", "a"]).unwrap();
        assert_eq!(dict.number("a"), Some(2));
        assert_eq!(dict.number("b"), Some(1));
        assert_eq!(dict.name(0), None);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_map_form() {
        let dict = Dictionary::from_entries([("name", 0), ("email", 40)]).unwrap();
        assert_eq!(dict.number("email"), Some(40));
        assert_eq!(dict.name(40), Some("email"));
        let pairs: Vec<_> = dict.iter().collect();
        assert_eq!(pairs, vec![("name", 0), ("email", 40)]);
    }

    #[test]
    fn test_integer_key_rejected() {
        let err = Dictionary::from_json("[100]").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::TypeError);
        assert!(dictionary_error(&err).is_wrong_kind());
    }

    #[test]
    fn test_numeric_looking_name_is_a_name() {
        let dict = Dictionary::from_names(["100"]).unwrap();
        assert_eq!(dict.number("100"), Some(0));
        assert_eq!(dict.name(0), Some("100"));
    }

    #[test]
    fn test_full_u64_range() {
        let dict = Dictionary::from_json(r#"{"max": 18446744073709551615}"#).unwrap();
        assert_eq!(dict.number("max"), Some(u64::MAX));
        assert_eq!(dict.name(u64::MAX), Some("max"));

        let err = Dictionary::from_entries([("big", i128::from(u64::MAX) + 1)]).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::OutOfRange);
        assert!(matches!(
            dictionary_error(&err),
            DictionaryError::ValueOutOfRange { .. }
        ));
    }

    #[test]
    fn test_from_json_keeps_object_order() {
        let dict = Dictionary::from_json(r#"{"zeta": 0, "alpha": 1, "mid": 7}"#).unwrap();
        let names: Vec<_> = dict.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_negative_value_rejected() {
        let err = Dictionary::from_entries([("a", -1)]).unwrap_err();
        assert_eq!(
            dictionary_error(&err),
            &DictionaryError::NegativeValue {
                key: "a".to_string(),
                value: -1
            }
        );
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let err = Dictionary::from_entries([("tag0", 0), ("tag1", 0)]).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::DuplicateValue);
        assert!(!dictionary_error(&err).is_wrong_kind());
    }

    #[test]
    fn test_from_json() {
        let list = Dictionary::from_json(r#"["tag0", "tag1"]"#).unwrap();
        assert_eq!(list.number("tag1"), Some(1));

        let map = Dictionary::from_json(r#"{"tag0": 5, "tag1": 31}"#).unwrap();
        assert_eq!(map.name(31), Some("tag1"));
    }

    #[test]
    fn test_from_json_wrong_kinds() {
        let err = Dictionary::from_json(r#"{"tag0": "zero"}"#).unwrap_err();
        assert!(matches!(
            dictionary_error(&err),
            DictionaryError::NonIntegerValue { .. }
        ));

        let err = Dictionary::from_json(r#"{"tag0": 1.5}"#).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::TypeError);

        let err = Dictionary::from_json("[1, 2]").unwrap_err();
        assert!(matches!(
            dictionary_error(&err),
            DictionaryError::IntegerKey { .. }
        ));

        let err = Dictionary::from_json("42").unwrap_err();
        assert!(matches!(
            dictionary_error(&err),
            DictionaryError::InvalidShape { .. }
        ));

        assert!(Dictionary::from_json("{not json").is_err());
    }

    #[test]
    fn test_empty() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.number("x"), None);
        assert_eq!((&dict).into_iter().count(), 0);
    }
}
