use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed field values collected for one dispatch attempt, in field
/// declaration order.
///
/// Recomputed on every dispatch and never persisted. Keys consumed as path
/// parameters are removed with [`CollectedValues::take`] so they are not
/// serialized a second time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedValues(IndexMap<String, Value>);

impl CollectedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Removes a value while keeping the remaining entries in order.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl FromIterator<(String, Value)> for CollectedValues {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CollectedValues {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Whether a value counts as "not provided" for query-string placement.
pub fn is_blank_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn take_preserves_order_of_remaining_entries() {
        let mut values: CollectedValues = [
            ("player_id".to_string(), json!("76561198123456789")),
            ("message".to_string(), json!("hi")),
            ("reason".to_string(), json!("afk")),
        ]
        .into_iter()
        .collect();

        assert_eq!(values.take("player_id"), Some(json!("76561198123456789")));
        let keys: Vec<&String> = values.keys().collect();
        assert_eq!(keys, vec!["message", "reason"]);
        assert_eq!(serde_json::to_string(&values).expect("serialize"), r#"{"message":"hi","reason":"afk"}"#);
    }

    #[test]
    fn blank_values_are_null_or_empty_strings() {
        assert!(is_blank_value(&Value::Null));
        assert!(is_blank_value(&json!("")));
        assert!(!is_blank_value(&json!(0)));
        assert!(!is_blank_value(&json!(false)));
        assert!(!is_blank_value(&json!(" ")));
    }
}
