//! Field value collection.
//!
//! Reads every field of a command from a [`ValueSource`] and coerces it into
//! a typed JSON value:
//!
//! - checkbox → boolean
//! - number → integer; empty text → `null`, any other non-integer text fails
//!   the whole collection
//! - select (map selectors included) → integer when the raw value is a full
//!   integer, otherwise the string as-is
//! - text kinds → string unchanged
//!
//! Hidden conditional fields are collected like any other field.

use std::collections::HashMap;

use hllrcon_types::{CollectedValues, Command, Field, FieldKind};
use serde_json::Value;
use thiserror::Error;

use crate::form::{ControlSet, Widget};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid number format for '{field}': '{raw}'")]
    InvalidNumber { field: String, raw: String },
    #[error("Invalid boolean for '{field}': '{raw}' (use true/false, yes/no, on/off or 1/0)")]
    InvalidFlag { field: String, raw: String },
}

/// Where raw field values come from.
pub trait ValueSource {
    /// Raw text of a field; `None` when the source has nothing for it.
    fn text(&self, field_name: &str) -> Option<String>;

    /// Checkbox state; `Ok(None)` falls back to the field's default.
    fn flag(&self, field_name: &str) -> Result<Option<bool>, ValidationError>;
}

impl ValueSource for ControlSet {
    fn text(&self, field_name: &str) -> Option<String> {
        self.raw_value(field_name)
    }

    fn flag(&self, field_name: &str) -> Result<Option<bool>, ValidationError> {
        Ok(match self.control(field_name).map(|control| &control.widget) {
            Some(Widget::Toggle { checked }) => Some(*checked),
            _ => None,
        })
    }
}

/// `name=value` pairs supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidedValues(HashMap<String, String>);

impl ProvidedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Names that do not belong to `command`, sorted.
    pub fn unknown_fields(&self, command: &Command) -> Vec<String> {
        let mut unknown: Vec<String> = self.0.keys().filter(|name| command.field(name).is_none()).cloned().collect();
        unknown.sort();
        unknown
    }
}

impl FromIterator<(String, String)> for ProvidedValues {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ValueSource for ProvidedValues {
    fn text(&self, field_name: &str) -> Option<String> {
        self.0.get(field_name).cloned()
    }

    fn flag(&self, field_name: &str) -> Result<Option<bool>, ValidationError> {
        let Some(raw) = self.0.get(field_name) else {
            return Ok(None);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ValidationError::InvalidFlag {
                field: field_name.to_string(),
                raw: raw.clone(),
            }),
        }
    }
}

/// Collect and coerce every field of `command`, in declaration order.
pub fn collect_values(command: &Command, source: &impl ValueSource) -> Result<CollectedValues, ValidationError> {
    let mut values = CollectedValues::new();
    for field in &command.fields {
        values.insert(field.name.clone(), collect_field(field, source)?);
    }
    Ok(values)
}

fn collect_field(field: &Field, source: &impl ValueSource) -> Result<Value, ValidationError> {
    let text = || source.text(&field.name).unwrap_or_default();

    if field.is_map_field() {
        return Ok(coerce_choice(text()));
    }

    match &field.kind {
        FieldKind::Checkbox { default } => Ok(Value::Bool(source.flag(&field.name)?.unwrap_or(*default))),
        FieldKind::Number => coerce_number(&field.name, text()),
        FieldKind::Select { .. } => Ok(coerce_choice(text())),
        FieldKind::Text | FieldKind::MultilineText { .. } => Ok(Value::String(text())),
    }
}

fn coerce_number(field_name: &str, raw: String) -> Result<Value, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    trimmed
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| ValidationError::InvalidNumber {
            field: field_name.to_string(),
            raw,
        })
}

fn coerce_choice(raw: String) -> Value {
    match raw.parse::<i64>() {
        Ok(number) => Value::from(number),
        Err(_) => Value::String(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hllrcon_registry::CommandRegistry;
    use serde_json::json;

    fn builtin(name: &str) -> Command {
        CommandRegistry::builtin()
            .find_by_name(name)
            .map(|(_, command)| command.clone())
            .expect("command in catalog")
    }

    fn provided(pairs: &[(&str, &str)]) -> ProvidedValues {
        pairs.iter().map(|(name, value)| (name.to_string(), value.to_string())).collect()
    }

    #[test]
    fn numbers_parse_and_blank_numbers_are_null() {
        let command = builtin("DisbandPlatoon");
        let values = collect_values(&command, &provided(&[("team_index", " 1 "), ("reason", "cleanup")])).expect("collect");
        assert_eq!(values.get("team_index"), Some(&json!(1)));
        assert_eq!(values.get("squad_index"), Some(&Value::Null));
        assert_eq!(values.get("reason"), Some(&json!("cleanup")));
    }

    #[test]
    fn malformed_number_fails_collection() {
        let command = builtin("SetVipSlotCount");
        let error = collect_values(&command, &provided(&[("vip_slot_count", "abc")])).expect_err("abc is not a number");
        assert_eq!(
            error,
            ValidationError::InvalidNumber {
                field: "vip_slot_count".into(),
                raw: "abc".into()
            }
        );
        assert!(collect_values(&command, &provided(&[("vip_slot_count", "1.5")])).is_err());
    }

    #[test]
    fn numeric_select_values_become_integers() {
        let command = builtin("ForceTeamSwitch");
        let mut set = ControlSet::render(&command, None);
        set.set_text("player_id", "76561198123456789").expect("type id");
        set.select_value("force_mode", "1").expect("select");

        let values = collect_values(&command, &set).expect("collect");
        assert_eq!(values.get("force_mode"), Some(&json!(1)));
        assert_eq!(values.get("player_id"), Some(&json!("76561198123456789")), "text fields stay strings");
    }

    #[test]
    fn non_numeric_select_values_stay_strings() {
        let command = builtin("SetMatchTimer");
        let values = collect_values(&command, &provided(&[("game_mode", "Warfare"), ("match_length", "90")])).expect("collect");
        assert_eq!(values.get("game_mode"), Some(&json!("Warfare")));
        assert_eq!(values.get("match_length"), Some(&json!(90)));
    }

    #[test]
    fn checkboxes_are_booleans_with_defaults() {
        let command = builtin("SetMapShuffleEnabled");
        let mut set = ControlSet::render(&command, None);
        assert_eq!(collect_values(&command, &set).expect("collect").get("enable"), Some(&json!(true)));
        set.toggle("enable").expect("toggle");
        assert_eq!(collect_values(&command, &set).expect("collect").get("enable"), Some(&json!(false)));

        assert_eq!(collect_values(&command, &provided(&[])).expect("collect").get("enable"), Some(&json!(true)));
        assert_eq!(
            collect_values(&command, &provided(&[("enable", "off")])).expect("collect").get("enable"),
            Some(&json!(false))
        );
        assert!(matches!(
            collect_values(&command, &provided(&[("enable", "maybe")])),
            Err(ValidationError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn hidden_fields_are_still_collected_in_declaration_order() {
        let command = builtin("GetServerInformation");
        let mut set = ControlSet::render(&command, None);
        set.select_value("type", "session").expect("select");
        assert!(!set.is_visible("value"));

        let values = collect_values(&command, &set).expect("collect");
        let keys: Vec<&String> = values.keys().collect();
        assert_eq!(keys, vec!["type", "value"]);
        assert_eq!(values.get("value"), Some(&json!("")));
    }

    #[test]
    fn unknown_provided_fields_are_reported() {
        let command = builtin("KickPlayer");
        let values = provided(&[("player_id", "1"), ("zeta", "x"), ("alpha", "y")]);
        assert_eq!(values.unknown_fields(&command), vec!["alpha", "zeta"]);
    }
}
