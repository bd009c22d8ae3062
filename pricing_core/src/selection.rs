//! # Selection State
//!
//! The customer's current choices, keyed by option id. A selection is seeded
//! from schema defaults when a configurator loads and then changed one input
//! event at a time.
//!
//! ## JSON Shape
//!
//! ```json
//! { "bays": [2], "beamSize": "7x7", "trussType": "straight", "catSlide": true }
//! ```
//!
//! Strings are select/radio keys, booleans are checkboxes and one-element
//! arrays are slider positions.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::catalog::{fallback_schema, Category};
//! use pricing_core::selection::SelectionState;
//!
//! let schema = fallback_schema(Category::Garages).unwrap();
//! let mut selection = SelectionState::from_defaults(&schema);
//! selection.set_slider("bays", 2.0);
//! selection.set_choice("beamSize", "7x7");
//! assert_eq!(selection.choice("beamSize"), Some("7x7"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::{PriceError, PriceResult};
use crate::schema::{ConfigurationSchema, OptionKind, OptionSpec};

/// One selected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    /// Checkbox state
    Toggle(bool),
    /// Select/radio value key
    Choice(String),
    /// Slider position(s); the first element is used
    Slider(Vec<f64>),
}

impl SelectionValue {
    /// Value key, if this is a select/radio selection
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            SelectionValue::Choice(key) => Some(key),
            _ => None,
        }
    }

    /// Checkbox state, if this is a checkbox selection
    pub fn as_toggle(&self) -> Option<bool> {
        match self {
            SelectionValue::Toggle(on) => Some(*on),
            _ => None,
        }
    }

    /// First slider position, if this is a slider selection
    pub fn first_number(&self) -> Option<f64> {
        match self {
            SelectionValue::Slider(values) => values.first().copied(),
            _ => None,
        }
    }

    /// Short description of the value shape for error messages
    pub fn shape(&self) -> &'static str {
        match self {
            SelectionValue::Toggle(_) => "boolean",
            SelectionValue::Choice(_) => "text",
            SelectionValue::Slider(_) => "number array",
        }
    }

    /// Convert a raw JSON value. Bare numbers are accepted as slider positions.
    pub fn from_json(value: &Value) -> Option<SelectionValue> {
        match value {
            Value::Bool(b) => Some(SelectionValue::Toggle(*b)),
            Value::String(s) => Some(SelectionValue::Choice(s.clone())),
            Value::Number(n) => n.as_f64().map(|v| SelectionValue::Slider(vec![v])),
            Value::Array(items) => items
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<f64>>>()
                .map(SelectionValue::Slider),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Parse text typed on the command line for a specific option.
    ///
    /// ```rust
    /// use pricing_core::schema::OptionSpec;
    /// use pricing_core::selection::SelectionValue;
    ///
    /// let option = OptionSpec::checkbox("lighting", "Lighting Kit", 200.0, false);
    /// let value = SelectionValue::parse_for(&option, "yes").unwrap();
    /// assert_eq!(value.as_toggle(), Some(true));
    /// ```
    pub fn parse_for(option: &OptionSpec, text: &str) -> PriceResult<SelectionValue> {
        let text = text.trim();
        let value = match &option.kind {
            OptionKind::Select(_) | OptionKind::Radio(_) => SelectionValue::Choice(text.to_string()),
            OptionKind::Checkbox(_) => match text.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "on" => SelectionValue::Toggle(true),
                "false" | "no" | "n" | "0" | "off" => SelectionValue::Toggle(false),
                _ => {
                    return Err(PriceError::invalid_input(
                        option.id.clone(),
                        text,
                        "Expected true/false, yes/no or 1/0",
                    ))
                }
            },
            OptionKind::Slider(_) => {
                let number: f64 = text.parse().map_err(|_| {
                    PriceError::invalid_input(option.id.clone(), text, "Expected a number")
                })?;
                SelectionValue::Slider(vec![number])
            }
        };
        check_against(option, &value)?;
        Ok(value)
    }
}

/// Current selections keyed by option id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    values: BTreeMap<String, SelectionValue>,
}

impl SelectionState {
    /// An empty selection (every option unset).
    pub fn new() -> Self {
        SelectionState::default()
    }

    /// Seed a selection from each option's default value.
    ///
    /// Options without a default stay unset and contribute nothing to the
    /// price until the customer picks something.
    pub fn from_defaults(schema: &ConfigurationSchema) -> Self {
        let mut selection = SelectionState::new();
        for option in &schema.options {
            let default = match &option.kind {
                OptionKind::Select(choice) | OptionKind::Radio(choice) => {
                    choice.default_value.clone().map(SelectionValue::Choice)
                }
                OptionKind::Checkbox(cb) => Some(SelectionValue::Toggle(cb.default_value)),
                OptionKind::Slider(slider) => slider.default_value.clone().map(SelectionValue::Slider),
            };
            if let Some(value) = default {
                selection.values.insert(option.id.clone(), value);
            }
        }
        selection
    }

    /// Build a selection from raw JSON, checking it against the schema once.
    ///
    /// - Unknown option ids are dropped, not rejected.
    /// - A value whose shape does not match the option kind is an error.
    /// - Select/radio keys must be offered by the option.
    /// - Slider positions must lie within the slider range.
    pub fn validated(raw: &serde_json::Map<String, Value>, schema: &ConfigurationSchema) -> PriceResult<Self> {
        let mut selection = SelectionState::new();
        for (id, raw_value) in raw {
            let Some(option) = schema.option(id) else {
                debug!(option_id = %id, "ignoring selection for unknown option");
                continue;
            };
            if raw_value.is_null() {
                continue;
            }
            let value = SelectionValue::from_json(raw_value).ok_or_else(|| {
                PriceError::selection_mismatch(id.clone(), option.kind.name(), json_shape(raw_value))
            })?;
            check_against(option, &value)?;
            selection.values.insert(id.clone(), value);
        }
        Ok(selection)
    }

    /// Selected value for an option
    pub fn get(&self, id: &str) -> Option<&SelectionValue> {
        self.values.get(id)
    }

    /// Selected key of a select/radio option
    pub fn choice(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(SelectionValue::as_choice)
    }

    /// Set any value without schema checks
    pub fn insert(&mut self, id: impl Into<String>, value: SelectionValue) {
        self.values.insert(id.into(), value);
    }

    /// Pick a select/radio value
    pub fn set_choice(&mut self, id: impl Into<String>, key: impl Into<String>) {
        self.insert(id, SelectionValue::Choice(key.into()));
    }

    /// Tick or untick a checkbox
    pub fn set_toggle(&mut self, id: impl Into<String>, on: bool) {
        self.insert(id, SelectionValue::Toggle(on));
    }

    /// Move a slider
    pub fn set_slider(&mut self, id: impl Into<String>, position: f64) {
        self.insert(id, SelectionValue::Slider(vec![position]));
    }

    /// Clear an option back to unset
    pub fn remove(&mut self, id: &str) -> Option<SelectionValue> {
        self.values.remove(id)
    }

    /// Iterate over (option id, value) pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check a value has the right shape (and key/range) for its option.
fn check_against(option: &OptionSpec, value: &SelectionValue) -> PriceResult<()> {
    match (&option.kind, value) {
        (OptionKind::Select(choice) | OptionKind::Radio(choice), SelectionValue::Choice(key)) => {
            if !choice.values.contains_key(key) {
                return Err(PriceError::unknown_value(option.id.clone(), key.clone()));
            }
        }
        (OptionKind::Checkbox(_), SelectionValue::Toggle(_)) => {}
        (OptionKind::Slider(slider), SelectionValue::Slider(positions)) => {
            let Some(&first) = positions.first() else {
                return Err(PriceError::invalid_input(
                    option.id.clone(),
                    "[]",
                    "Slider selection must hold one number",
                ));
            };
            if !slider.contains(first) {
                return Err(PriceError::invalid_input(
                    option.id.clone(),
                    first.to_string(),
                    format!("Must be between {} and {}", slider.min, slider.max),
                ));
            }
        }
        (kind, other) => {
            return Err(PriceError::selection_mismatch(option.id.clone(), kind.name(), other.shape()));
        }
    }
    Ok(())
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SliderSpec, ValueSpec};
    use serde_json::json;

    fn gazebo_schema() -> ConfigurationSchema {
        ConfigurationSchema::new("Gazebo", 2800.0)
            .with_option(OptionSpec::radio(
                "trussType",
                "Truss Type",
                "straight",
                [("straight", ValueSpec::new("Straight", 0.0)), ("curved", ValueSpec::new("Curved", 120.0))],
            ))
            .with_option(OptionSpec::checkbox("lighting", "Include Lighting Kit?", 200.0, false))
            .with_option(OptionSpec::slider("bays", "Bays", SliderSpec::new(1.0, 4.0)))
    }

    fn as_map(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_defaults() {
        let selection = SelectionState::from_defaults(&gazebo_schema());
        assert_eq!(selection.choice("trussType"), Some("straight"));
        assert_eq!(selection.get("lighting"), Some(&SelectionValue::Toggle(false)));
        assert_eq!(selection.get("bays").and_then(SelectionValue::first_number), Some(1.0));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_json_shape_deserializes() {
        let selection: SelectionState =
            serde_json::from_str(r#"{ "bays": [2], "trussType": "curved", "lighting": true }"#).unwrap();
        assert_eq!(selection.get("bays"), Some(&SelectionValue::Slider(vec![2.0])));
        assert_eq!(selection.choice("trussType"), Some("curved"));
        assert_eq!(selection.get("lighting").and_then(SelectionValue::as_toggle), Some(true));
    }

    #[test]
    fn test_validated_drops_unknown_ids() {
        let raw = as_map(json!({ "trussType": "curved", "colour": "red" }));
        let selection = SelectionState::validated(&raw, &gazebo_schema()).unwrap();
        assert_eq!(selection.len(), 1);
        assert!(selection.get("colour").is_none());
    }

    #[test]
    fn test_validated_accepts_bare_slider_number() {
        let raw = as_map(json!({ "bays": 3 }));
        let selection = SelectionState::validated(&raw, &gazebo_schema()).unwrap();
        assert_eq!(selection.get("bays"), Some(&SelectionValue::Slider(vec![3.0])));
    }

    #[test]
    fn test_validated_rejects_kind_mismatch() {
        let raw = as_map(json!({ "lighting": "yes please" }));
        let err = SelectionState::validated(&raw, &gazebo_schema()).unwrap_err();
        assert_eq!(err.error_code(), "SELECTION_MISMATCH");
    }

    #[test]
    fn test_validated_rejects_unknown_key() {
        let raw = as_map(json!({ "trussType": "twisted" }));
        let err = SelectionState::validated(&raw, &gazebo_schema()).unwrap_err();
        assert_eq!(err, PriceError::unknown_value("trussType", "twisted"));
    }

    #[test]
    fn test_validated_rejects_out_of_range_slider() {
        let raw = as_map(json!({ "bays": [9] }));
        assert!(SelectionState::validated(&raw, &gazebo_schema()).is_err());

        let raw = as_map(json!({ "bays": [] }));
        assert!(SelectionState::validated(&raw, &gazebo_schema()).is_err());
    }

    #[test]
    fn test_parse_for_option_kinds() {
        let schema = gazebo_schema();
        let truss = schema.option("trussType").unwrap();
        let lighting = schema.option("lighting").unwrap();
        let bays = schema.option("bays").unwrap();

        assert_eq!(
            SelectionValue::parse_for(truss, "curved").unwrap(),
            SelectionValue::Choice("curved".to_string())
        );
        assert_eq!(SelectionValue::parse_for(lighting, "off").unwrap(), SelectionValue::Toggle(false));
        assert_eq!(SelectionValue::parse_for(bays, " 2 ").unwrap(), SelectionValue::Slider(vec![2.0]));

        assert!(SelectionValue::parse_for(lighting, "maybe").is_err());
        assert!(SelectionValue::parse_for(bays, "two").is_err());
        assert!(SelectionValue::parse_for(truss, "twisted").is_err());
    }

    #[test]
    fn test_setters() {
        let mut selection = SelectionState::new();
        selection.set_choice("trussType", "curved");
        selection.set_toggle("lighting", true);
        selection.set_slider("bays", 2.0);
        assert_eq!(selection.len(), 3);

        assert!(selection.remove("lighting").is_some());
        assert!(selection.get("lighting").is_none());
    }
}
