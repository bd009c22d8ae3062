//! # Configuration Schemas
//!
//! A `ConfigurationSchema` describes one configurable product category: a base
//! price for a single unit plus the options a customer can change. Schemas
//! serialize to the same camelCase JSON documents the storefront keeps under
//! `product_configurators/<category>`.
//!
//! ## Option Kinds
//!
//! ```text
//! OptionKind
//! ├── Select / Radio  values: key -> ValueSpec { priceImpact, perUnit }
//! ├── Checkbox        priceImpact applied when ticked
//! └── Slider          numeric input; the multiplier slider ("bays")
//!                     scales every perUnit impact
//! ```
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "title": "Garage",
//!   "basePrice": 7500,
//!   "options": [
//!     { "id": "bays", "label": "Number of Bays", "type": "slider",
//!       "min": 1, "max": 4, "step": 1, "defaultValue": [1] },
//!     { "id": "catSlide", "label": "Cat Slide Roof", "type": "checkbox",
//!       "priceImpact": 300, "perBay": true, "defaultValue": false }
//!   ]
//! }
//! ```
//!
//! ## Known Gap
//!
//! A select/radio value may carry `priceMultiplier` instead of `priceImpact`.
//! There is no agreed base for the multiplier, so it contributes nothing to
//! the price. The field is preserved so stored documents round-trip.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{PriceError, PriceResult};

/// Slider ids that act as the per-unit multiplier without an explicit flag
pub const MULTIPLIER_OPTION_IDS: [&str; 1] = ["bays"];

/// Price configuration for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSchema {
    /// Display title (e.g., "Configure Your Garage")
    #[serde(default)]
    pub title: String,

    /// Price of one unit with every option at its baseline
    pub base_price: f64,

    /// Options in display order. Order does not affect the price.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl ConfigurationSchema {
    /// Create a schema with no options.
    pub fn new(title: impl Into<String>, base_price: f64) -> Self {
        ConfigurationSchema {
            title: title.into(),
            base_price,
            options: Vec::new(),
        }
    }

    /// Append an option (builder style).
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Look up an option by id.
    pub fn option(&self, id: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.id == id)
    }

    /// The slider whose value multiplies every per-unit impact, if any.
    pub fn multiplier_option(&self) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.is_unit_multiplier())
    }

    /// Check the schema is internally consistent.
    ///
    /// Stored documents are validated once when they are resolved so the
    /// calculator can trust every lookup afterwards.
    pub fn validate(&self) -> PriceResult<()> {
        let name = if self.title.is_empty() { "<untitled>" } else { self.title.as_str() };

        if !self.base_price.is_finite() {
            return Err(PriceError::invalid_schema(name, "basePrice must be a finite number"));
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if option.id.trim().is_empty() {
                return Err(PriceError::invalid_schema(name, "option id must not be empty"));
            }
            if !seen.insert(option.id.as_str()) {
                return Err(PriceError::invalid_schema(
                    name,
                    format!("duplicate option id '{}'", option.id),
                ));
            }
            option.validate(name)?;
        }
        Ok(())
    }
}

/// One configurable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Key used to look up the customer's selection
    pub id: String,

    /// Display label
    #[serde(default)]
    pub label: String,

    /// Kind-specific data, tagged by `"type"` in JSON
    #[serde(flatten)]
    pub kind: OptionKind,
}

impl OptionSpec {
    /// Create a select (dropdown) option.
    pub fn select(
        id: impl Into<String>,
        label: impl Into<String>,
        default_value: impl Into<String>,
        values: impl IntoIterator<Item = (&'static str, ValueSpec)>,
    ) -> Self {
        OptionSpec {
            id: id.into(),
            label: label.into(),
            kind: OptionKind::Select(ChoiceSpec::new(default_value, values)),
        }
    }

    /// Create a radio (picture tile) option.
    pub fn radio(
        id: impl Into<String>,
        label: impl Into<String>,
        default_value: impl Into<String>,
        values: impl IntoIterator<Item = (&'static str, ValueSpec)>,
    ) -> Self {
        OptionSpec {
            id: id.into(),
            label: label.into(),
            kind: OptionKind::Radio(ChoiceSpec::new(default_value, values)),
        }
    }

    /// Create a checkbox option, unticked by default.
    pub fn checkbox(id: impl Into<String>, label: impl Into<String>, price_impact: f64, per_unit: bool) -> Self {
        OptionSpec {
            id: id.into(),
            label: label.into(),
            kind: OptionKind::Checkbox(CheckboxSpec {
                price_impact,
                per_unit,
                default_value: false,
            }),
        }
    }

    /// Create a slider option.
    pub fn slider(id: impl Into<String>, label: impl Into<String>, slider: SliderSpec) -> Self {
        OptionSpec {
            id: id.into(),
            label: label.into(),
            kind: OptionKind::Slider(slider),
        }
    }

    /// Whether this option supplies the per-unit multiplier.
    pub fn is_unit_multiplier(&self) -> bool {
        match &self.kind {
            OptionKind::Slider(slider) => {
                slider.unit_multiplier || MULTIPLIER_OPTION_IDS.contains(&self.id.as_str())
            }
            _ => false,
        }
    }

    fn validate(&self, schema: &str) -> PriceResult<()> {
        let fail = |reason: String| Err(PriceError::invalid_schema(schema, reason));

        match &self.kind {
            OptionKind::Select(choice) | OptionKind::Radio(choice) => {
                if choice.values.is_empty() {
                    return fail(format!("option '{}' offers no values", self.id));
                }
                if let Some((key, _)) = choice.values.iter().find(|(_, v)| !v.price_impact.is_finite()) {
                    return fail(format!("option '{}' value '{}' has a non-finite priceImpact", self.id, key));
                }
                if let Some(default) = &choice.default_value {
                    if !choice.values.contains_key(default) {
                        return fail(format!("option '{}' default '{}' is not one of its values", self.id, default));
                    }
                }
            }
            OptionKind::Checkbox(checkbox) => {
                if !checkbox.price_impact.is_finite() {
                    return fail(format!("option '{}' has a non-finite priceImpact", self.id));
                }
            }
            OptionKind::Slider(slider) => {
                if !(slider.min.is_finite() && slider.max.is_finite()) || slider.min > slider.max {
                    return fail(format!("option '{}' has an invalid range {}..{}", self.id, slider.min, slider.max));
                }
                if !(slider.step.is_finite() && slider.step > 0.0) {
                    return fail(format!("option '{}' step must be positive", self.id));
                }
            }
        }
        Ok(())
    }
}

/// Option kind with only the fields that kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionKind {
    /// Dropdown of keyed values
    Select(ChoiceSpec),
    /// Picture tiles of keyed values
    Radio(ChoiceSpec),
    /// Yes/no add-on
    Checkbox(CheckboxSpec),
    /// Numeric range
    Slider(SliderSpec),
}

impl OptionKind {
    /// Kind name as used in the JSON `"type"` tag
    pub fn name(&self) -> &'static str {
        match self {
            OptionKind::Select(_) => "select",
            OptionKind::Radio(_) => "radio",
            OptionKind::Checkbox(_) => "checkbox",
            OptionKind::Slider(_) => "slider",
        }
    }
}

/// Values offered by a select or radio option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceSpec {
    /// Value key -> pricing for that value
    pub values: BTreeMap<String, ValueSpec>,

    /// Applies to every value of the option
    #[serde(default, alias = "perBay", skip_serializing_if = "is_false")]
    pub per_unit: bool,

    /// Key selected when the page loads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ChoiceSpec {
    /// Build from (key, value) pairs.
    pub fn new(default_value: impl Into<String>, values: impl IntoIterator<Item = (&'static str, ValueSpec)>) -> Self {
        ChoiceSpec {
            values: values.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            per_unit: false,
            default_value: Some(default_value.into()),
        }
    }
}

/// Pricing for one value of a select/radio option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSpec {
    /// Display label
    #[serde(default)]
    pub label: String,

    /// Amount added to (or, when negative, deducted from) the unit price
    #[serde(default)]
    pub price_impact: f64,

    /// Placeholder: stored but not priced (see module docs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_multiplier: Option<f64>,

    /// Impact is multiplied by the unit multiplier (e.g., per bay)
    #[serde(default, alias = "perBay", skip_serializing_if = "is_false")]
    pub per_unit: bool,
}

impl ValueSpec {
    /// A value with a flat price impact.
    pub fn new(label: impl Into<String>, price_impact: f64) -> Self {
        ValueSpec {
            label: label.into(),
            price_impact,
            price_multiplier: None,
            per_unit: false,
        }
    }

    /// Mark the impact as per unit (builder style).
    pub fn per_unit(mut self) -> Self {
        self.per_unit = true;
        self
    }

    /// Contribution of this value before the unit multiplier.
    ///
    /// `price_multiplier` is a no-op: a value carrying only a multiplier
    /// contributes 0.
    pub fn contribution(&self) -> f64 {
        self.price_impact
    }
}

/// Checkbox option pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxSpec {
    /// Amount added when ticked
    #[serde(default)]
    pub price_impact: f64,

    /// Impact is multiplied by the unit multiplier
    #[serde(default, alias = "perBay", skip_serializing_if = "is_false")]
    pub per_unit: bool,

    /// Ticked when the page loads
    #[serde(default)]
    pub default_value: bool,
}

/// Slider option range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,

    #[serde(default = "default_step")]
    pub step: f64,

    /// Initial position. Stored documents use either `[1]` or `1`.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Vec<f64>>,

    /// Display unit (e.g., "bays", "m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Explicitly marks this slider as the per-unit multiplier
    #[serde(default, skip_serializing_if = "is_false")]
    pub unit_multiplier: bool,
}

impl SliderSpec {
    /// A slider over `min..=max` in whole steps, starting at `min`.
    pub fn new(min: f64, max: f64) -> Self {
        SliderSpec {
            min,
            max,
            step: 1.0,
            default_value: Some(vec![min]),
            unit: None,
            unit_multiplier: false,
        }
    }

    /// Set the display unit (builder style).
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Flag as the per-unit multiplier (builder style).
    pub fn as_unit_multiplier(mut self) -> Self {
        self.unit_multiplier = true;
        self
    }

    /// Whether a value lies within the slider range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

fn default_step() -> f64 {
    1.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(f64),
        Many(Vec<f64>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(v)) => Some(vec![v]),
        Some(OneOrMany::Many(v)) => Some(v),
        None => None,
    })
}
