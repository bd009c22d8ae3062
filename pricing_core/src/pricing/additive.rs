//! # Additive Price Calculator
//!
//! Prices configurable structures (garages, gazebos, porches) as a base price
//! plus the impact of each selected option.
//!
//! ## Algorithm
//!
//! 1. No schema -> `None`. The caller shows "price unavailable", not £0.
//! 2. Start from `base_price`.
//! 3. The multiplier slider (e.g. `bays`) sets `unit_multiplier`, default 1.
//!    It adds nothing itself.
//! 4. Every other option with a selection adds its impact; per-unit impacts
//!    are multiplied by `unit_multiplier`. Impacts may be negative.
//! 5. The single-unit price is clamped to >= 0.
//! 6. The unit price is multiplied by quantity with no further clamp, so a
//!    negative quantity gives a negative total.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::catalog::{fallback_schema, Category};
//! use pricing_core::pricing::calculate_price;
//! use pricing_core::selection::SelectionState;
//!
//! let schema = fallback_schema(Category::Garages).unwrap();
//! let mut selection = SelectionState::from_defaults(&schema);
//! selection.set_slider("bays", 2.0);
//! selection.set_choice("beamSize", "7x7"); // +250 per bay
//!
//! assert_eq!(calculate_price(&selection, 1, Some(&schema)), Some(8000.0));
//! assert_eq!(calculate_price(&selection, 1, None), None);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::schema::{ConfigurationSchema, OptionKind, OptionSpec};
use crate::selection::{SelectionState, SelectionValue};

/// Total price for `quantity` configured units.
///
/// Returns `None` when no schema is available.
pub fn calculate_price(
    selection: &SelectionState,
    quantity: i32,
    schema: Option<&ConfigurationSchema>,
) -> Option<f64> {
    let schema = schema?;
    Some(unit_price(selection, schema) * f64::from(quantity))
}

/// Clamped price of a single configured unit.
pub fn unit_price(selection: &SelectionState, schema: &ConfigurationSchema) -> f64 {
    let multiplier = unit_multiplier(selection, schema);
    let subtotal = schema.base_price
        + schema
            .options
            .iter()
            .filter_map(|option| option_line(option, selection, multiplier))
            .map(|line| line.impact)
            .sum::<f64>();
    subtotal.max(0.0)
}

/// Multiplier applied to per-unit impacts.
///
/// The first position of the multiplier slider. An unset, zero or non-finite
/// position counts as 1.
pub fn unit_multiplier(selection: &SelectionState, schema: &ConfigurationSchema) -> f64 {
    schema
        .multiplier_option()
        .and_then(|option| selection.get(&option.id))
        .and_then(SelectionValue::first_number)
        .filter(|n| n.is_finite() && *n != 0.0)
        .unwrap_or(1.0)
}

/// Price contributed by one option, or `None` when the option is skipped.
fn option_line(option: &OptionSpec, selection: &SelectionState, multiplier: f64) -> Option<PriceLine> {
    if option.is_unit_multiplier() {
        return None;
    }
    let selected = selection.get(&option.id)?;

    let (impact, per_unit, label) = match &option.kind {
        OptionKind::Checkbox(cb) => {
            let ticked = selected.as_toggle().unwrap_or(false);
            let impact = if ticked { cb.price_impact } else { 0.0 };
            (impact, cb.per_unit, option.label.clone())
        }
        OptionKind::Select(choice) | OptionKind::Radio(choice) => {
            let key = selected.as_choice();
            let value = key.and_then(|k| choice.values.get(k));
            let impact = value.map(|v| v.contribution()).unwrap_or(0.0);
            let per_unit = choice.per_unit || value.map(|v| v.per_unit).unwrap_or(false);
            let label = value
                .map(|v| v.label.clone())
                .filter(|l| !l.is_empty())
                .or_else(|| key.map(str::to_string))
                .unwrap_or_default();
            (impact, per_unit, label)
        }
        // Only the multiplier slider takes part in generic pricing
        OptionKind::Slider(_) => (0.0, false, option.label.clone()),
    };

    Some(PriceLine {
        option_id: option.id.clone(),
        label,
        per_unit,
        impact: if per_unit { impact * multiplier } else { impact },
    })
}

/// One option's contribution to the unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    /// Option the line belongs to
    pub option_id: String,
    /// Selected value label (or option label for checkboxes)
    pub label: String,
    /// Whether the impact was multiplied by the unit multiplier
    pub per_unit: bool,
    /// Amount added to the unit price (after the multiplier)
    pub impact: f64,
}

/// Itemised quote for display next to the total.
///
/// ## JSON Example
///
/// ```json
/// {
///   "base_price": 7500.0,
///   "unit_multiplier": 2.0,
///   "lines": [
///     { "option_id": "beamSize", "label": "8 inch x 8 inch", "per_unit": true, "impact": 1000.0 }
///   ],
///   "subtotal": 8500.0,
///   "unit_price": 8500.0,
///   "quantity": 1,
///   "total": 8500.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub unit_multiplier: f64,
    /// Options with a selection, in schema order
    pub lines: Vec<PriceLine>,
    /// Base plus impacts, before clamping
    pub subtotal: f64,
    /// Subtotal clamped to >= 0
    pub unit_price: f64,
    pub quantity: i32,
    /// `unit_price * quantity`
    pub total: f64,
}

impl PriceBreakdown {
    /// Itemise the price of `quantity` units.
    pub fn compute(selection: &SelectionState, quantity: i32, schema: &ConfigurationSchema) -> Self {
        let multiplier = unit_multiplier(selection, schema);
        let lines: Vec<PriceLine> = schema
            .options
            .iter()
            .filter_map(|option| option_line(option, selection, multiplier))
            .collect();
        let subtotal = schema.base_price + lines.iter().map(|l| l.impact).sum::<f64>();
        let unit_price = subtotal.max(0.0);

        PriceBreakdown {
            base_price: schema.base_price,
            unit_multiplier: multiplier,
            lines,
            subtotal,
            unit_price,
            quantity,
            total: unit_price * f64::from(quantity),
        }
    }

    /// Whether the unit price was clamped up to zero
    pub fn was_clamped(&self) -> bool {
        self.subtotal < 0.0
    }

    /// Lines that changed the price
    pub fn priced_lines(&self) -> impl Iterator<Item = &PriceLine> {
        self.lines.iter().filter(|l| l.impact != 0.0)
    }
}

/// Calculator bound to one category's schema.
///
/// The schema is injected by the caller (typically from a
/// [`SchemaResolver`](crate::catalog::SchemaResolver)); the calculator never
/// looks anything up itself.
#[derive(Debug, Clone, Default)]
pub struct PriceCalculator {
    schema: Option<ConfigurationSchema>,
}

impl PriceCalculator {
    /// Create a calculator. `None` models a schema that could not be loaded.
    pub fn new(schema: Option<ConfigurationSchema>) -> Self {
        PriceCalculator { schema }
    }

    /// Create a calculator with a known schema.
    pub fn with_schema(schema: ConfigurationSchema) -> Self {
        PriceCalculator { schema: Some(schema) }
    }

    pub fn schema(&self) -> Option<&ConfigurationSchema> {
        self.schema.as_ref()
    }

    /// Selection seeded from the schema defaults (empty without a schema).
    pub fn default_selection(&self) -> SelectionState {
        self.schema.as_ref().map(SelectionState::from_defaults).unwrap_or_default()
    }

    /// Total for `quantity` units, or `None` without a schema.
    pub fn quote(&self, selection: &SelectionState, quantity: i32) -> Option<f64> {
        let total = calculate_price(selection, quantity, self.schema.as_ref());
        trace!(?total, quantity, "quoted configuration");
        total
    }

    /// Clamped single-unit price, or `None` without a schema.
    pub fn unit_price(&self, selection: &SelectionState) -> Option<f64> {
        self.schema.as_ref().map(|schema| unit_price(selection, schema))
    }

    /// Itemised quote, or `None` without a schema.
    pub fn breakdown(&self, selection: &SelectionState, quantity: i32) -> Option<PriceBreakdown> {
        self.schema
            .as_ref()
            .map(|schema| PriceBreakdown::compute(selection, quantity, schema))
    }
}
