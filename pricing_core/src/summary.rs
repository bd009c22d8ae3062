//! Human-readable configuration text shown alongside a basket line.

use crate::schema::{ConfigurationSchema, OptionKind};
use crate::selection::SelectionState;

/// Text used when nothing worth listing is selected
pub const STANDARD_CONFIGURATION: &str = "Standard Configuration";

/// Describe a selection in schema order.
///
/// - select/radio: the chosen value's label
/// - checkbox: the option label, only when ticked
/// - slider: `"<label>: <n> <unit>"`
///
/// Parts are joined by ", ". Unknown keys and unset options are skipped.
///
/// ```rust
/// use pricing_core::catalog::{fallback_schema, Category};
/// use pricing_core::selection::SelectionState;
/// use pricing_core::summary::configuration_summary;
///
/// let schema = fallback_schema(Category::Gazebos).unwrap();
/// let mut selection = SelectionState::new();
/// selection.set_choice("sizeType", "4x4");
/// selection.set_toggle("lighting", true);
///
/// assert_eq!(configuration_summary(&selection, &schema), "4m x 4m, Lighting Kit");
/// ```
pub fn configuration_summary(selection: &SelectionState, schema: &ConfigurationSchema) -> String {
    let parts: Vec<String> = schema
        .options
        .iter()
        .filter_map(|option| {
            let value = selection.get(&option.id)?;
            match &option.kind {
                OptionKind::Select(choice) | OptionKind::Radio(choice) => {
                    let key = value.as_choice()?;
                    choice.values.get(key).map(|v| v.label.clone())
                }
                OptionKind::Checkbox(_) => value.as_toggle().filter(|on| *on).map(|_| option.label.clone()),
                OptionKind::Slider(slider) => {
                    let n = value.first_number()?;
                    Some(match &slider.unit {
                        Some(unit) => format!("{}: {} {}", option.label, n, unit),
                        None => format!("{}: {}", option.label, n),
                    })
                }
            }
        })
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        STANDARD_CONFIGURATION.to_string()
    } else {
        parts.join(", ")
    }
}
