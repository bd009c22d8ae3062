//! Subcommand implementations. Each builds a serializable report; printing
//! is kept separate so `--json` and the table share one code path.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use pricing_core::catalog::{Category, PricingModel, ResolvedSchema, SchemaOrigin, SchemaResolver};
use pricing_core::cutting_list::{CutMeasure, CuttingList, CuttingListItem};
use pricing_core::errors::{PriceError, PriceResult};
use pricing_core::pricing::{BeamDimensions, FloorArea, OakType, PriceBreakdown, PriceCalculator, UnitPriceTable};
use pricing_core::schema::ConfigurationSchema;
use pricing_core::selection::{SelectionState, SelectionValue};
use pricing_core::summary::configuration_summary;

/// Result of `quote`
#[derive(Debug, Serialize)]
pub struct QuoteReport {
    pub category: Category,
    pub origin: SchemaOrigin,
    pub title: String,
    pub summary: String,
    pub selection: SelectionState,
    pub breakdown: PriceBreakdown,
}

/// Resolve a category that is priced from a schema.
pub fn resolve_schema(resolver: &SchemaResolver, category: &str) -> PriceResult<(Category, ResolvedSchema)> {
    let category = Category::from_str_flexible(category)?;
    if category.pricing_model() != PricingModel::Additive {
        return Err(PriceError::invalid_input(
            "category",
            category.slug(),
            "priced by size; use the beam or floor command",
        ));
    }
    let resolved = resolver.resolve(category).ok_or_else(|| {
        PriceError::invalid_input("category", category.slug(), "no configuration is available")
    })?;
    Ok((category, resolved))
}

pub fn build_quote(
    resolver: &SchemaResolver,
    category: &str,
    assignments: &[String],
    selection_file: Option<&Path>,
    quantity: i32,
) -> PriceResult<QuoteReport> {
    let (category, ResolvedSchema { schema, origin }) = resolve_schema(resolver, category)?;

    let mut selection = SelectionState::from_defaults(&schema);
    if let Some(path) = selection_file {
        for (id, value) in read_selection(path, &schema)?.iter() {
            selection.insert(id, value.clone());
        }
    }
    for assignment in assignments {
        let (id, text) = parse_assignment(assignment)?;
        let Some(option) = schema.option(id) else {
            debug!(option_id = id, "ignoring --set for unknown option");
            continue;
        };
        selection.insert(id, SelectionValue::parse_for(option, text)?);
    }
    debug!(?selection, "selection assembled");

    let summary = configuration_summary(&selection, &schema);
    let title = schema.title.clone();
    let calculator = PriceCalculator::with_schema(schema);
    let breakdown = calculator.breakdown(&selection, quantity).ok_or_else(|| {
        PriceError::invalid_input("category", category.slug(), "no configuration is available")
    })?;

    Ok(QuoteReport {
        category,
        origin,
        title,
        summary,
        selection,
        breakdown,
    })
}

fn read_selection(path: &Path, schema: &ConfigurationSchema) -> PriceResult<SelectionState> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PriceError::file_error("read", path.display().to_string(), e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let Some(raw) = value.as_object() else {
        return Err(PriceError::invalid_input(
            "selection",
            path.display().to_string(),
            "Expected a JSON object keyed by option id",
        ));
    };
    SelectionState::validated(raw, schema)
}

/// Split `id=value`.
fn parse_assignment(text: &str) -> PriceResult<(&str, &str)> {
    match text.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => Ok((id.trim(), value)),
        _ => Err(PriceError::invalid_input("--set", text, "Expected ID=VALUE")),
    }
}

fn price_table(resolver: &SchemaResolver, category: Category) -> PriceResult<&UnitPriceTable> {
    resolver.price_table(category).ok_or_else(|| {
        PriceError::invalid_input("category", category.slug(), "no price table is available")
    })
}

pub fn price_beam(
    resolver: &SchemaResolver,
    [length, width, thickness]: [&str; 3],
    oak: &str,
    quantity: u32,
) -> PriceResult<CuttingListItem> {
    let oak = OakType::from_str_flexible(oak)?;
    let table = price_table(resolver, Category::OakBeams)?;
    let dims = BeamDimensions::from_inputs(length, width, thickness);

    let mut list = CuttingList::new();
    let id = list.add_beam(&dims, oak, table, quantity)?;
    list.remove(id)
        .ok_or_else(|| PriceError::invalid_input("beam", id.to_string(), "line disappeared"))
}

pub fn price_floor(
    resolver: &SchemaResolver,
    area: &str,
    length: &str,
    width: &str,
    oak: &str,
) -> PriceResult<CuttingListItem> {
    let oak = OakType::from_str_flexible(oak)?;
    let table = price_table(resolver, Category::OakFlooring)?;
    let floor = FloorArea::from_inputs(area, length, width);

    let mut list = CuttingList::new();
    let id = list.add_flooring(&floor, oak, table, 1)?;
    list.remove(id)
        .ok_or_else(|| PriceError::invalid_input("floor", id.to_string(), "line disappeared"))
}

pub fn print_quote(report: &QuoteReport) {
    let b = &report.breakdown;
    println!("═══════════════════════════════════════");
    println!("  {}", report.title.to_uppercase());
    println!("═══════════════════════════════════════");
    println!();
    println!("Configuration: {}", report.summary);
    if report.origin == SchemaOrigin::Fallback {
        println!("(standard price list)");
    }
    println!();
    println!("  {:<28} {:>10.2}", "Base price", b.base_price);
    for line in b.priced_lines() {
        let label = if line.per_unit && b.unit_multiplier != 1.0 {
            format!("{} (x{})", line.label, b.unit_multiplier)
        } else {
            line.label.clone()
        };
        println!("  {:<28} {:>+10.2}", label, line.impact);
    }
    println!("  {:<28} {:>10.2}", "Unit price", b.unit_price);
    if b.was_clamped() {
        println!("  (options reduced the price below zero; charged at 0)");
    }
    println!("  {:<28} {:>10}", "Quantity", b.quantity);
    println!();
    println!("═══════════════════════════════════════");
    println!("  TOTAL: {:.2}", b.total);
    println!("═══════════════════════════════════════");
}

pub fn print_line(item: &CuttingListItem) {
    println!("{}", item.description);
    match item.measure {
        CutMeasure::Beam { volume_m3 } => println!("  Volume:     {:.4} m3", volume_m3),
        CutMeasure::Flooring { area_m2 } => println!("  Area:       {:.2} m2", area_m2),
    }
    println!("  Unit price: {:.2}", item.unit_price);
    println!("  Quantity:   {}", item.quantity);
    println!("  Line price: {:.2}", item.line_price);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_core::catalog::Catalog;

    fn resolver() -> SchemaResolver {
        SchemaResolver::new(Catalog::fallback())
    }

    fn sets(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("bays=2").unwrap(), ("bays", "2"));
        assert_eq!(parse_assignment("sizeType=4x4").unwrap(), ("sizeType", "4x4"));
        assert!(parse_assignment("bays").is_err());
        assert!(parse_assignment("=2").is_err());
    }

    #[test]
    fn test_quote_garage() {
        let report = build_quote(&resolver(), "garage", &sets(&["bays=2", "beamSize=7x7"]), None, 1).unwrap();
        assert_eq!(report.category, Category::Garages);
        assert_eq!(report.origin, SchemaOrigin::Fallback);
        assert!((report.breakdown.total - 8000.0).abs() < 1e-9);
        assert!(report.summary.contains("7 inch x 7 inch"));
    }

    #[test]
    fn test_quote_rejects_bad_input() {
        let r = resolver();
        let bad_value = build_quote(&r, "gazebos", &sets(&["sizeType=9x9"]), None, 1).unwrap_err();
        assert_eq!(bad_value.error_code(), "UNKNOWN_VALUE");

        let timber = build_quote(&r, "oak-beams", &[], None, 1).unwrap_err();
        assert_eq!(timber.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_unknown_option_ids_are_ignored() {
        let r = resolver();
        let plain = build_quote(&r, "gazebos", &[], None, 1).unwrap();
        let report = build_quote(&r, "gazebos", &sets(&["roof=slate", "lighting=yes"]), None, 1).unwrap();

        assert!(report.selection.get("roof").is_none());
        assert!((plain.breakdown.total - 2800.0).abs() < 1e-9);
        assert!((report.breakdown.total - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_quote_from_selection_file() {
        let path = std::env::temp_dir().join("timber_quote_selection_test.json");
        std::fs::write(&path, r#"{ "lighting": true, "sizeType": "4x3", "unknown": 5 }"#).unwrap();

        let report = build_quote(&resolver(), "gazebos", &sets(&["trussType=curved"]), Some(&path), 2).unwrap();
        // (2800 + 120 + 250 + 200) x 2
        assert!((report.breakdown.total - 6740.0).abs() < 1e-9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_price_beam_and_floor() {
        let r = resolver();
        let beam = price_beam(&r, ["200", "15", "15"], "kilned", 2).unwrap();
        assert!((beam.unit_price - 45.0).abs() < 1e-9);
        assert!((beam.line_price - 90.0).abs() < 1e-9);
        assert!(price_beam(&r, ["200", "", "15"], "green", 1).is_err());
        assert!(price_beam(&r, ["200", "15", "15"], "pine", 1).is_err());

        let floor = price_floor(&r, "", "400", "250", "reclaimed").unwrap();
        assert!((floor.line_price - 900.0).abs() < 1e-9);
    }
}
