//! # Timber Calculators
//!
//! Oak beams and oak flooring are not configured as a single product. Each
//! cut piece (or floor area) is priced on its own from a per-cubic-meter or
//! per-square-meter rate and accumulated on a [cutting list](crate::cutting_list).
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::pricing::timber::{calculate_volume_and_price, BeamDimensions, OakType, UnitPriceTable};
//!
//! let dims = BeamDimensions::new(200.0, 15.0, 15.0);
//! let quote = calculate_volume_and_price(&dims, OakType::Green, &UnitPriceTable::oak_beams());
//!
//! // 2.0 m x 0.15 m x 0.15 m = 0.045 m3 at 800/m3
//! assert!((quote.volume_m3.0 - 0.045).abs() < 1e-9);
//! assert!((quote.price - 36.0).abs() < 1e-9);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{PriceError, PriceResult};
use crate::units::{parse_measure, Centimeters, CubicMeters, Meters, SquareMeters};

/// Oak grades sold by the yard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OakType {
    /// Freshly sawn, unseasoned
    Green,
    /// Kiln dried
    Kilned,
    /// Reclaimed from old buildings
    Reclaimed,
}

impl OakType {
    /// All oak types for selection lists
    pub const ALL: [OakType; 3] = [OakType::Green, OakType::Kilned, OakType::Reclaimed];

    /// Value key used in selections and price tables
    pub fn code(&self) -> &'static str {
        match self {
            OakType::Green => "green",
            OakType::Kilned => "kilned",
            OakType::Reclaimed => "reclaimed",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PriceResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "green" | "greenoak" => Ok(OakType::Green),
            "kilned" | "kiln" | "kilndried" | "kilneddried" | "kilndriedoak" | "kilnedoak" => Ok(OakType::Kilned),
            "reclaimed" | "reclaimedoak" => Ok(OakType::Reclaimed),
            _ => Err(PriceError::invalid_input("oakType", s, "Expected green, kilned or reclaimed")),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            OakType::Green => "Green Oak",
            OakType::Kilned => "Kiln Dried Oak",
            OakType::Reclaimed => "Reclaimed Oak",
        }
    }
}

impl std::fmt::Display for OakType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Price per unit of material (m3 for beams, m2 for flooring) by oak type.
///
/// ## JSON Example
///
/// ```json
/// { "rates": { "green": 800.0, "kilned": 1000.0, "reclaimed": 1200.0 }, "fallback_rate": 800.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPriceTable {
    /// Rate per oak type
    pub rates: BTreeMap<OakType, f64>,

    /// Rate for oak types missing from `rates`
    #[serde(default)]
    pub fallback_rate: Option<f64>,
}

impl UnitPriceTable {
    /// Build a table from (oak type, rate) pairs with no fallback.
    pub fn new(rates: impl IntoIterator<Item = (OakType, f64)>) -> Self {
        UnitPriceTable {
            rates: rates.into_iter().collect(),
            fallback_rate: None,
        }
    }

    /// Set the rate used for missing oak types (builder style).
    pub fn with_fallback(mut self, rate: f64) -> Self {
        self.fallback_rate = Some(rate);
        self
    }

    /// Standard oak beam rates per m3. Unlisted types are charged as green oak.
    pub fn oak_beams() -> Self {
        UnitPriceTable::new([(OakType::Green, 800.0), (OakType::Kilned, 1000.0), (OakType::Reclaimed, 1200.0)])
            .with_fallback(800.0)
    }

    /// Standard oak flooring rates per m2. Anything but reclaimed is charged as kilned.
    pub fn oak_flooring() -> Self {
        UnitPriceTable::new([(OakType::Kilned, 75.0), (OakType::Reclaimed, 90.0)]).with_fallback(75.0)
    }

    /// Rate for an oak type; 0 when neither the type nor a fallback is listed.
    pub fn rate_for(&self, oak: OakType) -> f64 {
        self.rates
            .get(&oak)
            .copied()
            .or(self.fallback_rate)
            .filter(|r| r.is_finite())
            .unwrap_or(0.0)
    }
}

/// Cut dimensions of one beam. Unset dimensions are 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamDimensions {
    pub length_cm: Centimeters,
    pub width_cm: Centimeters,
    pub thickness_cm: Centimeters,
}

impl BeamDimensions {
    pub fn new(length_cm: f64, width_cm: f64, thickness_cm: f64) -> Self {
        BeamDimensions {
            length_cm: Centimeters(length_cm),
            width_cm: Centimeters(width_cm),
            thickness_cm: Centimeters(thickness_cm),
        }
    }

    /// Build from form text; empty or non-numeric fields become 0.
    pub fn from_inputs(length: &str, width: &str, thickness: &str) -> Self {
        BeamDimensions::new(parse_measure(length), parse_measure(width), parse_measure(thickness))
    }

    /// Volume in m3; 0 when any dimension is missing or non-positive.
    pub fn volume(&self) -> CubicMeters {
        let dims = [self.length_cm, self.width_cm, self.thickness_cm];
        if !dims.iter().all(|d| d.is_positive()) {
            return CubicMeters(0.0);
        }
        let [l, w, t] = dims.map(Meters::from);
        l * w * t
    }
}

/// Floor area, given directly or as length x width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorArea {
    pub area_m2: Option<SquareMeters>,
    pub length_cm: Option<Centimeters>,
    pub width_cm: Option<Centimeters>,
}

impl FloorArea {
    /// Area entered directly in m2.
    pub fn direct(area_m2: f64) -> Self {
        FloorArea {
            area_m2: Some(SquareMeters(area_m2)),
            ..FloorArea::default()
        }
    }

    /// Area measured as a rectangle in cm.
    pub fn rectangle(length_cm: f64, width_cm: f64) -> Self {
        FloorArea {
            area_m2: None,
            length_cm: Some(Centimeters(length_cm)),
            width_cm: Some(Centimeters(width_cm)),
        }
    }

    /// Build from form text; blank fields are treated as not entered.
    pub fn from_inputs(area: &str, length: &str, width: &str) -> Self {
        let field = |text: &str| (!text.trim().is_empty()).then(|| parse_measure(text));
        FloorArea {
            area_m2: field(area).map(SquareMeters),
            length_cm: field(length).map(Centimeters),
            width_cm: field(width).map(Centimeters),
        }
    }

    /// Resolved area in m2.
    ///
    /// A positive direct area wins; otherwise length x width when both are
    /// positive; otherwise 0.
    pub fn area(&self) -> SquareMeters {
        if let Some(direct) = self.area_m2.filter(|a| a.0.is_finite() && a.0 > 0.0) {
            return direct;
        }
        match (self.length_cm, self.width_cm) {
            (Some(l), Some(w)) if l.is_positive() && w.is_positive() => Meters::from(l) * Meters::from(w),
            _ => SquareMeters(0.0),
        }
    }
}

/// Priced beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeQuote {
    pub volume_m3: CubicMeters,
    pub price: f64,
}

/// Priced floor area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaQuote {
    pub area_m2: SquareMeters,
    pub price: f64,
}

/// Price one beam by volume.
pub fn calculate_volume_and_price(dims: &BeamDimensions, oak: OakType, table: &UnitPriceTable) -> VolumeQuote {
    let volume = dims.volume();
    VolumeQuote {
        volume_m3: volume,
        price: non_negative(volume.0 * table.rate_for(oak)),
    }
}

/// Price a floor by area.
pub fn calculate_area_and_price(area: &FloorArea, oak: OakType, table: &UnitPriceTable) -> AreaQuote {
    let area_m2 = area.area();
    AreaQuote {
        area_m2,
        price: non_negative(area_m2.0 * table.rate_for(oak)),
    }
}

fn non_negative(price: f64) -> f64 {
    if price.is_finite() {
        price.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_beam_volume_and_price_by_oak_type() {
        let dims = BeamDimensions::new(200.0, 15.0, 15.0);
        let table = UnitPriceTable::oak_beams();

        let green = calculate_volume_and_price(&dims, OakType::Green, &table);
        assert!(approx(green.volume_m3.0, 0.045));
        assert!(approx(green.price, 36.0));

        let kilned = calculate_volume_and_price(&dims, OakType::Kilned, &table);
        assert!(approx(kilned.price, 45.0));

        let reclaimed = calculate_volume_and_price(&dims, OakType::Reclaimed, &table);
        assert!(approx(reclaimed.price, 54.0));
    }

    #[test]
    fn test_beam_missing_or_non_positive_dimension() {
        let table = UnitPriceTable::oak_beams();
        for dims in [
            BeamDimensions::new(0.0, 15.0, 15.0),
            BeamDimensions::new(200.0, -15.0, 15.0),
            BeamDimensions::new(200.0, 15.0, f64::NAN),
            BeamDimensions::default(),
        ] {
            let quote = calculate_volume_and_price(&dims, OakType::Green, &table);
            assert_eq!(quote.volume_m3.0, 0.0);
            assert_eq!(quote.price, 0.0);
        }
    }

    #[test]
    fn test_beam_from_form_text() {
        let dims = BeamDimensions::from_inputs("300", "20cm", "");
        assert_eq!(dims.length_cm.0, 300.0);
        assert_eq!(dims.width_cm.0, 20.0);
        assert_eq!(dims.volume().0, 0.0);
    }

    #[test]
    fn test_flooring_direct_area() {
        let table = UnitPriceTable::oak_flooring();
        let quote = calculate_area_and_price(&FloorArea::direct(10.0), OakType::Kilned, &table);
        assert!(approx(quote.area_m2.0, 10.0));
        assert!(approx(quote.price, 750.0));

        let reclaimed = calculate_area_and_price(&FloorArea::direct(10.0), OakType::Reclaimed, &table);
        assert!(approx(reclaimed.price, 900.0));
    }

    #[test]
    fn test_flooring_rectangle_when_no_direct_area() {
        let table = UnitPriceTable::oak_flooring();
        let quote = calculate_area_and_price(&FloorArea::rectangle(400.0, 250.0), OakType::Kilned, &table);
        assert!(approx(quote.area_m2.0, 10.0));
        assert!(approx(quote.price, 750.0));

        // Non-positive direct area falls through to the rectangle
        let area = FloorArea {
            area_m2: Some(SquareMeters(0.0)),
            ..FloorArea::rectangle(200.0, 100.0)
        };
        assert!(approx(area.area().0, 2.0));
    }

    #[test]
    fn test_flooring_incomplete_input_is_zero() {
        let table = UnitPriceTable::oak_flooring();
        for area in [
            FloorArea::default(),
            FloorArea::rectangle(400.0, 0.0),
            FloorArea::from_inputs("", "abc", "250"),
            FloorArea::direct(-5.0),
        ] {
            let quote = calculate_area_and_price(&area, OakType::Kilned, &table);
            assert_eq!(quote.area_m2.0, 0.0);
            assert_eq!(quote.price, 0.0);
        }
    }

    #[test]
    fn test_flooring_from_form_text() {
        let area = FloorArea::from_inputs("", "500", "300");
        assert!(area.area_m2.is_none());
        assert!(approx(area.area().0, 15.0));
    }

    #[test]
    fn test_fallback_rate() {
        let flooring = UnitPriceTable::oak_flooring();
        assert_eq!(flooring.rate_for(OakType::Green), 75.0);

        let no_fallback = UnitPriceTable::new([(OakType::Kilned, 75.0)]);
        assert_eq!(no_fallback.rate_for(OakType::Green), 0.0);
    }

    #[test]
    fn test_negative_rate_clamped() {
        let table = UnitPriceTable::new([(OakType::Green, -50.0)]);
        let quote = calculate_volume_and_price(&BeamDimensions::new(100.0, 10.0, 10.0), OakType::Green, &table);
        assert_eq!(quote.price, 0.0);
    }

    #[test]
    fn test_oak_type_parsing() {
        assert_eq!(OakType::from_str_flexible("Green Oak").unwrap(), OakType::Green);
        assert_eq!(OakType::from_str_flexible("kiln-dried").unwrap(), OakType::Kilned);
        assert_eq!(OakType::from_str_flexible(" RECLAIMED ").unwrap(), OakType::Reclaimed);
        assert!(OakType::from_str_flexible("pine").is_err());
    }

    #[test]
    fn test_price_table_serialization() {
        let table = UnitPriceTable::oak_beams();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"reclaimed\":1200.0"));

        let roundtrip: UnitPriceTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, roundtrip);
    }
}
