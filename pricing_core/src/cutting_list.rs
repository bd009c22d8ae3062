//! # Cutting List
//!
//! Oak beams and flooring are ordered as a list of cut pieces. Each line is
//! priced on its own (volume or area x rate) and multiplied by its quantity.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::cutting_list::CuttingList;
//! use pricing_core::pricing::{BeamDimensions, OakType, UnitPriceTable};
//!
//! let mut list = CuttingList::new();
//! let table = UnitPriceTable::oak_beams();
//! let id = list
//!     .add_beam(&BeamDimensions::new(200.0, 15.0, 15.0), OakType::Green, &table, 2)
//!     .unwrap();
//!
//! assert!((list.total() - 72.0).abs() < 1e-9);
//! list.adjust_quantity(id, -5);
//! assert_eq!(list.get(id).unwrap().quantity, 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{PriceError, PriceResult};
use crate::pricing::timber::{
    calculate_area_and_price, calculate_volume_and_price, BeamDimensions, FloorArea, OakType, UnitPriceTable,
};

/// Size of one cut piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CutMeasure {
    Beam { volume_m3: f64 },
    Flooring { area_m2: f64 },
}

/// One line of the cutting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingListItem {
    pub id: Uuid,

    /// Human-readable line (e.g., "Green Oak beam 200 x 15 x 15 cm")
    pub description: String,

    pub oak_type: OakType,
    pub measure: CutMeasure,

    /// Always at least 1
    pub quantity: u32,

    /// Price of one piece
    pub unit_price: f64,

    /// unit_price x quantity
    pub line_price: f64,

    pub added_at: DateTime<Utc>,
}

impl CuttingListItem {
    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
        self.line_price = self.unit_price * f64::from(self.quantity);
    }
}

/// Ordered list of independently priced cut pieces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CuttingList {
    items: Vec<CuttingListItem>,
}

impl CuttingList {
    pub fn new() -> Self {
        CuttingList::default()
    }

    /// Add a beam line.
    ///
    /// Returns `InvalidInput` when any dimension is missing or not positive,
    /// since such a beam would price at 0.
    pub fn add_beam(
        &mut self,
        dims: &BeamDimensions,
        oak: OakType,
        table: &UnitPriceTable,
        quantity: u32,
    ) -> PriceResult<Uuid> {
        for (field, value) in [
            ("length", dims.length_cm),
            ("width", dims.width_cm),
            ("thickness", dims.thickness_cm),
        ] {
            if !value.is_positive() {
                return Err(PriceError::invalid_input(
                    field,
                    value.0.to_string(),
                    "beam dimensions must be positive centimetres",
                ));
            }
        }

        let quote = calculate_volume_and_price(dims, oak, table);
        let description = format!(
            "{} beam {} x {} x {} cm",
            oak.display_name(),
            dims.length_cm.0,
            dims.width_cm.0,
            dims.thickness_cm.0
        );
        Ok(self.push(
            description,
            oak,
            CutMeasure::Beam {
                volume_m3: quote.volume_m3.0,
            },
            quote.price,
            quantity,
        ))
    }

    /// Add a flooring line. Returns `InvalidInput` when the area is not positive.
    pub fn add_flooring(
        &mut self,
        area: &FloorArea,
        oak: OakType,
        table: &UnitPriceTable,
        quantity: u32,
    ) -> PriceResult<Uuid> {
        let quote = calculate_area_and_price(area, oak, table);
        if quote.area_m2.0 <= 0.0 {
            return Err(PriceError::invalid_input(
                "area",
                quote.area_m2.0.to_string(),
                "enter an area or both length and width",
            ));
        }

        let description = format!("{} flooring {:.2} m2", oak.display_name(), quote.area_m2.0);
        Ok(self.push(
            description,
            oak,
            CutMeasure::Flooring {
                area_m2: quote.area_m2.0,
            },
            quote.price,
            quantity,
        ))
    }

    fn push(&mut self, description: String, oak: OakType, measure: CutMeasure, unit_price: f64, quantity: u32) -> Uuid {
        let mut item = CuttingListItem {
            id: Uuid::new_v4(),
            description,
            oak_type: oak,
            measure,
            quantity: 1,
            unit_price,
            line_price: unit_price,
            added_at: Utc::now(),
        };
        item.set_quantity(quantity);
        debug!(id = %item.id, description = %item.description, quantity = item.quantity, "cutting list line added");

        let id = item.id;
        self.items.push(item);
        id
    }

    /// Change a line's quantity by `delta`, never going below 1.
    ///
    /// Returns the updated line, or `None` if the id is not in the list.
    pub fn adjust_quantity(&mut self, id: Uuid, delta: i64) -> Option<&CuttingListItem> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        let target = (i64::from(item.quantity) + delta).clamp(1, i64::from(u32::MAX));
        item.set_quantity(u32::try_from(target).unwrap_or(u32::MAX));
        debug!(id = %id, quantity = item.quantity, "cutting list quantity changed");
        Some(item)
    }

    /// Remove a line.
    pub fn remove(&mut self, id: Uuid) -> Option<CuttingListItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        debug!(id = %id, "cutting list line removed");
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&CuttingListItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Lines in the order they were added
    pub fn items(&self) -> &[CuttingListItem] {
        &self.items
    }

    /// Sum of every line price
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.line_price).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_add_beam_prices_line() {
        let mut list = CuttingList::new();
        let table = UnitPriceTable::oak_beams();
        let id = list
            .add_beam(&BeamDimensions::new(300.0, 20.0, 20.0), OakType::Kilned, &table, 3)
            .unwrap();

        let item = list.get(id).unwrap();
        // 3 x 0.2 x 0.2 = 0.12 m3 at 1000
        assert!(approx(item.unit_price, 120.0));
        assert!(approx(item.line_price, 360.0));
        assert_eq!(item.description, "Kiln Dried Oak beam 300 x 20 x 20 cm");
        assert!(matches!(item.measure, CutMeasure::Beam { volume_m3 } if approx(volume_m3, 0.12)));
    }

    #[test]
    fn test_add_beam_rejects_missing_dimension() {
        let mut list = CuttingList::new();
        let dims = BeamDimensions::from_inputs("200", "", "15");
        let err = list
            .add_beam(&dims, OakType::Green, &UnitPriceTable::oak_beams(), 1)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_flooring() {
        let mut list = CuttingList::new();
        let table = UnitPriceTable::oak_flooring();
        let id = list
            .add_flooring(&FloorArea::rectangle(400.0, 250.0), OakType::Reclaimed, &table, 1)
            .unwrap();
        assert!(approx(list.get(id).unwrap().line_price, 900.0));
        assert_eq!(list.get(id).unwrap().description, "Reclaimed Oak flooring 10.00 m2");

        assert!(list
            .add_flooring(&FloorArea::direct(0.0), OakType::Kilned, &table, 1)
            .is_err());
    }

    #[test]
    fn test_quantity_never_below_one() {
        let mut list = CuttingList::new();
        let table = UnitPriceTable::oak_beams();
        let id = list
            .add_beam(&BeamDimensions::new(100.0, 10.0, 10.0), OakType::Green, &table, 0)
            .unwrap();
        assert_eq!(list.get(id).unwrap().quantity, 1);

        let item = list.adjust_quantity(id, 4).unwrap();
        assert_eq!(item.quantity, 5);
        assert!(approx(item.line_price, 40.0));

        let item = list.adjust_quantity(id, -10).unwrap();
        assert_eq!(item.quantity, 1);
        assert!(approx(item.line_price, 8.0));

        assert!(list.adjust_quantity(Uuid::new_v4(), 1).is_none());
    }

    #[test]
    fn test_remove_and_total() {
        let mut list = CuttingList::new();
        let beams = UnitPriceTable::oak_beams();
        let floors = UnitPriceTable::oak_flooring();
        let a = list
            .add_beam(&BeamDimensions::new(100.0, 10.0, 10.0), OakType::Green, &beams, 2)
            .unwrap();
        let b = list
            .add_flooring(&FloorArea::direct(2.0), OakType::Kilned, &floors, 1)
            .unwrap();

        assert_ne!(a, b);
        assert!(approx(list.total(), 16.0 + 150.0));

        let removed = list.remove(a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(list.len(), 1);
        assert!(approx(list.total(), 150.0));
        assert!(list.remove(a).is_none());
    }

    #[test]
    fn test_serialization() {
        let mut list = CuttingList::new();
        list.add_flooring(&FloorArea::direct(1.5), OakType::Kilned, &UnitPriceTable::oak_flooring(), 2)
            .unwrap();

        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains("\"kind\":\"flooring\""));
        let roundtrip: CuttingList = serde_json::from_str(&json).unwrap();
        assert_eq!(list, roundtrip);
    }
}
