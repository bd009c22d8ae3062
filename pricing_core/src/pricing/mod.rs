//! # Price Calculators
//!
//! Every calculator is a pure function. Each one follows the pattern:
//!
//! - inputs are plain data (schema + selection, or dimensions + price table)
//! - the result is a number, never an error
//! - incomplete input prices at the floor (0) and is left for the caller to
//!   reject before anything reaches the basket
//!
//! ## Available Calculators
//!
//! - [`additive`] - base price plus option impacts (garages, gazebos, porches)
//! - [`timber`] - volume (oak beams) and area (oak flooring) pricing

pub mod additive;
pub mod timber;

// Re-export commonly used types
pub use additive::{calculate_price, unit_multiplier, unit_price, PriceBreakdown, PriceCalculator, PriceLine};
pub use timber::{
    calculate_area_and_price, calculate_volume_and_price, AreaQuote, BeamDimensions, FloorArea, OakType,
    UnitPriceTable, VolumeQuote,
};
