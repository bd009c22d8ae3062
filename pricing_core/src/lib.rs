//! # pricing_core - Timber Structure Price-Configuration Engine
//!
//! `pricing_core` prices configurable oak-frame products: garages, gazebos and
//! porches from an additive option schema, oak beams by volume and oak
//! flooring by area. Every type is JSON-serializable so schemas, selections
//! and quotes can move between the storefront, the CLI and stored documents
//! unchanged.
//!
//! ## Design Philosophy
//!
//! - **Pure**: Calculators are functions of their inputs; no hidden state
//! - **Injected Config**: Schemas come from a store or a fallback catalog,
//!   never from globals
//! - **Typed Options**: Option kinds and selection values are tagged enums
//! - **Rich Errors**: Structured error types at the boundaries
//!
//! ## Quick Start
//!
//! ```rust
//! use pricing_core::catalog::{fallback_schema, Category};
//! use pricing_core::pricing::calculate_price;
//! use pricing_core::selection::SelectionState;
//!
//! let schema = fallback_schema(Category::Garages).unwrap();
//! let mut selection = SelectionState::from_defaults(&schema);
//! selection.set_slider("bays", 2.0);
//! selection.set_choice("beamSize", "7x7");
//!
//! let price = calculate_price(&selection, 1, Some(&schema)).unwrap();
//! assert!((price - 8000.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Configuration schemas and option kinds
//! - [`selection`] - Customer selections and their validation
//! - [`pricing`] - Additive, volume and area calculators
//! - [`catalog`] - Categories, fallback catalog and schema resolution
//! - [`cutting_list`] - Priced lines for beams and flooring
//! - [`summary`] - Basket text for a selection
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Catalog files and on-disk documents

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod cutting_list;
pub mod errors;
pub mod file_io;
pub mod pricing;
pub mod schema;
pub mod selection;
pub mod summary;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalog::{Catalog, Category, ConfigSource, SchemaResolver};
pub use errors::{PriceError, PriceResult};
pub use file_io::{load_catalog, save_catalog, DocumentDirectory};
pub use pricing::{calculate_area_and_price, calculate_price, calculate_volume_and_price, PriceCalculator};
pub use schema::ConfigurationSchema;
pub use selection::{SelectionState, SelectionValue};
pub use summary::configuration_summary;
