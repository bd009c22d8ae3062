//! # Catalog and Schema Resolution
//!
//! Product categories, the built-in fallback configuration, and the resolver
//! that decides which schema a configurator prices with.
//!
//! ## Structure
//!
//! ```text
//! Catalog
//! ├── version: String (schema version for catalog files)
//! ├── schemas: Category -> ConfigurationSchema (additive categories)
//! ├── oak_beams: UnitPriceTable (per m3)
//! └── oak_flooring: UnitPriceTable (per m2)
//! ```
//!
//! ## Resolution Order
//!
//! 1. The document store (any [`ConfigSource`]), when one is attached and
//!    returns a valid schema.
//! 2. The fallback catalog handed to the resolver.
//! 3. Otherwise `None`, which the calculators pass straight through.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::catalog::{Catalog, Category, SchemaOrigin, SchemaResolver};
//!
//! let resolver = SchemaResolver::new(Catalog::fallback());
//! let resolved = resolver.resolve(Category::Gazebos).unwrap();
//! assert_eq!(resolved.origin, SchemaOrigin::Fallback);
//! assert_eq!(resolved.schema.base_price, 2800.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{PriceError, PriceResult};
use crate::pricing::timber::UnitPriceTable;
use crate::schema::{ConfigurationSchema, OptionSpec, SliderSpec, ValueSpec};

/// Current schema version for catalog files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Store collection holding configurator documents
pub const CONFIG_COLLECTION: &str = "product_configurators";

/// Product categories sold on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Garages,
    Gazebos,
    Porches,
    OakBeams,
    OakFlooring,
}

/// How a category is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingModel {
    /// Base price plus option impacts
    Additive,
    /// Volume x rate per m3, per cut piece
    Volume,
    /// Area x rate per m2
    Area,
}

impl Category {
    /// All categories in menu order
    pub const ALL: [Category; 5] = [
        Category::Garages,
        Category::Gazebos,
        Category::Porches,
        Category::OakBeams,
        Category::OakFlooring,
    ];

    /// URL slug (e.g., "oak-beams")
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Garages => "garages",
            Category::Gazebos => "gazebos",
            Category::Porches => "porches",
            Category::OakBeams => "oak-beams",
            Category::OakFlooring => "oak-flooring",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Garages => "Oak Frame Garages",
            Category::Gazebos => "Oak Frame Gazebos",
            Category::Porches => "Oak Frame Porches",
            Category::OakBeams => "Oak Beams",
            Category::OakFlooring => "Oak Flooring",
        }
    }

    /// Store document key (e.g., "product_configurators/garages")
    pub fn document_key(&self) -> String {
        format!("{}/{}", CONFIG_COLLECTION, self.slug())
    }

    pub fn pricing_model(&self) -> PricingModel {
        match self {
            Category::Garages | Category::Gazebos | Category::Porches => PricingModel::Additive,
            Category::OakBeams => PricingModel::Volume,
            Category::OakFlooring => PricingModel::Area,
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> PriceResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "garages" | "garage" => Ok(Category::Garages),
            "gazebos" | "gazebo" => Ok(Category::Gazebos),
            "porches" | "porch" => Ok(Category::Porches),
            "oak-beams" | "oak-beam" | "beams" | "beam" => Ok(Category::OakBeams),
            "oak-flooring" | "flooring" | "floor" => Ok(Category::OakFlooring),
            _ => Err(PriceError::category_not_found(s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Fallback Configuration
// ============================================================================

/// Built-in schema for an additive category; `None` for beams and flooring.
pub fn fallback_schema(category: Category) -> Option<ConfigurationSchema> {
    match category {
        Category::Garages => Some(garage_schema()),
        Category::Gazebos => Some(gazebo_schema()),
        Category::Porches => Some(porch_schema()),
        Category::OakBeams | Category::OakFlooring => None,
    }
}

fn truss_option(default_value: &str, curved_impact: f64) -> OptionSpec {
    OptionSpec::radio(
        "trussType",
        "Truss Type",
        default_value,
        [
            ("straight", ValueSpec::new("Straight", 0.0)),
            ("curved", ValueSpec::new("Curved", curved_impact)),
        ],
    )
}

fn garage_schema() -> ConfigurationSchema {
    ConfigurationSchema::new("Configure Your Garage", 7500.0)
        .with_option(OptionSpec::slider(
            "bays",
            "Number of Bays",
            SliderSpec::new(1.0, 4.0).with_unit("bays").as_unit_multiplier(),
        ))
        .with_option(OptionSpec::select(
            "beamSize",
            "Structural Beam Sizes",
            "6x6",
            [
                ("6x6", ValueSpec::new("6 inch x 6 inch", 0.0).per_unit()),
                ("7x7", ValueSpec::new("7 inch x 7 inch", 250.0).per_unit()),
                ("8x8", ValueSpec::new("8 inch x 8 inch", 500.0).per_unit()),
            ],
        ))
        .with_option(truss_option("straight", 150.0))
        .with_option(OptionSpec::select(
            "baySize",
            "Size Per Bay",
            "standard",
            [
                ("standard", ValueSpec::new("Standard (3m wide)", 0.0).per_unit()),
                ("large", ValueSpec::new("Large (3.5m wide)", 350.0).per_unit()),
            ],
        ))
        .with_option(OptionSpec::checkbox("catSlide", "Cat Slide Roof", 300.0, true))
}

fn gazebo_schema() -> ConfigurationSchema {
    ConfigurationSchema::new("Configure Your Gazebo", 2800.0)
        .with_option(truss_option("straight", 120.0))
        .with_option(OptionSpec::select(
            "legType",
            "Leg Type",
            "full",
            [
                ("full", ValueSpec::new("Full Height Legs", 0.0)),
                ("wall", ValueSpec::new("Wall Mount (Half Legs)", -150.0)),
            ],
        ))
        .with_option(OptionSpec::select(
            "sizeType",
            "Size Type",
            "3x3",
            [
                ("3x3", ValueSpec::new("3m x 3m", 0.0)),
                ("4x3", ValueSpec::new("4m x 3m", 250.0)),
                ("4x4", ValueSpec::new("4m x 4m", 450.0)),
            ],
        ))
        .with_option(OptionSpec::checkbox("lighting", "Lighting Kit", 200.0, false))
}

fn porch_schema() -> ConfigurationSchema {
    ConfigurationSchema::new("Configure Your Porch", 2000.0)
        // Porches ship with curved trusses unless the customer changes them
        .with_option(truss_option("curved", 0.0))
        .with_option(OptionSpec::select(
            "legType",
            "Leg Type",
            "floor",
            [
                ("floor", ValueSpec::new("Legs to Floor", 150.0)),
                ("wall", ValueSpec::new("Legs to Wall", 0.0)),
            ],
        ))
        .with_option(OptionSpec::select(
            "sizeType",
            "Size Type",
            "standard",
            [
                ("narrow", ValueSpec::new("Narrow (1.5m wide)", -200.0)),
                ("standard", ValueSpec::new("Standard (2m wide)", 0.0)),
                ("wide", ValueSpec::new("Wide (2.5m wide)", 400.0)),
            ],
        ))
}

// ============================================================================
// Catalog
// ============================================================================

/// Complete pricing configuration: schemas plus timber price tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Schemas for the additive categories
    #[serde(default)]
    pub schemas: BTreeMap<Category, ConfigurationSchema>,

    /// Oak beam rates per m3
    pub oak_beams: UnitPriceTable,

    /// Oak flooring rates per m2
    pub oak_flooring: UnitPriceTable,
}

impl Catalog {
    /// The built-in catalog used when no store is reachable.
    pub fn fallback() -> Self {
        Catalog {
            version: SCHEMA_VERSION.to_string(),
            schemas: Category::ALL
                .iter()
                .filter_map(|&c| fallback_schema(c).map(|s| (c, s)))
                .collect(),
            oak_beams: UnitPriceTable::oak_beams(),
            oak_flooring: UnitPriceTable::oak_flooring(),
        }
    }

    /// Schema for a category, if present
    pub fn schema(&self, category: Category) -> Option<&ConfigurationSchema> {
        self.schemas.get(&category)
    }

    /// Price table for a volume/area category
    pub fn price_table(&self, category: Category) -> Option<&UnitPriceTable> {
        match category.pricing_model() {
            PricingModel::Volume => Some(&self.oak_beams),
            PricingModel::Area => Some(&self.oak_flooring),
            PricingModel::Additive => None,
        }
    }

    /// Check a catalog file was written by a compatible release.
    ///
    /// Versions are `major.minor.patch`. The major part must equal ours. While
    /// the major part is 0 the minor part counts as breaking, so a file from a
    /// later minor release is refused; older minors and any patch level load.
    pub fn check_version(&self) -> PriceResult<()> {
        let parse = |v: &str| -> Option<(u32, u32)> {
            let mut parts = v.trim().split('.').map(|p| p.parse::<u32>().ok());
            let major = parts.next().flatten()?;
            let minor = parts.next().flatten().unwrap_or(0);
            Some((major, minor))
        };

        let compatible = match (parse(&self.version), parse(SCHEMA_VERSION)) {
            (Some((major, minor)), Some((ours_major, ours_minor))) => {
                major == ours_major && (ours_major != 0 || minor <= ours_minor)
            }
            _ => false,
        };

        if compatible {
            Ok(())
        } else {
            Err(PriceError::VersionMismatch {
                file_version: self.version.clone(),
                expected_version: SCHEMA_VERSION.to_string(),
            })
        }
    }

    /// Validate every schema in the catalog.
    pub fn validate(&self) -> PriceResult<()> {
        for (category, schema) in &self.schemas {
            if category.pricing_model() != PricingModel::Additive {
                return Err(PriceError::invalid_schema(
                    category.slug(),
                    "only garages, gazebos and porches are priced from a schema",
                ));
            }
            schema.validate()?;
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::fallback()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// A document store holding configurator schemas.
///
/// `Ok(None)` means the store has no document for the category; `Err` means
/// the store could not be read. Both send the resolver to its fallback.
///
/// Sources must be `Send + Sync` so one resolver can serve concurrent requests.
pub trait ConfigSource: Send + Sync {
    fn fetch_schema(&self, category: Category) -> PriceResult<Option<ConfigurationSchema>>;
}

impl ConfigSource for Catalog {
    fn fetch_schema(&self, category: Category) -> PriceResult<Option<ConfigurationSchema>> {
        Ok(self.schema(category).cloned())
    }
}

/// Where a resolved schema came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaOrigin {
    Store,
    Fallback,
}

/// A schema plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    pub schema: ConfigurationSchema,
    pub origin: SchemaOrigin,
}

/// Picks the schema each configurator prices with: store first, then fallback.
pub struct SchemaResolver {
    store: Option<Box<dyn ConfigSource>>,
    fallback: Catalog,
}

impl SchemaResolver {
    /// A resolver with no store attached.
    pub fn new(fallback: Catalog) -> Self {
        SchemaResolver { store: None, fallback }
    }

    /// Attach a document store (builder style).
    pub fn with_store(mut self, store: impl ConfigSource + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// The fallback catalog
    pub fn fallback(&self) -> &Catalog {
        &self.fallback
    }

    /// Resolve the schema for a category.
    ///
    /// Store errors and invalid store documents are logged and the fallback is
    /// used instead; `None` is returned only when neither has a schema.
    pub fn resolve(&self, category: Category) -> Option<ResolvedSchema> {
        if let Some(store) = &self.store {
            match store.fetch_schema(category) {
                Ok(Some(schema)) => match schema.validate() {
                    Ok(()) => {
                        debug!(category = category.slug(), "using stored configuration");
                        return Some(ResolvedSchema {
                            schema,
                            origin: SchemaOrigin::Store,
                        });
                    }
                    Err(e) => warn!(category = category.slug(), error = %e, "stored configuration is invalid"),
                },
                Ok(None) => debug!(category = category.slug(), "no stored configuration"),
                Err(e) => warn!(category = category.slug(), error = %e, "configuration store unavailable"),
            }
        }

        let schema = self.fallback.schema(category).cloned()?;
        warn!(category = category.slug(), "using fallback configuration");
        Some(ResolvedSchema {
            schema,
            origin: SchemaOrigin::Fallback,
        })
    }

    /// Resolve and drop the origin.
    pub fn schema(&self, category: Category) -> Option<ConfigurationSchema> {
        self.resolve(category).map(|r| r.schema)
    }

    /// Price table for beams or flooring from the fallback catalog.
    pub fn price_table(&self, category: Category) -> Option<&UnitPriceTable> {
        self.fallback.price_table(category)
    }
}
