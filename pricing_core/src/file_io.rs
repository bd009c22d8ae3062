//! # File I/O Module
//!
//! Handles catalog files and on-disk configurator documents:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility
//! - **Document directories**: One `<slug>.json` per category, read as a
//!   [`ConfigSource`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use pricing_core::catalog::Catalog;
//! use pricing_core::file_io::{load_catalog, save_catalog};
//! use std::path::Path;
//!
//! let path = Path::new("catalog.json");
//! save_catalog(&Catalog::fallback(), path).unwrap();
//!
//! let catalog = load_catalog(path).unwrap();
//! assert_eq!(catalog.schemas.len(), 3);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, Category, ConfigSource};
use crate::errors::{PriceError, PriceResult};
use crate::schema::ConfigurationSchema;

/// Save a catalog, replacing `path` only once the new contents are on disk.
///
/// An interrupted save leaves the previous file untouched and at worst a
/// stray `<path>.tmp` beside it.
pub fn save_catalog(catalog: &Catalog, path: &Path) -> PriceResult<()> {
    let json = serde_json::to_string_pretty(catalog)?;
    write_atomic(path, json.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> PriceResult<()> {
    let tmp_path = tmp_path_for(path);
    let fail = |op: &str, at: &Path, e: std::io::Error| PriceError::file_error(op, at.display().to_string(), e.to_string());

    let written = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .map_err(|e| fail("write temp file", &tmp_path, e));

    let result = written.and_then(|()| fs::rename(&tmp_path, path).map_err(|e| fail("replace", path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Load a catalog from a file.
///
/// # Returns
///
/// * `Ok(Catalog)` - Loaded and every schema validated
/// * `Err(PriceError::VersionMismatch)` - File version is incompatible
/// * `Err(PriceError::SerializationError)` - Invalid JSON
/// * `Err(PriceError::InvalidSchema)` - A schema is inconsistent
/// * `Err(PriceError::FileError)` - I/O error
pub fn load_catalog(path: &Path) -> PriceResult<Catalog> {
    let contents = read_to_string(path)?;

    let catalog: Catalog = serde_json::from_str(&contents).map_err(|e| PriceError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    catalog.check_version()?;
    catalog.validate()?;

    Ok(catalog)
}

/// Directory of configurator documents, one `<slug>.json` per category.
///
/// Mirrors the `product_configurators` collection on disk. A missing file
/// means "no document", not an error.
#[derive(Debug, Clone)]
pub struct DocumentDirectory {
    root: PathBuf,
}

impl DocumentDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DocumentDirectory { root: root.into() }
    }

    /// Path of the document for a category
    pub fn document_path(&self, category: Category) -> PathBuf {
        self.root.join(format!("{}.json", category.slug()))
    }
}

impl ConfigSource for DocumentDirectory {
    fn fetch_schema(&self, category: Category) -> PriceResult<Option<ConfigurationSchema>> {
        let path = self.document_path(category);
        if !path.exists() {
            return Ok(None);
        }
        let contents = read_to_string(&path)?;
        let schema = serde_json::from_str(&contents).map_err(|e| PriceError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
        Ok(Some(schema))
    }
}

fn read_to_string(path: &Path) -> PriceResult<String> {
    let mut file =
        File::open(path).map_err(|e| PriceError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PriceError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
