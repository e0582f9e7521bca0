// 🍫 Shop Catalog - immutable, loaded-once list of chocolate shops
//
// The catalog is a static asset bundled at build time. It can be swapped for
// a file on disk, but once loaded it is never mutated: clones share the same
// backing slice.

use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Catalog bundled into the binary
pub const EMBEDDED_CATALOG: &str = include_str!("../data/shops.json");

// ============================================================================
// SHOP RECORD
// ============================================================================

/// One chocolate shop as it appears in the static data asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRecord {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,

    /// Outbound link to an external maps service (not validated here)
    #[serde(rename = "mapsUrl")]
    pub maps_url: String,
}

impl ShopRecord {
    pub fn new(name: &str, address: &str, lat: f64, lng: f64, maps_url: &str) -> Self {
        ShopRecord {
            name: name.to_string(),
            address: address.to_string(),
            lat,
            lng,
            maps_url: maps_url.to_string(),
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered, read-only sequence of shops
#[derive(Debug, Clone)]
pub struct Catalog {
    shops: Arc<[ShopRecord]>,
}

impl Catalog {
    pub fn from_records(shops: Vec<ShopRecord>) -> Self {
        Catalog {
            shops: shops.into(),
        }
    }

    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// Parse a JSON array of shop records. Any malformed entry fails the whole load.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let shops: Vec<ShopRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(shops))
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        let catalog = Self::from_json_str(EMBEDDED_CATALOG)?;
        debug!(shops = catalog.len(), "loaded embedded catalog");
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            MapError::catalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(path = %path.display(), shops = catalog.len(), "loaded catalog from file");
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise fall back to the embedded asset
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::embedded(),
        }
    }

    pub fn len(&self) -> usize {
        self.shops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShopRecord> {
        self.shops.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShopRecord> {
        self.shops.iter()
    }

    pub fn shops(&self) -> &[ShopRecord] {
        &self.shops
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.shops)?)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ShopRecord;
    type IntoIter = std::slice::Iter<'a, ShopRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
