// ⚙️ Map configuration - TOML file with a default for every field
//
// Defaults: Istanbul centre, zoom 12,
// HOT OSM tiles, 48px chocolate emoji marker.

use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Highest zoom level the tile source is expected to serve
pub const MAX_ZOOM: u8 = 19;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub map: MapSettings,
    pub tiles: TileSettings,
    pub marker: MarkerSettings,
    pub popup: PopupSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub title: String,
    /// [lat, lng]
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        MapSettings {
            title: "🍫 Dubai Chocolate Map 🌿".to_string(),
            center: [41.0082, 28.9784],
            zoom: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSettings {
    pub url: String,
    /// Rendered as HTML by the mapping widget
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileSettings {
    fn default() -> Self {
        TileSettings {
            url: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/\">OSM</a>".to_string(),
            max_zoom: MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub glyph: String,
    /// CSS font-size of the glyph
    pub font_size: String,
    /// Square icon box in pixels
    pub size: u32,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        MarkerSettings {
            glyph: "🍫".to_string(),
            font_size: "2.2rem".to_string(),
            size: 48,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    pub link_caption: String,
}

impl Default for PopupSettings {
    fn default() -> Self {
        PopupSettings {
            link_caption: "📍 Open in Maps".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Replace the embedded catalog with this JSON file
    pub path: Option<PathBuf>,
}

impl MapConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MapConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MapError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded map config");
        Ok(config)
    }

    /// Read `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let [lat, lng] = self.map.center;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MapError::config(format!("map.center latitude {} out of range", lat)));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(MapError::config(format!("map.center longitude {} out of range", lng)));
        }
        if self.tiles.max_zoom > MAX_ZOOM {
            return Err(MapError::config(format!(
                "tiles.max_zoom {} exceeds {}",
                self.tiles.max_zoom, MAX_ZOOM
            )));
        }
        if self.map.zoom > self.tiles.max_zoom {
            return Err(MapError::config(format!(
                "map.zoom {} exceeds tiles.max_zoom {}",
                self.map.zoom, self.tiles.max_zoom
            )));
        }
        if self.tiles.url.trim().is_empty() {
            return Err(MapError::config("tiles.url must not be empty"));
        }
        if self.marker.size == 0 {
            return Err(MapError::config("marker.size must be positive"));
        }
        if self.marker.glyph.is_empty() {
            return Err(MapError::config("marker.glyph must not be empty"));
        }
        Ok(())
    }
}
