// 🗺️ MapView - catalog + projected markers + page settings
//
// Control flow is one-way: Catalog → MarkerProjector → PopupRenderer → page.
// A MapView is built once and only read afterwards.

use crate::catalog::Catalog;
use crate::config::MapConfig;
use crate::error::Result;
use crate::marker::{LatLng, Marker, MarkerProjector};
use askama::Template;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Everything the browser page needs to draw the map
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<'a> {
    pub title: &'a str,
    pub center: LatLng,
    pub zoom: u8,
    pub tiles: TileLayer<'a>,
    pub markers: &'a [Marker],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer<'a> {
    pub url: &'a str,
    pub attribution: &'a str,
    pub max_zoom: u8,
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapPageTemplate<'a> {
    title: &'a str,
    view_json: String,
}

#[derive(Debug, Clone)]
pub struct MapView {
    config: MapConfig,
    catalog: Catalog,
    markers: Vec<Marker>,
}

impl MapView {
    pub fn build(catalog: Catalog, config: MapConfig) -> Result<Self> {
        config.validate()?;
        let projector = MarkerProjector::from_config(&config)?;
        let markers = projector.project_all(&catalog)?;

        info!(shops = catalog.len(), markers = markers.len(), "map view ready");

        Ok(MapView {
            config,
            catalog,
            markers,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: usize) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn page_data(&self) -> PageData<'_> {
        PageData {
            title: &self.config.map.title,
            center: LatLng::new(self.config.map.center[0], self.config.map.center[1]),
            zoom: self.config.map.zoom,
            tiles: TileLayer {
                url: &self.config.tiles.url,
                attribution: &self.config.tiles.attribution,
                max_zoom: self.config.tiles.max_zoom,
            },
            markers: &self.markers,
        }
    }

    /// Full standalone HTML page
    pub fn render_page(&self) -> Result<String> {
        let json = serde_json::to_string(&self.page_data())?;
        let page = MapPageTemplate {
            title: &self.config.map.title,
            view_json: script_safe(&json),
        };
        Ok(page.render()?)
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        let html = self.render_page()?;
        std::fs::write(path, html)?;
        info!(path = %path.display(), markers = self.markers.len(), "exported map page");
        Ok(())
    }
}

/// JSON is embedded in a <script> block; `<` only occurs inside strings,
/// where the unicode escape parses to the same value.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}
