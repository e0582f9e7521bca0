// 📍 Marker Projector - shop record → marker descriptor
//
// Every shop becomes exactly one marker at its own coordinate, in catalog
// order, all sharing one emoji icon. Coordinates are copied as-is: no
// clamping, no deduplication, no clustering.

use crate::catalog::{Catalog, ShopRecord};
use crate::config::{MapConfig, MarkerSettings};
use crate::error::Result;
use crate::popup::{Popup, PopupRenderer};
use askama::Template;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl From<&ShopRecord> for LatLng {
    fn from(shop: &ShopRecord) -> Self {
        LatLng::new(shop.lat, shop.lng)
    }
}

// ============================================================================
// ICON
// ============================================================================

#[derive(Template)]
#[template(path = "icon.html")]
struct IconTemplate<'a> {
    glyph: &'a str,
    font_size: &'a str,
}

/// HTML icon drawn by the mapping widget, anchored at its bottom centre
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivIcon {
    pub class_name: String,
    pub glyph: String,
    pub html: String,
    pub icon_size: [i32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl DivIcon {
    pub fn new(glyph: &str, font_size: &str, size: u32) -> Result<Self> {
        let html = IconTemplate { glyph, font_size }.render()?;
        let side = size as i32;

        Ok(DivIcon {
            class_name: "custom-icon".to_string(),
            glyph: glyph.to_string(),
            html,
            icon_size: [side, side],
            icon_anchor: [side / 2, side],
            popup_anchor: [0, -side],
        })
    }

    pub fn from_settings(settings: &MarkerSettings) -> Result<Self> {
        Self::new(&settings.glyph, &settings.font_size, settings.size)
    }
}

// ============================================================================
// MARKER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Position of the shop in the catalog
    pub id: usize,
    pub position: LatLng,
    pub icon: DivIcon,
    pub popup: Popup,
    pub popup_html: String,
}

#[derive(Debug, Clone)]
pub struct MarkerProjector {
    icon: DivIcon,
    popups: PopupRenderer,
}

impl MarkerProjector {
    pub fn new(icon: DivIcon, popups: PopupRenderer) -> Self {
        MarkerProjector { icon, popups }
    }

    pub fn from_config(config: &MapConfig) -> Result<Self> {
        Ok(Self::new(
            DivIcon::from_settings(&config.marker)?,
            PopupRenderer::from_settings(&config.popup),
        ))
    }

    pub fn project(&self, id: usize, shop: &ShopRecord) -> Result<Marker> {
        let popup = self.popups.render(shop);
        let popup_html = popup.to_html()?;

        Ok(Marker {
            id,
            position: LatLng::from(shop),
            icon: self.icon.clone(),
            popup,
            popup_html,
        })
    }

    pub fn project_all(&self, catalog: &Catalog) -> Result<Vec<Marker>> {
        catalog
            .iter()
            .enumerate()
            .map(|(id, shop)| self.project(id, shop))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> MarkerProjector {
        MarkerProjector::from_config(&MapConfig::default()).unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_records(vec![
            ShopRecord::new("X", "Y st.", 41.00, 28.97, "https://maps.example/x"),
            ShopRecord::new("Twin A", "Same corner", 41.02, 28.98, "https://maps.example/a"),
            ShopRecord::new("Twin B", "Same corner", 41.02, 28.98, "https://maps.example/b"),
        ])
    }

    #[test]
    fn test_default_icon_geometry() {
        let icon = DivIcon::from_settings(&MarkerSettings::default()).unwrap();
        assert_eq!(icon.glyph, "🍫");
        assert_eq!(icon.icon_size, [48, 48]);
        assert_eq!(icon.icon_anchor, [24, 48]);
        assert_eq!(icon.popup_anchor, [0, -48]);
        assert!(icon.html.contains("font-size: 2.2rem"));
        assert!(icon.html.contains("🍫"));
    }

    #[test]
    fn test_marker_sits_exactly_on_record() {
        let projector = projector();
        let shop = ShopRecord::new("X", "Y st.", 41.00, 28.97, "https://maps.example/x");
        let marker = projector.project(0, &shop).unwrap();

        assert_eq!(marker.position, LatLng::new(41.00, 28.97));
        assert_eq!(marker.icon.glyph, "🍫");
        assert_eq!(marker.popup.title, "X");
        assert!(marker.popup_html.contains("<b>X</b>"));
    }

    #[test]
    fn test_one_marker_per_record_in_order() {
        let catalog = sample_catalog();
        let markers = projector().project_all(&catalog).unwrap();

        assert_eq!(markers.len(), catalog.len());
        for (i, (marker, shop)) in markers.iter().zip(catalog.iter()).enumerate() {
            assert_eq!(marker.id, i);
            assert_eq!(marker.position.lat, shop.lat);
            assert_eq!(marker.position.lng, shop.lng);
            assert_eq!(marker.popup.link.href, shop.maps_url);
        }
    }

    #[test]
    fn test_duplicate_coordinates_both_render() {
        let markers = projector().project_all(&sample_catalog()).unwrap();
        assert_eq!(markers[1].position, markers[2].position);
        assert_ne!(markers[1].popup.link.href, markers[2].popup.link.href);
    }

    #[test]
    fn test_empty_catalog_projects_nothing() {
        let markers = projector().project_all(&Catalog::empty()).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn test_out_of_range_coordinates_are_not_corrected() {
        let shop = ShopRecord::new("Nowhere", "?", 123.0, -400.0, "https://m/n");
        let marker = projector().project(0, &shop).unwrap();
        assert_eq!(marker.position, LatLng::new(123.0, -400.0));
    }

    #[test]
    fn test_marker_json_shape() {
        let shop = ShopRecord::new("X", "Y st.", 41.0, 28.97, "https://maps.example/x");
        let marker = projector().project(3, &shop).unwrap();
        let json = serde_json::to_value(&marker).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["position"]["lat"], 41.0);
        assert_eq!(json["icon"]["iconAnchor"][1], 48);
        assert_eq!(json["popup"]["link"]["href"], "https://maps.example/x");
        assert!(json["popupHtml"].as_str().unwrap().contains("<b>X</b>"));
    }
}
