// Chocolate Map - Core Library
// Catalog → markers → popups, shared by the CLI and the terminal viewer

pub mod catalog;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod marker;
pub mod popup;
pub mod quality;
pub mod view;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use catalog::{Catalog, ShopRecord, EMBEDDED_CATALOG};
pub use config::MapConfig;
pub use error::{MapError, Result};
pub use import::{import_csv, load_csv, maps_search_url};
pub use marker::{DivIcon, LatLng, Marker, MarkerProjector};
pub use popup::{OutboundLink, Popup, PopupRenderer};
pub use quality::{audit, CatalogIssue, QualityReport, Severity};
pub use view::MapView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load config and catalog, then project the view. The catalog path in the
/// config wins over the embedded asset; an explicit `catalog` argument wins
/// over both.
pub fn load_view(
    config_path: Option<&std::path::Path>,
    catalog_path: Option<&std::path::Path>,
) -> Result<MapView> {
    let config = MapConfig::load_or_default(config_path)?;
    let catalog_path = catalog_path.or(config.catalog.path.as_deref());
    let catalog = Catalog::open(catalog_path)?;
    MapView::build(catalog, config)
}
