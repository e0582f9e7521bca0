// 📥 CSV Import - spreadsheet → static catalog asset
//
// Columns: name,address,lat,lng,mapsUrl. A blank or missing mapsUrl is
// replaced by a maps search link for "name, address".

use crate::catalog::{Catalog, ShopRecord};
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

#[derive(Debug, Deserialize)]
struct CsvShopRow {
    name: String,
    address: String,
    lat: f64,
    lng: f64,
    #[serde(rename = "mapsUrl", default)]
    maps_url: Option<String>,
}

impl CsvShopRow {
    fn into_record(self) -> ShopRecord {
        let maps_url = match self.maps_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                debug!(shop = %self.name, "generating maps search link");
                maps_search_url(&self.name, &self.address)
            }
        };

        ShopRecord {
            name: self.name,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
            maps_url,
        }
    }
}

/// Search link for a shop that has no curated maps URL
pub fn maps_search_url(name: &str, address: &str) -> String {
    let query = if address.trim().is_empty() {
        name.to_string()
    } else {
        format!("{}, {}", name, address)
    };
    format!("{}{}", MAPS_SEARCH_BASE, urlencoding::encode(&query))
}

pub fn load_csv_reader<R: Read>(reader: R) -> Result<Vec<ShopRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut shops = Vec::new();
    for row in rdr.deserialize() {
        let row: CsvShopRow = row?;
        shops.push(row.into_record());
    }

    Ok(shops)
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<ShopRecord>> {
    let file = std::fs::File::open(csv_path)?;
    let shops = load_csv_reader(file)?;
    info!(path = %csv_path.display(), shops = shops.len(), "read shops from CSV");
    Ok(shops)
}

/// Convert a CSV file into the JSON asset format. Returns the imported catalog.
pub fn import_csv(csv_path: &Path, out_path: &Path) -> Result<Catalog> {
    let catalog = Catalog::from_records(load_csv(csv_path)?);
    std::fs::write(out_path, catalog.to_json_pretty()? + "\n")?;
    info!(path = %out_path.display(), shops = catalog.len(), "wrote catalog");
    Ok(catalog)
}
