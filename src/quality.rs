// ✅ Catalog Audit - offline data-quality report
//
// Rendering never validates records; bad coordinates are placed as given and
// dead links fail in the browser. This audit lets curators catch those before
// shipping a catalog.

use crate::catalog::{Catalog, ShopRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Marker would be misplaced or unlabeled
    Warning,  // Popup content is degraded
    Info,     // Permitted, but worth a look
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIssue {
    /// Position in the catalog
    pub index: usize,
    pub shop: String,
    pub field: String,
    pub severity: Severity,
    pub message: String,
}

impl CatalogIssue {
    fn new(
        index: usize,
        shop: &ShopRecord,
        field: &str,
        severity: Severity,
        message: String,
    ) -> Self {
        CatalogIssue {
            index,
            shop: shop.name.clone(),
            field: field.to_string(),
            severity,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub shop_count: usize,
    pub issues: Vec<CatalogIssue>,
}

impl QualityReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} shops, {} issues ({} critical, {} warnings, {} info)",
            self.shop_count,
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::Warning),
            self.count(Severity::Info),
        )
    }
}

pub fn audit(catalog: &Catalog) -> QualityReport {
    let mut issues = Vec::new();

    for (index, shop) in catalog.iter().enumerate() {
        check_name(index, shop, &mut issues);
        check_address(index, shop, &mut issues);
        check_coordinates(index, shop, &mut issues);
        check_maps_url(index, shop, &mut issues);
    }
    check_duplicate_positions(catalog, &mut issues);

    QualityReport {
        shop_count: catalog.len(),
        issues,
    }
}

fn check_name(index: usize, shop: &ShopRecord, issues: &mut Vec<CatalogIssue>) {
    if shop.name.trim().is_empty() {
        issues.push(CatalogIssue::new(
            index,
            shop,
            "name",
            Severity::Critical,
            "name is empty".to_string(),
        ));
    }
}

fn check_address(index: usize, shop: &ShopRecord, issues: &mut Vec<CatalogIssue>) {
    if shop.address.trim().is_empty() {
        issues.push(CatalogIssue::new(
            index,
            shop,
            "address",
            Severity::Warning,
            "address is empty".to_string(),
        ));
    }
}

fn check_coordinates(index: usize, shop: &ShopRecord, issues: &mut Vec<CatalogIssue>) {
    if !shop.lat.is_finite() || !(-90.0..=90.0).contains(&shop.lat) {
        issues.push(CatalogIssue::new(
            index,
            shop,
            "lat",
            Severity::Critical,
            format!("latitude {} outside [-90, 90]", shop.lat),
        ));
    }
    if !shop.lng.is_finite() || !(-180.0..=180.0).contains(&shop.lng) {
        issues.push(CatalogIssue::new(
            index,
            shop,
            "lng",
            Severity::Critical,
            format!("longitude {} outside [-180, 180]", shop.lng),
        ));
    }
}

fn check_maps_url(index: usize, shop: &ShopRecord, issues: &mut Vec<CatalogIssue>) {
    let problem = match Url::parse(&shop.maps_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => None,
        Ok(url) => Some(format!("mapsUrl uses unsupported scheme '{}'", url.scheme())),
        Err(e) => Some(format!("mapsUrl is not an absolute URL: {}", e)),
    };

    if let Some(message) = problem {
        issues.push(CatalogIssue::new(index, shop, "mapsUrl", Severity::Warning, message));
    }
}

fn check_duplicate_positions(catalog: &Catalog, issues: &mut Vec<CatalogIssue>) {
    // Keyed on the exact bit pattern: only identical coordinates overlap
    let mut first_at: HashMap<(u64, u64), usize> = HashMap::new();

    for (index, shop) in catalog.iter().enumerate() {
        let key = (shop.lat.to_bits(), shop.lng.to_bits());
        match first_at.get(&key) {
            Some(&first) => issues.push(CatalogIssue::new(
                index,
                shop,
                "lat/lng",
                Severity::Info,
                format!("same position as shop #{}, markers will overlap", first),
            )),
            None => {
                first_at.insert(key, index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(shops: Vec<ShopRecord>) -> Catalog {
        Catalog::from_records(shops)
    }

    #[test]
    fn test_clean_catalog() {
        let report = audit(&catalog(vec![
            ShopRecord::new("X", "Y st.", 41.00, 28.97, "https://maps.example/x"),
            ShopRecord::new("Z", "W st.", 41.01, 28.99, "http://maps.example/z"),
        ]));

        assert!(report.is_clean());
        assert!(!report.has_critical_issues());
        assert_eq!(report.shop_count, 2);
    }

    #[test]
    fn test_embedded_catalog_is_clean() {
        let report = audit(&Catalog::embedded().unwrap());
        assert!(report.is_clean(), "{:?}", report.issues);
    }

    #[test]
    fn test_empty_catalog_is_clean() {
        let report = audit(&Catalog::empty());
        assert!(report.is_clean());
        assert_eq!(report.summary(), "0 shops, 0 issues (0 critical, 0 warnings, 0 info)");
    }

    #[test]
    fn test_out_of_range_coordinates_are_critical() {
        let report = audit(&catalog(vec![
            ShopRecord::new("Polar", "Ice", 91.0, 0.0, "https://m/p"),
            ShopRecord::new("Dateline", "Sea", 0.0, -180.5, "https://m/d"),
            ShopRecord::new("Broken", "?", f64::NAN, 10.0, "https://m/b"),
        ]));

        assert_eq!(report.count(Severity::Critical), 3);
        assert!(report.has_critical_issues());
        let fields: Vec<&str> = report.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["lat", "lng", "lat"]);
    }

    #[test]
    fn test_boundary_coordinates_are_fine() {
        let report = audit(&catalog(vec![
            ShopRecord::new("North", "a", 90.0, 180.0, "https://m/n"),
            ShopRecord::new("South", "b", -90.0, -180.0, "https://m/s"),
        ]));
        assert!(report.is_clean());
    }

    #[test]
    fn test_blank_name_and_address() {
        let report = audit(&catalog(vec![ShopRecord::new("  ", "", 1.0, 1.0, "https://m/x")]));

        assert_eq!(report.count(Severity::Critical), 1);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.issues[0].field, "name");
        assert_eq!(report.issues[1].field, "address");
    }

    #[test]
    fn test_bad_urls_are_warnings() {
        let report = audit(&catalog(vec![
            ShopRecord::new("Relative", "a", 1.0, 1.0, "/maps/x"),
            ShopRecord::new("Mail", "b", 2.0, 2.0, "mailto:shop@example.com"),
        ]));

        assert_eq!(report.count(Severity::Warning), 2);
        assert!(!report.has_critical_issues());
        assert!(report.issues[1].message.contains("mailto"));
    }

    #[test]
    fn test_duplicate_positions_are_info() {
        let report = audit(&catalog(vec![
            ShopRecord::new("A", "a", 41.02, 28.98, "https://m/a"),
            ShopRecord::new("B", "b", 41.03, 28.98, "https://m/b"),
            ShopRecord::new("C", "c", 41.02, 28.98, "https://m/c"),
        ]));

        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.index, 2);
        assert_eq!(issue.shop, "C");
        assert!(issue.message.contains("#0"));
    }
}
