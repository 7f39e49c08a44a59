use std::collections::HashMap;
use std::path::Path;

use msme_core::{text, Company, Result};
use msme_storage::Repository;
use serde::Serialize;
use tracing::{info, warn};

/// Counts reported back to the caller after a load. Loading the same
/// file twice yields the same company count because upserts are keyed
/// by the company name slug.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

impl LoadReport {
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.skipped += other.skipped;
    }
}

/// Reads supplier/financial CSVs, maps the exported column spellings to
/// canonical field names and upserts each row into the company
/// collection. Malformed numerics become `None`, never a failed load.
pub struct CsvLoader;

impl CsvLoader {
    pub async fn load(repo: &Repository, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| msme_core::Error::Validation(format!("cannot read {}: {}", path.display(), e)))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| msme_core::Error::Validation(format!("bad CSV header: {}", e)))?
            .iter()
            .map(canonical_field)
            .collect();

        let mut report = LoadReport::default();
        for record in reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "skipping malformed CSV row");
                    report.skipped += 1;
                    continue;
                }
            };

            let row: HashMap<&str, &str> = headers
                .iter()
                .map(String::as_str)
                .zip(record.iter())
                .filter(|(_, v)| !v.is_empty() && !v.eq_ignore_ascii_case("nan"))
                .collect();

            match company_from_row(&row) {
                Some(company) => {
                    repo.upsert_company(&company).await?;
                    report.loaded += 1;
                }
                None => report.skipped += 1,
            }
        }

        info!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "CSV load complete"
        );
        Ok(report)
    }
}

/// Maps the seed files' column spellings (several variants exist across
/// the four CSVs) onto one canonical name each.
fn canonical_field(header: &str) -> String {
    let normalized = header.trim().to_lowercase().replace(['-', '_'], " ");
    let collapsed: String = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.as_str() {
        "company name" => "name",
        "sector" => "sector",
        "location" => "location",
        "primary products" => "primary_products",
        "description" => "description",
        "total revenue (in cr)" | "total revenue(in cr)" | "total revenue" => "revenue",
        "net profit margin" | "gross profit margin" => "profit_margin",
        "sales growth" => "sales_growth",
        "debt to equity ratio" | "debt to equity" => "debt_to_equity",
        "export markets" => "export_markets",
        "overall performance score" => "performance",
        other => return other.replace(' ', "_"),
    }
    .to_string()
}

fn parse_number(raw: Option<&&str>) -> Option<f64> {
    raw.and_then(|v| v.trim_end_matches('%').trim().parse::<f64>().ok())
}

fn company_from_row(row: &HashMap<&str, &str>) -> Option<Company> {
    let name = row.get("name")?.to_string();
    if name.is_empty() {
        return None;
    }

    let sector = row.get("sector").unwrap_or(&"").to_string();
    let location = row.get("location").unwrap_or(&"").to_string();
    let primary_products = row.get("primary_products").unwrap_or(&"").to_string();
    let description = row.get("description").unwrap_or(&"").to_string();

    let export_markets: Vec<String> = row
        .get("export_markets")
        .map(|v| {
            v.split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let keyword_text = format!("{} {} {} {}", name, sector, primary_products, location);

    Some(Company {
        id: text::slug(&name),
        name,
        sector,
        location,
        primary_products,
        revenue: parse_number(row.get("revenue")),
        profit_margin: parse_number(row.get("profit_margin")),
        sales_growth: parse_number(row.get("sales_growth")),
        debt_to_equity: parse_number(row.get("debt_to_equity")),
        export_markets,
        performance: row.get("performance").map(|v| v.to_string()),
        description,
        keywords: text::keywords(&keyword_text),
    })
}
