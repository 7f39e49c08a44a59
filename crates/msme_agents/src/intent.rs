//! Keyword-rule intent detection. A closed rule table, checked in
//! priority order; unmatched queries default to company matching.

use msme_core::Intent;

const FINANCIAL_KEYWORDS: &[&str] = &[
    "financial", "revenue", "profit", "ratios", "roa", "roe", "debt", "equity", "stock",
    "margin", "valuation",
];

const NEWS_KEYWORDS: &[&str] = &[
    "news", "latest", "recent", "update", "headline", "policy", "government", "announcement",
];

const DASHBOARD_KEYWORDS: &[&str] = &[
    "dashboard", "chart", "charts", "visualize", "visualization", "graph", "plot", "overview",
];

const MARKET_KEYWORDS: &[&str] = &[
    "market", "trend", "trends", "growth", "strategy", "expansion", "opportunity", "industry",
];

const COMPANY_KEYWORDS: &[&str] = &[
    "company", "companies", "msme", "msmes", "supplier", "suppliers", "find", "match", "list",
];

fn hits(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}

pub fn detect_intent(query: &str) -> Intent {
    let query = query.to_lowercase();

    if hits(&query, DASHBOARD_KEYWORDS) {
        return Intent::Dashboard;
    }
    // Company wording wins over the broader financial/market vocabularies
    // so "find healthcare companies" matches companies, not markets.
    if hits(&query, COMPANY_KEYWORDS) {
        return Intent::CompanyMatch;
    }
    if hits(&query, FINANCIAL_KEYWORDS) {
        return Intent::Financial;
    }
    if hits(&query, NEWS_KEYWORDS) {
        return Intent::News;
    }
    if hits(&query, MARKET_KEYWORDS) {
        return Intent::Market;
    }
    Intent::CompanyMatch
}

/// Sector vocabulary recognized in queries, used for matcher bonuses.
const SECTOR_KEYWORDS: &[&str] = &[
    "manufacturing", "textile", "textiles", "chemical", "chemicals", "pharmaceutical", "pharma",
    "food", "technology", "software", "packaging", "automotive", "electronics", "engineering",
    "construction", "healthcare", "medical", "biotech", "agriculture", "energy", "steel",
    "plastic", "leather", "garments", "furniture", "paper", "tourism", "retail", "logistics",
    "banking", "finance", "insurance", "education", "services",
];

const LOCATION_KEYWORDS: &[&str] = &[
    "tamil nadu", "chennai", "coimbatore", "maharashtra", "mumbai", "pune", "nagpur", "gujarat",
    "ahmedabad", "surat", "karnataka", "bangalore", "delhi", "noida", "gurgaon", "west bengal",
    "kolkata", "rajasthan", "jaipur", "uttar pradesh", "lucknow", "kanpur", "hyderabad",
    "telangana", "kerala", "kochi", "punjab", "ludhiana", "haryana", "bhopal", "indore",
];

pub fn extract_sectors(query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    SECTOR_KEYWORDS
        .iter()
        .filter(|s| query.contains(*s))
        .map(|s| s.to_string())
        .collect()
}

pub fn extract_locations(query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    LOCATION_KEYWORDS
        .iter()
        .filter(|l| query.contains(*l))
        .map(|l| l.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_queries_detected() {
        assert_eq!(
            detect_intent("Find healthcare companies with good export performance"),
            Intent::CompanyMatch
        );
        assert_eq!(detect_intent("list MSMEs in Chennai"), Intent::CompanyMatch);
    }

    #[test]
    fn other_intents_detected() {
        assert_eq!(detect_intent("latest news on textile policy"), Intent::News);
        assert_eq!(detect_intent("revenue and profit ratios"), Intent::Financial);
        assert_eq!(detect_intent("show me a dashboard"), Intent::Dashboard);
        assert_eq!(detect_intent("market trends for steel"), Intent::Market);
    }

    #[test]
    fn unmatched_defaults_to_company_match() {
        assert_eq!(detect_intent("hello there"), Intent::CompanyMatch);
    }

    #[test]
    fn sector_and_location_extraction() {
        let sectors = extract_sectors("healthcare and textile exporters in Chennai");
        assert!(sectors.contains(&"healthcare".to_string()));
        assert!(sectors.contains(&"textile".to_string()));
        assert_eq!(
            extract_locations("suppliers in chennai and pune"),
            vec!["chennai", "pune"]
        );
    }
}
