//! Deterministic approximations used when the agent runtime is
//! unavailable. The formulas are intentionally simple keyword and ratio
//! arithmetic; they preserve the response shape of the agent path.

use msme_core::{AgentRole, Company, Insight, NewsArticle};

use crate::intent::{extract_locations, extract_sectors};
use crate::role::recommended_charts;

const POSITIVE_WORDS: &[&str] = &[
    "growth", "profit", "rise", "rises", "gain", "boost", "surge", "record", "strong", "export",
    "expansion", "opportunity", "win", "recovery", "improve",
];

const NEGATIVE_WORDS: &[&str] = &[
    "loss", "decline", "fall", "falls", "drop", "weak", "risk", "crisis", "slump", "layoff",
    "shortage", "default", "downturn", "shrink",
];

/// Keyword-count sentiment in [-1, 1]; 0 when no signal words appear.
pub fn sentiment_score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as f64;
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as f64;
    if positive + negative == 0.0 {
        return 0.0;
    }
    ((positive - negative) / (positive + negative)).clamp(-1.0, 1.0)
}

/// Ratio-arithmetic financial health in [0, 100]: margin and growth push
/// the score up, leverage pulls it down.
pub fn financial_health(company: &Company) -> f64 {
    let margin = company.profit_margin.unwrap_or(0.0);
    let growth = company.sales_growth.unwrap_or(0.0);
    let leverage = company.debt_to_equity.unwrap_or(1.0);

    let score = 50.0 + margin * 1.5 + growth - leverage * 10.0;
    score.clamp(0.0, 100.0)
}

/// Keyword similarity plus sector/location/export bonuses, ranked
/// descending. The export bonus only applies when the query itself asks
/// about exports.
pub fn rank_companies(query: &str, companies: &[Company]) -> Vec<(Company, f64)> {
    let sectors = extract_sectors(query);
    let locations = extract_locations(query);
    let query_lower = query.to_lowercase();
    let wants_exports = query_lower.contains("export");

    let mut ranked: Vec<(Company, f64)> = companies
        .iter()
        .map(|company| {
            let company_text = format!(
                "{} {} {} {}",
                company.name, company.sector, company.primary_products, company.location
            );
            let mut score = msme_core::text::similarity(query, &company_text);

            if sectors
                .iter()
                .any(|s| company.sector.to_lowercase().contains(s))
            {
                score += 0.15;
            }
            if locations
                .iter()
                .any(|l| company.location.to_lowercase().contains(l))
            {
                score += 0.2;
            }
            if wants_exports && company.exports() {
                score += 0.2;
            }
            (company.clone(), score.min(1.0))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Deterministic substitute for one role invocation.
pub fn insight(
    role: AgentRole,
    query: &str,
    companies: &[Company],
    articles: &[NewsArticle],
) -> Insight {
    let (narrative, score, sentiment) = match role {
        AgentRole::NewsAnalyzer => {
            let combined: String = articles
                .iter()
                .map(|a| format!("{} {}", a.title, a.summary))
                .collect::<Vec<_>>()
                .join(" ");
            let sentiment = sentiment_score(&combined);
            let tone = if sentiment > 0.2 {
                "positive"
            } else if sentiment < -0.2 {
                "negative"
            } else {
                "neutral"
            };
            let sources: Vec<&str> = articles.iter().map(|a| a.source.as_str()).collect();
            (
                format!(
                    "Found {} relevant news articles for query: {}. Overall tone is {}. Sources: {}.",
                    articles.len(),
                    query,
                    tone,
                    if sources.is_empty() { "none".to_string() } else { sources.join(", ") }
                ),
                None,
                Some(sentiment),
            )
        }
        AgentRole::FinancialAdvisor => {
            let scores: Vec<f64> = companies.iter().map(financial_health).collect();
            let average = if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            };
            (
                format!(
                    "Financial assessment for {} companies matching: {}. Average financial health score {:.0} of 100.",
                    companies.len(),
                    query,
                    average
                ),
                Some(average),
                None,
            )
        }
        AgentRole::CompanyMatcher => {
            let ranked = rank_companies(query, companies);
            let names: Vec<String> = ranked
                .iter()
                .take(5)
                .map(|(c, score)| format!("{} ({:.2})", c.name, score))
                .collect();
            (
                format!(
                    "Found {} companies for query: {}. Best matches: {}.",
                    companies.len(),
                    query,
                    if names.is_empty() { "none".to_string() } else { names.join(", ") }
                ),
                None,
                None,
            )
        }
        AgentRole::DashboardGenerator => (
            format!(
                "Dashboard over {} companies and {} articles for query: {}. Recommended views: sector distribution, companies by location, revenue comparison.",
                companies.len(),
                articles.len(),
                query
            ),
            None,
            None,
        ),
        AgentRole::MarketIntelligence => {
            let sectors = extract_sectors(query);
            let focus = if sectors.is_empty() {
                "general".to_string()
            } else {
                sectors.join(", ")
            };
            (
                format!(
                    "Market intelligence for query: {}. Sector focus: {}. Based on {} companies and {} recent articles.",
                    query,
                    focus,
                    companies.len(),
                    articles.len()
                ),
                None,
                None,
            )
        }
    };

    Insight {
        role,
        narrative,
        score,
        sentiment,
        recommended_charts: recommended_charts(role),
        used_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msme_core::text;

    fn company(name: &str, sector: &str, exports: &[&str], margin: f64, de: f64) -> Company {
        Company {
            id: text::slug(name),
            name: name.to_string(),
            sector: sector.to_string(),
            location: "Chennai".to_string(),
            primary_products: "supplies".to_string(),
            revenue: Some(20.0),
            profit_margin: Some(margin),
            sales_growth: Some(10.0),
            debt_to_equity: Some(de),
            export_markets: exports.iter().map(|s| s.to_string()).collect(),
            performance: None,
            description: String::new(),
            keywords: vec![],
        }
    }

    #[test]
    fn sentiment_is_bounded() {
        assert!(sentiment_score("strong growth and record profit") > 0.0);
        assert!(sentiment_score("crisis and decline and loss") < 0.0);
        assert_eq!(sentiment_score("the quick brown fox"), 0.0);
        for text in ["growth growth growth", "loss loss crisis", ""] {
            let s = sentiment_score(text);
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn financial_health_is_bounded() {
        let healthy = company("A", "Healthcare", &[], 40.0, 0.1);
        let broke = company("B", "Healthcare", &[], -80.0, 9.0);
        assert!((0.0..=100.0).contains(&financial_health(&healthy)));
        assert_eq!(financial_health(&broke), 0.0);

        let missing = Company {
            profit_margin: None,
            sales_growth: None,
            debt_to_equity: None,
            ..company("C", "Textiles", &[], 0.0, 0.0)
        };
        assert!((0.0..=100.0).contains(&financial_health(&missing)));
    }

    #[test]
    fn exporting_company_ranks_first_for_export_queries() {
        let exporter = company("MediExport", "Healthcare", &["USA"], 10.0, 0.5);
        let domestic = company("MediLocal", "Healthcare", &[], 10.0, 0.5);

        let ranked = rank_companies(
            "Find healthcare companies with good export performance",
            &[domestic, exporter],
        );
        assert_eq!(ranked[0].0.name, "MediExport");
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn fallback_insights_preserve_shape() {
        for role in AgentRole::all() {
            let out = insight(role, "textile exporters", &[], &[]);
            assert!(out.used_fallback);
            assert!(!out.narrative.is_empty());
            assert!(!out.recommended_charts.is_empty());
            if let Some(score) = out.score {
                assert!((0.0..=100.0).contains(&score));
            }
            if let Some(sentiment) = out.sentiment {
                assert!((-1.0..=1.0).contains(&sentiment));
            }
        }
    }
}
