//! Dashboard chart selection: a deterministic rule table from intent to
//! chart specifications. No state, no learning; a pure function of the
//! insight and the records that accompany it.

use std::collections::BTreeMap;

use msme_agents::fallback::{financial_health, sentiment_score};
use msme_core::{ChartSpec, ChartType, Company, Insight, Intent, NewsArticle, Series};

/// Pick chart specs for a response. Companies are expected in ranked
/// order; every series references fields of the records passed in, so a
/// non-empty record set always yields at least one spec.
pub fn select(
    intent: Intent,
    insights: &[Insight],
    companies: &[Company],
    articles: &[NewsArticle],
) -> Vec<ChartSpec> {
    let charts = match intent {
        Intent::Financial => vec![health_bar(companies), risk_pie(companies)],
        Intent::News => vec![source_pie(articles), sentiment_bar(articles)],
        Intent::CompanyMatch => vec![health_bar(companies), sector_pie(companies)],
        Intent::Dashboard => vec![
            sector_pie(companies),
            location_bar(companies),
            revenue_bar(companies),
            source_pie(articles),
        ],
        Intent::Market => vec![growth_line(companies), sector_pie(companies)],
    };
    let mut charts: Vec<ChartSpec> = charts.into_iter().flatten().collect();

    // Honor the orchestration layer's recommended types first.
    let recommended: Vec<ChartType> = insights
        .iter()
        .flat_map(|i| i.recommended_charts.iter().copied())
        .collect();
    charts.sort_by_key(|c| {
        recommended
            .iter()
            .position(|t| *t == c.chart_type)
            .unwrap_or(usize::MAX)
    });
    charts
}

fn distribution<'a, I, F>(items: I, key: F) -> (Vec<String>, Vec<f64>)
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> String,
{
    let mut counts: BTreeMap<String, f64> = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0.0) += 1.0;
    }
    counts.into_iter().unzip()
}

fn sector_pie(companies: &[Company]) -> Option<ChartSpec> {
    if companies.is_empty() {
        return None;
    }
    let (labels, values) = distribution(
        companies.iter().map(|c| c.sector.as_str()),
        |s| if s.is_empty() { "Unknown".to_string() } else { s.to_string() },
    );
    Some(ChartSpec {
        chart_type: ChartType::Pie,
        title: "MSME Sectors Distribution".to_string(),
        series: vec![Series { name: "companies".to_string(), labels, values }],
        x_label: None,
        y_label: None,
    })
}

fn location_bar(companies: &[Company]) -> Option<ChartSpec> {
    if companies.is_empty() {
        return None;
    }
    let (labels, values) = distribution(
        companies.iter().map(|c| c.location.as_str()),
        |s| if s.is_empty() { "Unknown".to_string() } else { s.to_string() },
    );
    Some(ChartSpec {
        chart_type: ChartType::Bar,
        title: "MSME Companies by Location".to_string(),
        series: vec![Series { name: "companies".to_string(), labels, values }],
        x_label: Some("location".to_string()),
        y_label: Some("count".to_string()),
    })
}

fn health_bar(companies: &[Company]) -> Option<ChartSpec> {
    if companies.is_empty() {
        return None;
    }
    let top: Vec<&Company> = companies.iter().take(10).collect();
    Some(ChartSpec {
        chart_type: ChartType::Bar,
        title: "Financial Health Scores".to_string(),
        series: vec![Series {
            name: "health_score".to_string(),
            labels: top.iter().map(|c| c.name.clone()).collect(),
            values: top.iter().map(|c| financial_health(c)).collect(),
        }],
        x_label: Some("company".to_string()),
        y_label: Some("score (0-100)".to_string()),
    })
}

fn risk_pie(companies: &[Company]) -> Option<ChartSpec> {
    if companies.is_empty() {
        return None;
    }
    let bucket = |company: &Company| match company.debt_to_equity {
        Some(de) if de < 0.5 => "Low leverage",
        Some(de) if de < 1.5 => "Moderate leverage",
        Some(_) => "High leverage",
        None => "Unknown",
    };
    let mut counts: BTreeMap<String, f64> = BTreeMap::new();
    for company in companies {
        *counts.entry(bucket(company).to_string()).or_insert(0.0) += 1.0;
    }
    let (labels, values) = counts.into_iter().unzip();
    Some(ChartSpec {
        chart_type: ChartType::Pie,
        title: "Risk Profile".to_string(),
        series: vec![Series { name: "companies".to_string(), labels, values }],
        x_label: None,
        y_label: None,
    })
}

fn revenue_bar(companies: &[Company]) -> Option<ChartSpec> {
    let with_revenue: Vec<&Company> = companies
        .iter()
        .filter(|c| c.revenue.is_some())
        .take(10)
        .collect();
    if with_revenue.is_empty() {
        return None;
    }
    Some(ChartSpec {
        chart_type: ChartType::Bar,
        title: "Revenue Comparison".to_string(),
        series: vec![Series {
            name: "revenue_cr".to_string(),
            labels: with_revenue.iter().map(|c| c.name.clone()).collect(),
            values: with_revenue.iter().map(|c| c.revenue.unwrap_or(0.0)).collect(),
        }],
        x_label: Some("company".to_string()),
        y_label: Some("revenue (Cr)".to_string()),
    })
}

fn growth_line(companies: &[Company]) -> Option<ChartSpec> {
    let with_growth: Vec<&Company> = companies
        .iter()
        .filter(|c| c.sales_growth.is_some())
        .take(10)
        .collect();
    if with_growth.is_empty() {
        return None;
    }
    Some(ChartSpec {
        chart_type: ChartType::Line,
        title: "Sales Growth".to_string(),
        series: vec![Series {
            name: "sales_growth".to_string(),
            labels: with_growth.iter().map(|c| c.name.clone()).collect(),
            values: with_growth.iter().map(|c| c.sales_growth.unwrap_or(0.0)).collect(),
        }],
        x_label: Some("company".to_string()),
        y_label: Some("growth (%)".to_string()),
    })
}

fn source_pie(articles: &[NewsArticle]) -> Option<ChartSpec> {
    if articles.is_empty() {
        return None;
    }
    let (labels, values) =
        distribution(articles.iter().map(|a| a.source.as_str()), |s| s.to_string());
    Some(ChartSpec {
        chart_type: ChartType::Pie,
        title: "News Sources Distribution".to_string(),
        series: vec![Series { name: "articles".to_string(), labels, values }],
        x_label: None,
        y_label: None,
    })
}

fn sentiment_bar(articles: &[NewsArticle]) -> Option<ChartSpec> {
    if articles.is_empty() {
        return None;
    }
    let top: Vec<&NewsArticle> = articles.iter().take(10).collect();
    Some(ChartSpec {
        chart_type: ChartType::Bar,
        title: "Article Sentiment".to_string(),
        series: vec![Series {
            name: "sentiment".to_string(),
            labels: top.iter().map(|a| a.title.clone()).collect(),
            values: top
                .iter()
                .map(|a| {
                    a.sentiment
                        .unwrap_or_else(|| sentiment_score(&format!("{} {}", a.title, a.summary)))
                })
                .collect(),
        }],
        x_label: Some("article".to_string()),
        y_label: Some("sentiment (-1..1)".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use msme_core::text;

    fn company(name: &str, sector: &str, location: &str) -> Company {
        Company {
            id: text::slug(name),
            name: name.to_string(),
            sector: sector.to_string(),
            location: location.to_string(),
            primary_products: String::new(),
            revenue: Some(30.0),
            profit_margin: Some(10.0),
            sales_growth: Some(5.0),
            debt_to_equity: Some(0.4),
            export_markets: vec![],
            performance: None,
            description: String::new(),
            keywords: vec![],
        }
    }

    fn article(source: &str, title: &str) -> NewsArticle {
        NewsArticle {
            id: text::slug(title),
            title: title.to_string(),
            summary: "strong growth reported".to_string(),
            link: String::new(),
            source: source.to_string(),
            published_at: Utc::now(),
            sectors: vec![],
            country: vec![],
            sentiment: None,
            keywords: vec![],
        }
    }

    #[test]
    fn dashboard_intent_yields_specs_referencing_records() {
        let companies = [
            company("Acme", "Textiles", "Coimbatore"),
            company("MediSup", "Healthcare", "Chennai"),
        ];
        let charts = select(Intent::Dashboard, &[], &companies, &[]);
        assert!(!charts.is_empty());

        let sector_chart = charts
            .iter()
            .find(|c| c.title.contains("Sectors"))
            .expect("sector pie present");
        for label in &sector_chart.series[0].labels {
            assert!(companies.iter().any(|c| &c.sector == label));
        }
    }

    #[test]
    fn financial_intent_includes_health_bar_and_risk_pie() {
        let companies = [company("Acme", "Textiles", "Coimbatore")];
        let charts = select(Intent::Financial, &[], &companies, &[]);
        let types: Vec<ChartType> = charts.iter().map(|c| c.chart_type).collect();
        assert!(types.contains(&ChartType::Bar));
        assert!(types.contains(&ChartType::Pie));
        let health = charts.iter().find(|c| c.title.contains("Health")).unwrap();
        assert!(health.series[0].values.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn news_intent_uses_articles() {
        let articles = [article("Mint", "MSME exports surge"), article("The Hindu", "Policy update")];
        let charts = select(Intent::News, &[], &[], &articles);
        assert_eq!(charts.len(), 2);
        let sentiments = &charts.iter().find(|c| c.title.contains("Sentiment")).unwrap().series[0];
        assert!(sentiments.values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn empty_records_yield_no_charts() {
        assert!(select(Intent::Dashboard, &[], &[], &[]).is_empty());
    }
}
