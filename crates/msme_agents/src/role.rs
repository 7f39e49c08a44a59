//! Prompt templates for the five agent roles. Each role pairs the
//! instructions here with the deterministic computation in `fallback`.

use msme_core::{AgentRole, ChartType, Company, NewsArticle};

pub fn instructions(role: AgentRole) -> &'static str {
    match role {
        AgentRole::NewsAnalyzer => {
            "You are a News Analyst specializing in MSME-relevant news analysis. \
             Analyze articles for MSME relevance and impact, assess sentiment, \
             identify policy changes and sector developments. Use only standard \
             ASCII characters."
        }
        AgentRole::FinancialAdvisor => {
            "You are a Financial Analyst specializing in MSME financial analysis. \
             Calculate key ratios, provide a financial health score from 0 to 100, \
             benchmark performance and assess risk. Use only standard ASCII \
             characters."
        }
        AgentRole::CompanyMatcher => {
            "You are a Company Matcher for MSME discovery. Score how well each \
             company fits the user's requirements, compare performance across the \
             set and explain the recommendation rationale. Use only standard \
             ASCII characters."
        }
        AgentRole::DashboardGenerator => {
            "You are a Dashboard Generator. Recommend chart types and key metrics \
             to visualize for the supplied data, favoring simple bar, line and \
             pie charts. Use only standard ASCII characters."
        }
        AgentRole::MarketIntelligence => {
            "You are a Growth Strategist specializing in MSME market expansion. \
             Analyze market opportunities and competitive positioning, and give \
             short, medium and long term recommendations. Use only standard \
             ASCII characters."
        }
    }
}

/// Default chart recommendations per role, used when the runtime gives
/// no usable recommendation of its own.
pub fn recommended_charts(role: AgentRole) -> Vec<ChartType> {
    match role {
        AgentRole::NewsAnalyzer => vec![ChartType::Pie, ChartType::Bar],
        AgentRole::FinancialAdvisor => vec![ChartType::Bar, ChartType::Pie],
        AgentRole::CompanyMatcher => vec![ChartType::Bar, ChartType::Pie],
        AgentRole::DashboardGenerator => vec![ChartType::Pie, ChartType::Bar, ChartType::Line],
        AgentRole::MarketIntelligence => vec![ChartType::Line, ChartType::Pie],
    }
}

/// Substitute retrieved context into the role's analysis prompt.
pub fn build_prompt(
    role: AgentRole,
    query: &str,
    companies: &[Company],
    articles: &[NewsArticle],
) -> String {
    match role {
        AgentRole::NewsAnalyzer => format!(
            "Analyze these news articles for MSME sector relevance.\n\n\
             User Query: {}\n\nNews Articles:\n{}\n\n\
             Provide: relevance per article, sentiment assessment, key trends, \
             sector impact and actionable insights for MSMEs.",
            query,
            news_summary(articles)
        ),
        AgentRole::FinancialAdvisor => format!(
            "Provide financial analysis for these companies.\n\n\
             User Query: {}\n\nCompanies:\n{}\n\n\
             Provide: financial health assessment, performance benchmarking, \
             growth opportunities, risk analysis and strategic recommendations.",
            query,
            company_summary(companies)
        ),
        AgentRole::CompanyMatcher => format!(
            "Analyze these MSME companies based on user requirements.\n\n\
             User Query: {}\n\nCompanies:\n{}\n\n\
             Provide: matching scores, sector analysis, performance comparison \
             and the best-fit companies for the query.",
            query,
            company_summary(companies)
        ),
        AgentRole::DashboardGenerator => format!(
            "Generate a dashboard plan for this data.\n\n\
             User Query: {}\n\nData:\n{}\n{}\n\
             Provide: recommended chart types, key metrics to highlight and \
             trend visualizations.",
            query,
            company_summary(companies),
            news_summary(articles)
        ),
        AgentRole::MarketIntelligence => format!(
            "Provide market intelligence insights.\n\n\
             User Query: {}\n\nContext:\n{}\n{}\n\
             Provide: market trend analysis, strategic recommendations, growth \
             opportunities, risk assessment and an action plan for MSMEs.",
            query,
            company_summary(companies),
            news_summary(articles)
        ),
    }
}

fn news_summary(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .take(10)
        .enumerate()
        .map(|(i, a)| {
            format!(
                "Article {}: {} | {} | {} | {}",
                i + 1,
                a.title,
                a.summary,
                a.source,
                a.published_at.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn company_summary(companies: &[Company]) -> String {
    companies
        .iter()
        .take(10)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "Company {}: {} | {} | {} | {} | performance: {}",
                i + 1,
                c.name,
                c.sector,
                c.location,
                c.primary_products,
                c.performance.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_substitute_query_and_context() {
        let prompt = build_prompt(AgentRole::CompanyMatcher, "healthcare exporters", &[], &[]);
        assert!(prompt.contains("healthcare exporters"));
        assert!(prompt.contains("matching scores"));
    }

    #[test]
    fn every_role_has_instructions_and_charts() {
        for role in AgentRole::all() {
            assert!(!instructions(role).is_empty());
            assert!(!recommended_charts(role).is_empty());
        }
    }
}
