use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supplier/company record loaded from the seed CSVs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub location: String,
    pub primary_products: String,
    pub revenue: Option<f64>,
    pub profit_margin: Option<f64>,
    pub sales_growth: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub export_markets: Vec<String>,
    pub performance: Option<String>,
    pub description: String,
    pub keywords: Vec<String>,
}

impl Company {
    /// Whether the company sells into at least one export market.
    pub fn exports(&self) -> bool {
        !self.export_markets.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub sectors: Vec<String>,
    pub country: Vec<String>,
    pub sentiment: Option<f64>,
    pub keywords: Vec<String>,
}

/// Detected intent of a user query, used to pick agent roles and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    News,
    Financial,
    CompanyMatch,
    Dashboard,
    Market,
}

/// The five agent roles. Each carries its own prompt template and
/// deterministic fallback computation in `msme_agents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    NewsAnalyzer,
    FinancialAdvisor,
    CompanyMatcher,
    DashboardGenerator,
    MarketIntelligence,
}

impl AgentRole {
    pub fn all() -> [AgentRole; 5] {
        [
            AgentRole::NewsAnalyzer,
            AgentRole::FinancialAdvisor,
            AgentRole::CompanyMatcher,
            AgentRole::DashboardGenerator,
            AgentRole::MarketIntelligence,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::NewsAnalyzer => "news_analyzer",
            AgentRole::FinancialAdvisor => "financial_advisor",
            AgentRole::CompanyMatcher => "company_matcher",
            AgentRole::DashboardGenerator => "dashboard_generator",
            AgentRole::MarketIntelligence => "market_intelligence",
        }
    }
}

/// Structured output of a single role invocation, identical in shape
/// whether it came from the agent runtime or the fallback path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub role: AgentRole,
    pub narrative: String,
    /// Financial health in [0, 100] where applicable.
    pub score: Option<f64>,
    /// Sentiment in [-1, 1] where applicable.
    pub sentiment: Option<f64>,
    pub recommended_charts: Vec<ChartType>,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Declarative chart description. A value object, never persisted; its
/// series are always built from fields of the records in the same
/// response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub title: String,
    pub series: Vec<Series>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}
