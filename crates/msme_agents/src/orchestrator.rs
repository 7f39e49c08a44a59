use std::sync::Arc;

use msme_core::{AgentRole, Company, Insight, Intent, NewsArticle};
use serde::Serialize;
use tracing::{info, warn};

use crate::fallback;
use crate::role::{build_prompt, instructions, recommended_charts};
use crate::runtime::AgentRuntime;

/// Retrieved context handed to the orchestration layer for one request.
pub struct AnalysisContext<'a> {
    pub query: &'a str,
    pub companies: &'a [Company],
    pub articles: &'a [NewsArticle],
}

/// Combined output of all role invocations for one request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub intent: Intent,
    pub narrative: String,
    pub financial_health: Option<f64>,
    pub sentiment: Option<f64>,
    pub confidence: f64,
    pub insights: Vec<Insight>,
    pub ranked_companies: Vec<Company>,
    pub used_fallback: bool,
}

/// Role dispatch over the five-agent enum. One role failing substitutes
/// that role's fallback only; the request as a whole always succeeds.
pub struct Orchestrator {
    runtime: Arc<AgentRuntime>,
}

fn roles_for_intent(intent: Intent) -> Vec<AgentRole> {
    match intent {
        Intent::News => vec![AgentRole::NewsAnalyzer, AgentRole::MarketIntelligence],
        Intent::Financial => vec![AgentRole::FinancialAdvisor, AgentRole::CompanyMatcher],
        Intent::CompanyMatch => vec![AgentRole::CompanyMatcher, AgentRole::FinancialAdvisor],
        Intent::Dashboard => vec![AgentRole::DashboardGenerator],
        Intent::Market => vec![AgentRole::MarketIntelligence, AgentRole::NewsAnalyzer],
    }
}

fn section_title(role: AgentRole) -> &'static str {
    match role {
        AgentRole::NewsAnalyzer => "News Analysis",
        AgentRole::FinancialAdvisor => "Financial Insights",
        AgentRole::CompanyMatcher => "Company Analysis",
        AgentRole::DashboardGenerator => "Dashboard",
        AgentRole::MarketIntelligence => "Market Intelligence",
    }
}

impl Orchestrator {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Arc<AgentRuntime> {
        &self.runtime
    }

    /// Run every role mapped to the intent, substituting the
    /// deterministic fallback wherever the runtime is unavailable or
    /// errors. Numeric scores always come from the deterministic path so
    /// the response shape is identical on both paths.
    pub async fn analyze(&self, intent: Intent, ctx: &AnalysisContext<'_>) -> ChatOutcome {
        let roles = roles_for_intent(intent);
        let mut insights = Vec::with_capacity(roles.len());

        for role in roles {
            insights.push(self.run_role(role, ctx).await);
        }

        let ranked_companies: Vec<Company> = fallback::rank_companies(ctx.query, ctx.companies)
            .into_iter()
            .map(|(company, _)| company)
            .collect();

        let financial_health = insights.iter().find_map(|i| i.score);
        let sentiment = insights.iter().find_map(|i| i.sentiment);
        let used_fallback = insights.iter().any(|i| i.used_fallback);
        let confidence = (insights.len() as f64 * 25.0).min(100.0);

        let narrative = insights
            .iter()
            .map(|i| format!("{}: {}", section_title(i.role), i.narrative))
            .collect::<Vec<_>>()
            .join("\n\n");

        info!(
            ?intent,
            roles = insights.len(),
            used_fallback,
            "analysis complete"
        );

        ChatOutcome {
            intent,
            narrative,
            financial_health,
            sentiment,
            confidence,
            insights,
            ranked_companies,
            used_fallback,
        }
    }

    async fn run_role(&self, role: AgentRole, ctx: &AnalysisContext<'_>) -> Insight {
        // Deterministic scores are computed on both paths.
        let deterministic = fallback::insight(role, ctx.query, ctx.companies, ctx.articles);

        if !self.runtime.available() {
            return deterministic;
        }

        let prompt = build_prompt(role, ctx.query, ctx.companies, ctx.articles);
        match self.runtime.complete(instructions(role), &prompt).await {
            Ok(narrative) => Insight {
                role,
                narrative,
                score: deterministic.score,
                sentiment: deterministic.sentiment,
                recommended_charts: recommended_charts(role),
                used_fallback: false,
            },
            Err(e) => {
                warn!(role = role.name(), error = %e, "role invocation failed, using fallback");
                deterministic
            }
        }
    }
}
