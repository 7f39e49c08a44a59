pub mod fallback;
pub mod intent;
pub mod orchestrator;
pub mod role;
pub mod runtime;

pub use intent::detect_intent;
pub use orchestrator::{AnalysisContext, ChatOutcome, Orchestrator};
pub use runtime::AgentRuntime;

pub mod prelude {
    pub use super::{detect_intent, AgentRuntime, AnalysisContext, ChatOutcome, Orchestrator};
    pub use msme_core::{AgentRole, Insight, Intent};
}
