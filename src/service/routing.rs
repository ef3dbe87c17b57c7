use async_trait::async_trait;
use serde::Serialize;

/// Reply branches, listed in the order they are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Confirm,
    Schedule,
    Cook,
    DateInquiry,
    Help,
}

#[derive(Debug, Clone)]
pub struct IntentResult {
    pub intent: Intent,
    pub normalized_text: String,
}

#[async_trait]
pub trait IntentRouter: Send + Sync {
    async fn route(&self, text: &str) -> IntentResult;
}

pub struct HeuristicRouter;

#[async_trait]
impl IntentRouter for HeuristicRouter {
    async fn route(&self, text: &str) -> IntentResult {
        route_intent(text)
    }
}

const CONFIRM_KEYWORDS: &[&str] = &["confirm", "yes", "book it", "sounds good", "looks good"];
const SCHEDULE_KEYWORDS: &[&str] = &["schedule", "book", "meeting", "appointment"];
const COOK_KEYWORDS: &[&str] = &["cook", "lunch", "kitchen", "dinner"];
const DATE_KEYWORDS: &[&str] = &["tomorrow", "today", "next week"];

const PRIORITY: [(Intent, &[&str]); 4] = [
    (Intent::Confirm, CONFIRM_KEYWORDS),
    (Intent::Schedule, SCHEDULE_KEYWORDS),
    (Intent::Cook, COOK_KEYWORDS),
    (Intent::DateInquiry, DATE_KEYWORDS),
];

/// First matching keyword group wins; nothing is scored.
pub fn route_intent(text: &str) -> IntentResult {
    let normalized = text.trim().to_lowercase();
    let intent = PRIORITY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(*k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Help);

    IntentResult {
        intent,
        normalized_text: normalized,
    }
}
