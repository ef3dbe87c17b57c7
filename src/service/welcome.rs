use serde::Serialize;

pub const GREETING: &str = "Welcome to Smart Scheduler AI! 👋 I'm here to help you schedule \
appointments naturally. Just tell me what you need, and I'll handle the calendar magic! ✨";

pub const COOK_MODE_HINT: &str = "Cook for Calendar Mode: I understand phrases like \
\"after cooking dinner\" or \"once the kids leave for school\" 🏠";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub message: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        label: "Schedule a meeting tomorrow",
        message: "Schedule a meeting tomorrow afternoon",
    },
    QuickAction {
        label: "Book after cooking lunch",
        message: "I need to schedule a call after I cook lunch",
    },
    QuickAction {
        label: "Find time this week",
        message: "Find me available time slots this week",
    },
    QuickAction {
        label: "Team sync meeting",
        message: "Schedule a team sync meeting for next week",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct Welcome {
    pub greeting: &'static str,
    pub hint: &'static str,
    pub quick_actions: &'static [QuickAction],
}

pub fn welcome() -> Welcome {
    Welcome {
        greeting: GREETING,
        hint: COOK_MODE_HINT,
        quick_actions: &QUICK_ACTIONS,
    }
}

/// Resolves a quick action picked by its 1-based position.
pub fn quick_action(choice: &str) -> Option<&'static str> {
    let index: usize = choice.trim().parse().ok()?;
    QUICK_ACTIONS
        .get(index.checked_sub(1)?)
        .map(|action| action.message)
}
