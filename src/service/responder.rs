//! Canned assistant replies.
//!
//! The router picks a branch; the branch may read or overwrite the single
//! [`BookingState`] and talk to the calendar gateway. Any failure inside a
//! branch turns into [`APOLOGY`].

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::error::CalendarError;
use crate::models::booking::BookingState;
use crate::models::calendar_event::NewCalendarEvent;
use crate::models::message::MessageType;
use crate::service::calendar_gateway::CalendarGateway;
use crate::service::date_parser::{extract_duration, localize, parse_date_time};
use crate::service::routing::{Intent, IntentRouter};

pub const APOLOGY: &str =
    "I'm sorry, something went wrong while handling that request. Please try again.";
pub const DEFAULT_TITLE: &str = "Meeting";
pub const COOK_TITLE: &str = "Meeting after cooking";

const COOK_REPLY: &str = "Perfect! I understand you need to work around your cooking schedule. 👩‍🍳 \
When are you planning to cook lunch, and would you prefer to schedule before or after? \
I can suggest time slots that give you enough buffer time.";

const HELP_REPLY: &str = "I'm here to help you schedule your appointments! You can ask me things like \
'Schedule a meeting tomorrow afternoon' or 'Find time after I cook lunch'. \
What would you like to schedule? ✨";

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:schedule|book)\s+(?:(?:a|an|the|my)\s+)?(.+?)(?:\s+(?:for|on|at|tomorrow|today|next week|this week)\b|$)",
    )
    .expect("Invalid title regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub kind: MessageType,
    pub intent: Intent,
}

impl Reply {
    fn new(intent: Intent, kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            intent,
        }
    }
}

pub struct Responder {
    router: Arc<dyn IntentRouter>,
    gateway: Arc<CalendarGateway>,
    booking: Mutex<BookingState>,
    default_duration_minutes: u32,
}

impl Responder {
    pub fn new(
        router: Arc<dyn IntentRouter>,
        gateway: Arc<CalendarGateway>,
        default_duration_minutes: u32,
    ) -> Self {
        Self {
            router,
            gateway,
            booking: Mutex::new(BookingState::default()),
            default_duration_minutes,
        }
    }

    pub fn gateway(&self) -> &Arc<CalendarGateway> {
        &self.gateway
    }

    pub async fn booking(&self) -> BookingState {
        self.booking.lock().await.clone()
    }

    pub async fn respond(&self, text: &str) -> Reply {
        let now = Utc::now().with_timezone(&self.gateway.timezone());
        self.respond_at(text, now).await
    }

    pub async fn respond_at(&self, text: &str, now: DateTime<Tz>) -> Reply {
        let routing = self.router.route(text).await;
        let result = match routing.intent {
            Intent::Confirm => self.confirm().await,
            Intent::Schedule => Ok(self.schedule(text, now).await),
            Intent::Cook => Ok(self.cook().await),
            Intent::DateInquiry => Ok(self.date_inquiry(text, now).await),
            Intent::Help => Ok(Reply::new(Intent::Help, MessageType::Text, HELP_REPLY)),
        };

        result.unwrap_or_else(|err| {
            error!(error = %err, intent = ?routing.intent, "Failed to generate response");
            Reply::new(routing.intent, MessageType::Text, APOLOGY)
        })
    }

    async fn confirm(&self) -> Result<Reply, CalendarError> {
        let mut booking = self.booking.lock().await;
        let Some(event) = event_from_booking(
            &booking,
            &self.gateway.timezone(),
            self.default_duration_minutes,
        ) else {
            info!(booking = ?*booking, "Confirmation with incomplete booking");
            return Ok(Reply::new(
                Intent::Confirm,
                MessageType::Text,
                missing_details_reply(&booking),
            ));
        };

        let created = self.gateway.create_event(event).await?;
        let duration = (created.end - created.start).num_minutes();
        booking.clear();

        let local_start = created.start.with_timezone(&self.gateway.timezone());
        Ok(Reply::new(
            Intent::Confirm,
            MessageType::Confirmation,
            format!(
                "✅ Booked \"{}\" on {} at {} for {} minutes. I'll remind you when it starts! 🔔",
                created.title,
                format_date(local_start.date_naive()),
                format_time(local_start.time()),
                duration
            ),
        ))
    }

    async fn schedule(&self, text: &str, now: DateTime<Tz>) -> Reply {
        let at = parse_date_time(text, now);
        let title = extract_title(text).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let duration = extract_duration(text).unwrap_or(self.default_duration_minutes);

        let mut booking = self.booking.lock().await;
        *booking = BookingState {
            title: Some(title.clone()),
            date: Some(at.date_naive()),
            time: Some(at.time()),
            duration_minutes: Some(duration),
            confirmed: false,
        };

        Reply::new(
            Intent::Schedule,
            MessageType::Confirmation,
            format!(
                "I'd be happy to help you schedule that! 📅 Here's what I have:\n\
                 • {}\n• {}\n• {}\n• {} minutes\n\
                 Reply \"confirm\" and I'll add it to your calendar.",
                title,
                format_date(at.date_naive()),
                format_time(at.time()),
                duration
            ),
        )
    }

    async fn cook(&self) -> Reply {
        let mut booking = self.booking.lock().await;
        booking.title = Some(COOK_TITLE.to_string());
        Reply::new(Intent::Cook, MessageType::Text, COOK_REPLY)
    }

    async fn date_inquiry(&self, text: &str, now: DateTime<Tz>) -> Reply {
        let date = parse_date_time(text, now).date_naive();
        let slots = self.gateway.get_availability(date).await;
        let body = if slots.is_empty() {
            format!("Your calendar looks fully booked on {}.", format_date(date))
        } else {
            format!(
                "Got it! Here's what's open on {}: {}.",
                format_date(date),
                slots.join(", ")
            )
        };
        Reply::new(
            Intent::DateInquiry,
            MessageType::Suggestion,
            format!(
                "{} What duration are you thinking - 30 minutes, 1 hour, or something else?",
                body
            ),
        )
    }
}

/// Title guessed from "schedule/book <title> [for|on|at|<date word>...]".
pub fn extract_title(text: &str) -> Option<String> {
    let caps = TITLE_RE.captures(text.trim())?;
    let raw = caps.get(1)?.as_str().trim().trim_end_matches(['.', '!', '?', ',']);
    let mut chars = raw.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Builds the event a confirmation would create, or `None` while the booking
/// still lacks a title, date or time.
pub fn event_from_booking(
    booking: &BookingState,
    tz: &Tz,
    default_duration_minutes: u32,
) -> Option<NewCalendarEvent> {
    if !booking.is_confirmable() {
        return None;
    }
    let title = booking.title.clone()?;
    let start = localize(tz, booking.date?.and_time(booking.time?)).to_utc();
    let minutes = booking.duration_minutes.unwrap_or(default_duration_minutes);
    Some(NewCalendarEvent {
        title,
        start,
        end: start + Duration::minutes(i64::from(minutes)),
        description: Some("Booked by Smart Scheduler".to_string()),
    })
}

fn missing_details_reply(booking: &BookingState) -> String {
    let mut missing = Vec::new();
    if booking.title.is_none() {
        missing.push("what it's for");
    }
    if booking.date.is_none() {
        missing.push("the date");
    }
    if booking.time.is_none() {
        missing.push("the time");
    }
    format!(
        "I don't have enough details to book that yet - I still need {}. \
         Try something like 'Schedule a meeting tomorrow at 2:30 pm'.",
        missing.join(" and ")
    )
}

fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    #[test]
    fn extracts_title_between_verb_and_date_words() {
        assert_eq!(
            extract_title("Schedule a meeting tomorrow afternoon").as_deref(),
            Some("Meeting")
        );
        assert_eq!(
            extract_title("Schedule a team sync meeting for next week").as_deref(),
            Some("Team sync meeting")
        );
        assert_eq!(
            extract_title("book an appointment with Dr. Lee at 3pm").as_deref(),
            Some("Appointment with Dr. Lee")
        );
        assert_eq!(
            extract_title("please book dentist checkup.").as_deref(),
            Some("Dentist checkup")
        );
        assert_eq!(extract_title("team meeting tomorrow"), None);
    }

    #[test]
    fn incomplete_booking_yields_no_event() {
        let booking = BookingState {
            title: Some(COOK_TITLE.to_string()),
            ..BookingState::default()
        };
        assert!(event_from_booking(&booking, &New_York, 60).is_none());
    }

    #[test]
    fn event_spans_the_booked_duration_in_local_time() {
        let booking = BookingState {
            title: Some("Sync".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 2, 11),
            time: NaiveTime::from_hms_opt(14, 30, 0),
            duration_minutes: Some(45),
            confirmed: false,
        };
        let event = event_from_booking(&booking, &New_York, 60).unwrap();
        assert_eq!(
            event.start,
            New_York.with_ymd_and_hms(2026, 2, 11, 14, 30, 0).unwrap().to_utc()
        );
        assert_eq!(event.end - event.start, Duration::minutes(45));
    }

    #[test]
    fn missing_details_names_each_gap() {
        let reply = missing_details_reply(&BookingState::default());
        assert!(reply.contains("what it's for"));
        assert!(reply.contains("the date"));
        assert!(reply.contains("the time"));
    }
}
