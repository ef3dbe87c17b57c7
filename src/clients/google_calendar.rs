//! Google Calendar v3 REST client.
//!
//! Only the two calls the gateway needs are modelled: `events.insert` and
//! `events.list`. Authentication is a pre-issued OAuth bearer token; the
//! `authenticate` call just checks the token against the target calendar.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

pub const GOOGLE_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl EventReminders {
    /// Popup ten minutes before, email half an hour before.
    pub fn standard() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: "popup".to_string(),
                    minutes: 10,
                },
                ReminderOverride {
                    method: "email".to_string(),
                    minutes: 30,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResource {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: EventReminders,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertEventRequest {
    pub calendar_id: String,
    pub resource: EventResource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEventsRequest {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub single_events: bool,
    pub order_by: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEventTime {
    pub date_time: Option<DateTime<Utc>>,
}

/// An entry of `events.list`. All-day events carry no `dateTime`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteEvent {
    pub start: RemoteEventTime,
    pub end: RemoteEventTime,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<RemoteEvent>,
}

#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn authenticate(&self, calendar_id: &str) -> Result<(), CalendarError>;
    async fn insert_event(&self, request: &InsertEventRequest) -> Result<String, CalendarError>;
    async fn list_events(&self, request: &ListEventsRequest)
        -> Result<Vec<RemoteEvent>, CalendarError>;
}

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(GOOGLE_CALENDAR_BASE_URL.to_string(), access_token)
    }

    pub fn with_base_url(base_url: String, access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            access_token,
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.base_url, calendar_id)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, CalendarError> {
        let status = response.status();
        let text = response.text().await?;
        if status == StatusCode::UNAUTHORIZED {
            return Err(CalendarError::Unauthenticated);
        }
        if !status.is_success() {
            return Err(CalendarError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn authenticate(&self, calendar_id: &str) -> Result<(), CalendarError> {
        let response = self
            .http
            .get(format!("{}/calendars/{}", self.base_url, calendar_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::read_body(response).await?;
        Ok(())
    }

    async fn insert_event(&self, request: &InsertEventRequest) -> Result<String, CalendarError> {
        let response = self
            .http
            .post(self.events_url(&request.calendar_id))
            .bearer_auth(&self.access_token)
            .json(&request.resource)
            .send()
            .await?;
        let text = Self::read_body(response).await?;
        let inserted: InsertedEvent = serde_json::from_str(&text)
            .map_err(|e| CalendarError::Payload(format!("{}\nRaw body: {}", e, text)))?;
        Ok(inserted.id)
    }

    async fn list_events(
        &self,
        request: &ListEventsRequest,
    ) -> Result<Vec<RemoteEvent>, CalendarError> {
        let response = self
            .http
            .get(self.events_url(&request.calendar_id))
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", request.time_min.to_rfc3339()),
                ("timeMax", request.time_max.to_rfc3339()),
                ("singleEvents", request.single_events.to_string()),
                ("orderBy", request.order_by.clone()),
            ])
            .send()
            .await?;
        let text = Self::read_body(response).await?;
        let list: EventList = serde_json::from_str(&text)
            .map_err(|e| CalendarError::Payload(format!("{}\nRaw body: {}", e, text)))?;
        Ok(list.items)
    }
}
