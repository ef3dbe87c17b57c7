use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clients::google_calendar::{
    CalendarClient, EventDateTime, EventReminders, EventResource, InsertEventRequest,
    ListEventsRequest,
};
use crate::config::{DEFAULT_AUTH_DELAY_MS, DEFAULT_CALENDAR_ID};
use crate::error::CalendarError;
use crate::models::calendar_event::{CalendarEvent, NewCalendarEvent};
use crate::service::alarm::NotificationScheduler;
use crate::service::date_parser::localize;

pub const MOCK_AVAILABILITY: [&str; 6] = ["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"];
pub const WORKDAY_START_HOUR: u32 = 9;
pub const WORKDAY_END_HOUR: u32 = 18;

/// Calendar backend seen by the chat. Without a client, or before
/// authentication, every call takes the in-memory mock path.
pub struct CalendarGateway {
    client: Option<Arc<dyn CalendarClient>>,
    alarms: Arc<NotificationScheduler>,
    timezone: Tz,
    calendar_id: String,
    auth_delay: Duration,
    authenticated: AtomicBool,
    events: Mutex<Vec<CalendarEvent>>,
}

impl CalendarGateway {
    pub fn new(alarms: Arc<NotificationScheduler>, timezone: Tz) -> Self {
        Self {
            client: None,
            alarms,
            timezone,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            auth_delay: Duration::from_millis(DEFAULT_AUTH_DELAY_MS),
            authenticated: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn with_client(mut self, client: Arc<dyn CalendarClient>, calendar_id: String) -> Self {
        self.client = Some(client);
        self.calendar_id = calendar_id;
        self
    }

    pub fn with_auth_delay(mut self, auth_delay: Duration) -> Self {
        self.auth_delay = auth_delay;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub async fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().await.clone()
    }

    /// Always ends authenticated. A failed remote sign-in is logged and
    /// treated as success.
    pub async fn authenticate(&self) {
        match &self.client {
            None => {
                info!("Mock: authenticating with calendar");
                sleep(self.auth_delay).await;
            }
            Some(client) => match client.authenticate(&self.calendar_id).await {
                Ok(()) => info!("Authenticated with calendar"),
                Err(err) => warn!(error = %err, "Calendar authentication failed, continuing"),
            },
        }
        self.authenticated.store(true, Ordering::SeqCst);
    }

    pub async fn create_event(
        &self,
        event: NewCalendarEvent,
    ) -> Result<CalendarEvent, CalendarError> {
        let created = match self.remote() {
            Some(client) => {
                let request = self.insert_request(&event);
                let id = client.insert_event(&request).await.inspect_err(|err| {
                    error!(error = %err, title = %event.title, "Failed to create event");
                })?;
                let created = event.with_id(id);
                info!(id = %created.id, title = %created.title, "Event created");
                created
            }
            None => {
                let created = event.with_id(Uuid::new_v4().to_string());
                info!(id = %created.id, title = %created.title, start = %created.start, "Mock: created event");
                created
            }
        };

        {
            let mut events = self.events.lock().await;
            events.push(created.clone());
        }
        self.alarms.create_alarm(&created.title, created.start).await;
        Ok(created)
    }

    /// Free whole-hour slots for `date`. Falls back to the fixed mock list
    /// whenever the remote calendar is unavailable or fails.
    pub async fn get_availability(&self, date: NaiveDate) -> Vec<String> {
        let Some(client) = self.remote() else {
            info!(%date, "Mock: checking availability");
            return mock_availability();
        };

        let day_start = localize(&self.timezone, date.and_time(NaiveTime::MIN));
        let day_end = localize(
            &self.timezone,
            date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)),
        );
        let request = ListEventsRequest {
            calendar_id: self.calendar_id.clone(),
            time_min: day_start.to_utc(),
            time_max: day_end.to_utc(),
            single_events: true,
            order_by: "startTime".to_string(),
        };

        match client.list_events(&request).await {
            Ok(items) => {
                let busy: Vec<(u32, u32)> = items
                    .iter()
                    .filter_map(|item| match (item.start.date_time, item.end.date_time) {
                        (Some(start), Some(end)) => Some((
                            start.with_timezone(&self.timezone).hour(),
                            end.with_timezone(&self.timezone).hour(),
                        )),
                        _ => None,
                    })
                    .collect();
                free_slots(&busy)
            }
            Err(err) => {
                warn!(error = %err, %date, "Failed to get availability, using mock slots");
                mock_availability()
            }
        }
    }

    fn remote(&self) -> Option<&Arc<dyn CalendarClient>> {
        self.client.as_ref().filter(|_| self.is_authenticated())
    }

    fn insert_request(&self, event: &NewCalendarEvent) -> InsertEventRequest {
        let time_zone = self.timezone.name().to_string();
        InsertEventRequest {
            calendar_id: self.calendar_id.clone(),
            resource: EventResource {
                summary: event.title.clone(),
                description: event.description.clone(),
                start: EventDateTime {
                    date_time: event.start,
                    time_zone: time_zone.clone(),
                },
                end: EventDateTime {
                    date_time: event.end,
                    time_zone,
                },
                reminders: EventReminders::standard(),
            },
        }
    }
}

pub fn mock_availability() -> Vec<String> {
    MOCK_AVAILABILITY.iter().map(|slot| slot.to_string()).collect()
}

/// Hours from 09:00 through 18:00 not covered by any `[start, end)` pair.
pub fn free_slots(busy: &[(u32, u32)]) -> Vec<String> {
    (WORKDAY_START_HOUR..=WORKDAY_END_HOUR)
        .filter(|hour| !busy.iter().any(|(start, end)| hour >= start && hour < end))
        .map(|hour| format!("{:02}:00", hour))
        .collect()
}
