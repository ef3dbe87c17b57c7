use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::info;

use crate::events::queue::{ChatEvent, EventBus};

pub const ALARM_BODY: &str = "Your scheduled event is starting now!";

/// Where a fired alarm ends up.
#[async_trait]
pub trait AlarmSink: Send + Sync {
    async fn request_permission(&self) -> bool;
    async fn show_notification(&self, title: &str, body: &str);
    async fn play_audio_cue(&self);
}

/// Publishes alarms on the chat event bus.
pub struct BusAlarmSink {
    bus: EventBus,
    enabled: bool,
}

impl BusAlarmSink {
    pub fn new(bus: EventBus, enabled: bool) -> Self {
        Self { bus, enabled }
    }
}

#[async_trait]
impl AlarmSink for BusAlarmSink {
    async fn request_permission(&self) -> bool {
        self.enabled
    }

    async fn show_notification(&self, title: &str, body: &str) {
        self.bus
            .emit(ChatEvent::AlarmFired {
                title: title.to_string(),
                body: body.to_string(),
            })
            .await;
    }

    async fn play_audio_cue(&self) {
        self.bus.emit(ChatEvent::AudioCue).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmOutcome {
    Armed,
    PermissionDenied,
    InPast,
}

pub struct NotificationScheduler {
    sink: Arc<dyn AlarmSink>,
    permission: Mutex<Option<bool>>,
}

impl NotificationScheduler {
    pub fn new(sink: Arc<dyn AlarmSink>) -> Self {
        Self {
            sink,
            permission: Mutex::new(None),
        }
    }

    pub async fn create_alarm(&self, title: &str, at: DateTime<Utc>) -> AlarmOutcome {
        self.create_alarm_at(title, at, Utc::now()).await
    }

    /// Arms a single deferred notification for `at`. Nothing is armed, and
    /// nothing reaches the user, when `at` is not after `now`.
    pub async fn create_alarm_at(
        &self,
        title: &str,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AlarmOutcome {
        if !self.permission_granted().await {
            info!("Notification permission denied");
            return AlarmOutcome::PermissionDenied;
        }

        let delay = match (at - now).to_std() {
            Ok(delay) if !delay.is_zero() => delay,
            _ => {
                info!(%title, %at, "Event time is in the past, no alarm set");
                return AlarmOutcome::InPast;
            }
        };

        let sink = self.sink.clone();
        let notification_title = format!("📅 {}", title);
        tokio::spawn(async move {
            sleep(delay).await;
            sink.show_notification(&notification_title, ALARM_BODY).await;
            sink.play_audio_cue().await;
        });

        info!(%title, %at, "Alarm set");
        AlarmOutcome::Armed
    }

    async fn permission_granted(&self) -> bool {
        let mut permission = self.permission.lock().await;
        if let Some(granted) = *permission {
            return granted;
        }
        let granted = self.sink.request_permission().await;
        *permission = Some(granted);
        granted
    }
}
