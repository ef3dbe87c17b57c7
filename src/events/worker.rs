use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::events::queue::ChatEvent;
use crate::models::message::Sender;

#[async_trait]
pub trait ChatEventSink: Send + Sync {
    async fn deliver(&self, event: ChatEvent);
}

pub async fn run_event_worker(mut rx: mpsc::Receiver<ChatEvent>, sink: Arc<dyn ChatEventSink>) {
    while let Some(event) = rx.recv().await {
        sink.deliver(event).await;
    }
    debug!("Event bus closed, worker exiting");
}

/// Prints assistant replies and alarms to the terminal. User messages are
/// already on screen from the prompt.
pub struct ConsoleEventSink;

#[async_trait]
impl ChatEventSink for ConsoleEventSink {
    async fn deliver(&self, event: ChatEvent) {
        match event {
            ChatEvent::MessageAppended { message } => {
                if message.sender == Sender::Ai {
                    println!(
                        "[{}] assistant: {}",
                        message.timestamp.format("%H:%M"),
                        message.text
                    );
                }
            }
            ChatEvent::TypingChanged { typing } => {
                if typing {
                    println!("assistant is typing...");
                }
            }
            ChatEvent::AlarmFired { title, body } => {
                println!("{}\n{}", title, body);
            }
            ChatEvent::AudioCue => {
                // BEL is the terminal's audio cue.
                print!("\x07");
                let _ = std::io::stdout().flush();
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FiredAlarm {
    pub title: String,
    pub body: String,
    pub fired_at: DateTime<Utc>,
}

/// Keeps fired alarms so a polling widget can pick them up.
#[derive(Clone, Default)]
pub struct NotificationFeed {
    fired: Arc<Mutex<Vec<FiredAlarm>>>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fired(&self) -> Vec<FiredAlarm> {
        self.fired.lock().await.clone()
    }
}

#[async_trait]
impl ChatEventSink for NotificationFeed {
    async fn deliver(&self, event: ChatEvent) {
        match event {
            ChatEvent::AlarmFired { title, body } => {
                info!(%title, "Alarm fired");
                let mut fired = self.fired.lock().await;
                fired.push(FiredAlarm {
                    title,
                    body,
                    fired_at: Utc::now(),
                });
            }
            other => debug!(?other, "Chat event"),
        }
    }
}
