use serde::Serialize;
use tokio::sync::mpsc;

use crate::models::message::Message;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatEvent {
    MessageAppended { message: Message },
    TypingChanged { typing: bool },
    AlarmFired { title: String, body: String },
    AudioCue,
}

#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::Sender<ChatEvent>,
}

impl EventBus {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ChatEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn emit(&self, event: ChatEvent) {
        let _ = self.tx.send(event).await;
    }
}
