use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::events::queue::{ChatEvent, EventBus};
use crate::models::message::Message;
use crate::service::responder::Responder;

pub struct PendingReply {
    pub user_message: Message,
    pub reply: JoinHandle<Message>,
}

/// Message history plus the simulated "assistant is typing" delay.
///
/// Replies are not serialised: two quick sends each get their own delayed
/// reply, and the history records them in completion order.
#[derive(Clone)]
pub struct ChatSession {
    history: Arc<Mutex<Vec<Message>>>,
    pending_replies: Arc<AtomicUsize>,
    responder: Arc<Responder>,
    bus: EventBus,
    typing_delay: Duration,
}

impl ChatSession {
    pub fn new(responder: Arc<Responder>, bus: EventBus, typing_delay: Duration) -> Self {
        Self {
            history: Arc::new(Mutex::new(Vec::new())),
            pending_replies: Arc::new(AtomicUsize::new(0)),
            responder,
            bus,
            typing_delay,
        }
    }

    pub fn responder(&self) -> &Arc<Responder> {
        &self.responder
    }

    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.pending_replies.load(Ordering::SeqCst) > 0
    }

    /// Returns `None` for blank input, which is never recorded.
    pub async fn send(&self, text: &str) -> Option<PendingReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let user_message = Message::user(text);
        self.append(user_message.clone()).await;
        self.pending_replies.fetch_add(1, Ordering::SeqCst);
        self.bus.emit(ChatEvent::TypingChanged { typing: true }).await;

        let session = self.clone();
        let text = text.to_string();
        let reply = tokio::spawn(async move {
            sleep(session.typing_delay).await;
            let reply = session.responder.respond(&text).await;
            debug!(intent = ?reply.intent, "Assistant replied");
            let message = Message::ai(&reply.text, reply.kind);
            session.append(message.clone()).await;
            if session.pending_replies.fetch_sub(1, Ordering::SeqCst) == 1 {
                session.bus.emit(ChatEvent::TypingChanged { typing: false }).await;
            }
            message
        });

        Some(PendingReply {
            user_message,
            reply,
        })
    }

    async fn append(&self, message: Message) {
        {
            let mut history = self.history.lock().await;
            history.push(message.clone());
        }
        self.bus.emit(ChatEvent::MessageAppended { message }).await;
    }
}
