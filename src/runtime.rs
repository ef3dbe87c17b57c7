use std::sync::Arc;

use tracing::info;

use crate::clients::google_calendar::GoogleCalendarClient;
use crate::config::Settings;
use crate::events::queue::EventBus;
use crate::events::worker::{run_event_worker, NotificationFeed};
use crate::handlers::chat::ChatSession;
use crate::handlers::http::{self, AppState};
use crate::service::alarm::{BusAlarmSink, NotificationScheduler};
use crate::service::calendar_gateway::CalendarGateway;
use crate::service::responder::Responder;
use crate::service::routing::HeuristicRouter;
use crate::service::theme::{InMemoryThemeStore, ThemeStore};

pub const EVENT_BUFFER: usize = 64;

pub struct App {
    pub session: ChatSession,
    pub theme: Arc<dyn ThemeStore>,
}

/// Wires the chat to its calendar gateway and theme store.
pub fn build_app(settings: &Settings, bus: EventBus) -> App {
    let alarm_sink = Arc::new(BusAlarmSink::new(bus.clone(), settings.notifications_enabled));
    let alarms = Arc::new(NotificationScheduler::new(alarm_sink));

    let mut gateway =
        CalendarGateway::new(alarms, settings.timezone).with_auth_delay(settings.auth_delay);
    match &settings.calendar_access_token {
        Some(token) => {
            info!(calendar_id = %settings.calendar_id, "Using Google Calendar client");
            let client = GoogleCalendarClient::new(token.clone());
            gateway = gateway.with_client(Arc::new(client), settings.calendar_id.clone());
        }
        None => info!("No calendar access token configured, using mock calendar"),
    }

    let responder = Arc::new(Responder::new(
        Arc::new(HeuristicRouter),
        Arc::new(gateway),
        settings.default_duration_minutes,
    ));

    App {
        session: ChatSession::new(responder, bus, settings.typing_delay),
        theme: Arc::new(InMemoryThemeStore::new()),
    }
}

pub async fn run_api(settings: Settings) {
    let (bus, rx) = EventBus::new(EVENT_BUFFER);
    let feed = NotificationFeed::new();
    let app = build_app(&settings, bus);
    let worker = tokio::spawn(run_event_worker(rx, Arc::new(feed.clone())));

    let state = AppState {
        session: app.session,
        theme: app.theme,
        feed,
    };

    info!(addr = %settings.http_bind, "Starting HTTP server");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = warp::serve(http::routes(state)).run(settings.http_bind) => {
            info!("HTTP server stopped");
        }
    }
    worker.abort();
}
