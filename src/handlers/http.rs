//! JSON endpoints polled by the chat widget.

use std::convert::Infallible;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::events::worker::NotificationFeed;
use crate::handlers::chat::ChatSession;
use crate::service::theme::{Theme, ThemeStore};
use crate::service::welcome::welcome;

#[derive(Clone)]
pub struct AppState {
    pub session: ChatSession,
    pub theme: Arc<dyn ThemeStore>,
    pub feed: NotificationFeed,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
struct TypingStatus {
    typing: bool,
}

#[derive(Debug, Serialize)]
struct AuthStatus {
    authenticated: bool,
}

#[derive(Debug, Serialize)]
struct ThemeStatus {
    theme: Theme,
    is_dark: bool,
}

#[derive(Debug, Serialize)]
struct Availability {
    date: NaiveDate,
    slots: Vec<String>,
}

#[derive(Debug)]
struct InvalidDate(String);

impl warp::reject::Reject for InvalidDate {}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let welcome_route = warp::path!("api" / "welcome")
        .and(warp::get())
        .map(|| warp::reply::json(&welcome()));

    let list_messages = warp::path!("api" / "messages")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_messages);

    let post_message = warp::path!("api" / "messages")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(post_message);

    let typing = warp::path!("api" / "typing")
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: AppState| {
            warp::reply::json(&TypingStatus {
                typing: state.session.is_typing(),
            })
        });

    let authenticate = warp::path!("api" / "calendar" / "auth")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(authenticate);

    let events = warp::path!("api" / "calendar" / "events")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_events);

    let availability = warp::path!("api" / "calendar" / "availability")
        .and(warp::get())
        .and(warp::query::<AvailabilityQuery>())
        .and(with_state(state.clone()))
        .and_then(availability);

    let notifications = warp::path!("api" / "notifications")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_notifications);

    let theme = warp::path!("api" / "theme")
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: AppState| warp::reply::json(&theme_status(state.theme.as_ref())));

    let toggle_theme = warp::path!("api" / "theme" / "toggle")
        .and(warp::post())
        .and(with_state(state))
        .map(|state: AppState| {
            state.theme.toggle();
            warp::reply::json(&theme_status(state.theme.as_ref()))
        });

    welcome_route
        .or(list_messages)
        .or(post_message)
        .or(typing)
        .or(authenticate)
        .or(events)
        .or(availability)
        .or(notifications)
        .or(theme)
        .or(toggle_theme)
        .recover(handle_rejection)
}

async fn list_messages(state: AppState) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&state.session.history().await))
}

async fn post_message(body: SendMessage, state: AppState) -> Result<warp::reply::Response, Rejection> {
    match state.session.send(&body.text).await {
        Some(pending) => Ok(warp::reply::with_status(
            warp::reply::json(&pending.user_message),
            StatusCode::ACCEPTED,
        )
        .into_response()),
        None => Ok(error_reply(StatusCode::BAD_REQUEST, "Message text must not be empty").into_response()),
    }
}

async fn authenticate(state: AppState) -> Result<impl Reply, Rejection> {
    let gateway = state.session.responder().gateway();
    gateway.authenticate().await;
    info!("Calendar connected");
    Ok(warp::reply::json(&AuthStatus {
        authenticated: gateway.is_authenticated(),
    }))
}

async fn list_events(state: AppState) -> Result<impl Reply, Rejection> {
    let events = state.session.responder().gateway().events().await;
    Ok(warp::reply::json(&events))
}

async fn availability(query: AvailabilityQuery, state: AppState) -> Result<impl Reply, Rejection> {
    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d")
        .map_err(|_| warp::reject::custom(InvalidDate(query.date.clone())))?;
    let slots = state.session.responder().gateway().get_availability(date).await;
    Ok(warp::reply::json(&Availability { date, slots }))
}

async fn list_notifications(state: AppState) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&state.feed.fired().await))
}

fn theme_status(store: &dyn ThemeStore) -> ThemeStatus {
    ThemeStatus {
        theme: store.theme(),
        is_dark: store.is_dark(),
    }
}

fn error_reply(status: StatusCode, message: &str) -> impl Reply + use<> {
    warp::reply::with_status(
        warp::reply::json(&ErrorMessage {
            error: message.to_string(),
        }),
        status,
    )
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(InvalidDate(raw)) = err.find::<InvalidDate>() {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid date '{}', expected YYYY-MM-DD", raw),
        )
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body_err.to_string())
    } else if let Some(query_err) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, query_err.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        error!(?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    };
    Ok(error_reply(status, &message))
}
