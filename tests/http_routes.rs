use std::time::Duration;

use serde_json::{json, Value};
use smartScheduler::config::Settings;
use smartScheduler::events::queue::EventBus;
use smartScheduler::events::worker::NotificationFeed;
use smartScheduler::handlers::http::{self, AppState};
use smartScheduler::runtime::build_app;
use smartScheduler::service::calendar_gateway::MOCK_AVAILABILITY;
use warp::http::StatusCode;

fn state() -> AppState {
    let settings = Settings {
        typing_delay: Duration::from_millis(10),
        ..Settings::default()
    };
    let (bus, _rx) = EventBus::new(64);
    let app = build_app(&settings, bus);
    AppState {
        session: app.session,
        theme: app.theme,
        feed: NotificationFeed::new(),
    }
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("POST")
        .path("/api/messages")
        .json(&json!({ "text": "   " }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn posted_message_is_accepted_and_listed() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("POST")
        .path("/api/messages")
        .json(&json!({ "text": "hello" }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body = body_json(res.body());
    assert_eq!(body["text"], "hello");
    assert_eq!(body["sender"], "user");
    assert_eq!(body["type"], "text");

    let res = warp::test::request()
        .method("GET")
        .path("/api/messages")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let history = body_json(res.body());
    assert_eq!(history[0]["text"], "hello");
}

#[tokio::test]
async fn malformed_message_body_is_a_bad_request() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("POST")
        .path("/api/messages")
        .header("content-type", "application/json")
        .body("{\"message\": 1}")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(res.body())["error"].is_string());
}

#[tokio::test]
async fn availability_lists_mock_slots_for_a_valid_date() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("GET")
        .path("/api/calendar/availability?date=2026-02-10")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["date"], "2026-02-10");
    assert_eq!(body["slots"], json!(MOCK_AVAILABILITY));
}

#[tokio::test]
async fn availability_rejects_an_unparseable_date() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("GET")
        .path("/api/calendar/availability?date=bogus")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert!(body["error"].as_str().unwrap().contains("bogus"));
}

#[tokio::test]
async fn theme_toggle_flips_dark_mode() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("GET")
        .path("/api/theme")
        .reply(&routes)
        .await;
    assert_eq!(body_json(res.body())["is_dark"], false);

    let res = warp::test::request()
        .method("POST")
        .path("/api/theme/toggle")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["theme"], "dark");
    assert_eq!(body["is_dark"], true);
}

#[tokio::test]
async fn read_only_endpoints_report_initial_state() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("GET")
        .path("/api/calendar/events")
        .reply(&routes)
        .await;
    assert_eq!(body_json(res.body()), json!([]));

    let res = warp::test::request()
        .method("GET")
        .path("/api/typing")
        .reply(&routes)
        .await;
    assert_eq!(body_json(res.body())["typing"], false);

    let res = warp::test::request()
        .method("GET")
        .path("/api/welcome")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["quick_actions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_path_is_a_json_not_found() {
    let routes = http::routes(state());

    let res = warp::test::request()
        .method("GET")
        .path("/api/nope")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res.body())["error"], "Not found");
}
