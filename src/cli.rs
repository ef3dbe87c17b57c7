use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use tracing::error;

use crate::config::Settings;
use crate::events::queue::EventBus;
use crate::events::worker::{run_event_worker, ConsoleEventSink};
use crate::runtime::{build_app, App, EVENT_BUFFER};
use crate::service::date_parser::{extract_duration, parse_date_time};
use crate::service::responder::extract_title;
use crate::service::routing::route_intent;
use crate::service::welcome::{welcome, quick_action};

#[derive(Parser)]
#[command(name = "smart-scheduler", about = "Conversational appointment booking assistant")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively (default).
    Chat,
    /// Send a single message and print the assistant's reply.
    Send { text: String },
    /// List free slots for a date (YYYY-MM-DD).
    Availability { date: NaiveDate },
    /// Show how a message would be understood, without booking anything.
    Parse { text: String },
}

pub async fn cli(settings: Settings, cli: Cli) {
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat(&settings).await,
        Commands::Send { text } => send_once(&settings, &text).await,
        Commands::Availability { date } => {
            let app = detached_app(&settings);
            let slots = app.session.responder().gateway().get_availability(date).await;
            println!("Available on {}: {}", date, slots.join(", "));
        }
        Commands::Parse { text } => explain(&settings, &text),
    }
}

/// An app whose event bus has no listener; events are dropped.
fn detached_app(settings: &Settings) -> App {
    let (bus, _rx) = EventBus::new(1);
    build_app(settings, bus)
}

async fn send_once(settings: &Settings, text: &str) {
    let app = detached_app(settings);
    let Some(pending) = app.session.send(text).await else {
        println!("Nothing to send.");
        return;
    };
    match pending.reply.await {
        Ok(message) => println!("{}", message.text),
        Err(err) => error!(error = %err, "Reply task failed"),
    }
}

fn explain(settings: &Settings, text: &str) {
    let now = Utc::now().with_timezone(&settings.timezone);
    let routing = route_intent(text);
    println!("intent:   {:?}", routing.intent);
    println!("when:     {}", parse_date_time(text, now).to_rfc3339());
    println!(
        "title:    {}",
        extract_title(text).unwrap_or_else(|| "-".to_string())
    );
    match extract_duration(text) {
        Some(minutes) => println!("duration: {} minutes", minutes),
        None => println!("duration: default ({} minutes)", settings.default_duration_minutes),
    }
}

async fn chat(settings: &Settings) {
    let (bus, rx) = EventBus::new(EVENT_BUFFER);
    let app = build_app(settings, bus);
    let worker = tokio::spawn(run_event_worker(rx, Arc::new(ConsoleEventSink)));

    print_welcome();
    loop {
        let answer = tokio::task::spawn_blocking(|| {
            Text::new("you:")
                .with_help_message("1-4 for a quick action, /auth, /events, /booking, /theme, /quit")
                .prompt()
        })
        .await;

        let input = match answer {
            Ok(Ok(input)) => input,
            Ok(Err(InquireError::OperationCanceled | InquireError::OperationInterrupted)) => break,
            Ok(Err(err)) => {
                error!(error = %err, "Failed to read input");
                break;
            }
            Err(err) => {
                error!(error = %err, "Prompt task failed");
                break;
            }
        };

        match input.trim() {
            "/quit" | "/exit" => break,
            "/auth" => {
                let gateway = app.session.responder().gateway();
                println!("Connecting calendar...");
                gateway.authenticate().await;
                println!("Calendar connected.");
            }
            "/events" => {
                let events = app.session.responder().gateway().events().await;
                if events.is_empty() {
                    println!("No events booked yet.");
                }
                for event in events {
                    println!(
                        "{}  {} -> {}",
                        event.title,
                        event.start.with_timezone(&settings.timezone).format("%Y-%m-%d %H:%M"),
                        event.end.with_timezone(&settings.timezone).format("%H:%M")
                    );
                }
            }
            "/booking" => {
                let booking = app.session.responder().booking().await;
                match serde_json::to_string_pretty(&booking) {
                    Ok(body) => println!("{}", body),
                    Err(err) => error!(error = %err, "Failed to render booking"),
                }
            }
            "/theme" => {
                let theme = app.theme.toggle();
                println!("Theme: {:?}", theme);
            }
            other => {
                let text = quick_action(other).unwrap_or(other);
                if text != other {
                    println!("you: {}", text);
                }
                let _ = app.session.send(text).await;
            }
        }
    }

    worker.abort();
}

fn print_welcome() {
    let welcome = welcome();
    println!("{}\n", welcome.greeting);
    for (idx, action) in welcome.quick_actions.iter().enumerate() {
        println!("  {}) {}", idx + 1, action.label);
    }
    println!("\n{}\n", welcome.hint);
}
