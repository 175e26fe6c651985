use std::{io, net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use log::{error, info, warn};
use serde::Deserialize;
use tokio::{net::TcpListener, signal, sync::mpsc, task::JoinHandle};

use crate::bot::{Bot, MessageEvent};

pub const EVENTS_PATH: &str = "/slack/events";
pub const HELP_PATH: &str = "/help";

#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<Bot>,
    pub queue: mpsc::Sender<MessageEvent>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(EVENTS_PATH, post(handle_events))
        .route(HELP_PATH, post(handle_help))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
}

/// Answers queued messages one at a time, in arrival order.
pub fn spawn_worker(bot: Arc<Bot>, mut queue: mpsc::Receiver<MessageEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = queue.recv().await {
            if let Err(err) = bot.handle_message(&event).await {
                error!("Failed to answer message {}: {err}", event.id);
            }
        }
    })
}

pub async fn serve(addr: SocketAddr, state: AppState) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening at http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
            }
        })
        .await
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Payload {
    UrlVerification {
        challenge: String,
    },
    EventCallback {
        event: InboundEvent,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct InboundEvent {
    #[serde(rename = "type")]
    kind: String,
    subtype: Option<String>,
    channel: Option<String>,
    user: Option<String>,
    text: Option<String>,
    ts: Option<String>,
}

/// Message subtypes that carry no new user text.
const IGNORED_SUBTYPES: &[&str] = &[
    "bot_message",
    "message_changed",
    "message_deleted",
    "message_replied",
    "channel_join",
    "channel_leave",
    "group_join",
    "group_leave",
];

impl InboundEvent {
    /// User messages, including thread broadcasts and file shares.
    fn into_message(self) -> Option<MessageEvent> {
        if self.kind != "message" {
            return None;
        }

        if let Some(subtype) = &self.subtype {
            if IGNORED_SUBTYPES.contains(&subtype.as_str()) {
                return None;
            }
        }

        Some(MessageEvent {
            channel: self.channel?,
            user: self.user?,
            text: self.text.unwrap_or_default(),
            id: self.ts?,
        })
    }
}

async fn handle_events(State(state): State<AppState>, Json(payload): Json<Payload>) -> Response {
    match payload {
        Payload::UrlVerification { challenge } => challenge.into_response(),
        Payload::EventCallback { event } => {
            let Some(message) = event.into_message() else {
                return StatusCode::OK.into_response();
            };

            if state.queue.send(message).await.is_err() {
                error!("Message worker has stopped");
                return StatusCode::SERVICE_UNAVAILABLE.into_response();
            }

            StatusCode::OK.into_response()
        }
        Payload::Other => StatusCode::OK.into_response(),
    }
}

#[derive(Deserialize)]
struct HelpForm {
    channel_id: String,
}

async fn handle_help(State(state): State<AppState>, Form(form): Form<HelpForm>) -> StatusCode {
    match state.bot.help(&form.channel_id).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            warn!("Failed to post help to {}: {err}", form.channel_id);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
