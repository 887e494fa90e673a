//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::{GallerySession, Ray, SessionInfo, SnapshotBuilder, Vec3};
use crate::util::rate_limit::FireRateLimiter;
use crate::util::time::{sleep_until_deadline, unix_millis};
use crate::ws::protocol::{ClientMsg, ProtocolError, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    let seed = state.next_seed();
    let (mut ws_sink, ws_stream) = socket.split();

    if let Err(e) = state.sessions.register(SessionInfo::new(session_id, seed)) {
        warn!(session_id = %session_id, error = %e, "Rejecting connection");
        let _ = send_msg(&mut ws_sink, &ServerMsg::from(e)).await;
        let _ = ws_sink.close().await;
        return;
    }

    info!(session_id = %session_id, seed, "New gallery session");

    let session = GallerySession::new(session_id, seed);
    let rate_limiter = FireRateLimiter::new(state.config.fire_rate_limit);

    run_session(session, rate_limiter, ws_sink, ws_stream).await;

    state.sessions.remove(&session_id);
    info!(session_id = %session_id, "Gallery session closed");
}

/// Drive one session until the socket closes. The session is owned by this
/// task alone; feedback expiry is raced against incoming frames.
async fn run_session(
    mut session: GallerySession,
    rate_limiter: FireRateLimiter,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
) {
    let session_id = session.id();

    let welcome = ServerMsg::Welcome {
        session_id,
        server_time: unix_millis(),
        hud: SnapshotBuilder::hud(),
    };
    let opening = SnapshotBuilder::build(&session, Instant::now());
    for msg in [welcome, opening] {
        if let Err(e) = send_msg(&mut ws_sink, &msg).await {
            error!(session_id = %session_id, error = %e, "Failed to send welcome");
            return;
        }
    }

    loop {
        let replies = tokio::select! {
            incoming = ws_stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&mut session, &rate_limiter, &text, Instant::now())
                    }
                    Some(Ok(Message::Binary(_))) => {
                        warn!(session_id = %session_id, "Received binary message, ignoring");
                        continue;
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) => {
                        info!(session_id = %session_id, "Client initiated close");
                        break;
                    }
                    Some(Err(e)) => {
                        error!(session_id = %session_id, error = %e, "WebSocket error");
                        break;
                    }
                    None => break,
                }
            }
            _ = sleep_until_deadline(session.feedback_deadline()) => {
                expire_feedback(&mut session, Instant::now())
            }
        };

        for msg in &replies {
            if let Err(e) = send_msg(&mut ws_sink, msg).await {
                debug!(session_id = %session_id, error = %e, "WebSocket send failed");
                return;
            }
        }
    }
}

/// Turn one text frame into the replies owed to the client
pub fn handle_text(
    session: &mut GallerySession,
    rate_limiter: &FireRateLimiter,
    text: &str,
    now: Instant,
) -> Vec<ServerMsg> {
    let msg = match serde_json::from_str::<ClientMsg>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "Failed to parse client message");
            return vec![ProtocolError::from(e).into()];
        }
    };

    match msg {
        ClientMsg::Fire {
            seq,
            origin,
            direction,
        } => {
            if !rate_limiter.check_fire() {
                warn!(session_id = %session.id(), seq, "Rate limited fire message");
                return Vec::new();
            }

            let ray = match parse_ray(origin, direction) {
                Ok(ray) => ray,
                Err(e) => {
                    warn!(session_id = %session.id(), seq, error = %e, "Rejected fire message");
                    return vec![e.into()];
                }
            };

            let outcome = session.fire(&ray, now);
            vec![
                ServerMsg::ShotResult {
                    seq,
                    accepted: outcome.accepted,
                    result: outcome.result,
                    target_id: outcome.target,
                },
                SnapshotBuilder::build(session, now),
            ]
        }
        ClientMsg::Ping { t } => vec![ServerMsg::Pong { t }],
    }
}

/// Clear an expired feedback message and tell the client
pub fn expire_feedback(session: &mut GallerySession, now: Instant) -> Vec<ServerMsg> {
    if session.expire_feedback(now) {
        vec![ServerMsg::FeedbackCleared, SnapshotBuilder::build(session, now)]
    } else {
        Vec::new()
    }
}

fn parse_ray(origin: [f32; 3], direction: [f32; 3]) -> Result<Ray, ProtocolError> {
    Ray::new(Vec3::from(origin), Vec3::from(direction)).ok_or(ProtocolError::InvalidRay)
}

/// Send a message over WebSocket
async fn send_msg(sink: &mut SplitSink<WebSocket, Message>, msg: &ServerMsg) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
