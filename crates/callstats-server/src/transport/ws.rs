//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS, one hub peer per socket
//! - Decode text envelopes and apply room join/leave to the hub
//! - Lifecycle: ping + idle timeout
//! - Always disconnect the peer from the hub when the socket ends, so its
//!   `left` event fires exactly once

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::time::{Duration, Instant};

use callstats_core::error::{Result, StatsError};
use callstats_core::protocol::text::{Envelope, RoomCommand, SysMessage};

use crate::app_state::AppState;
use crate::realtime::{Peer, SignalingHub};

fn sys_error_json(code: &str, msg: &str) -> Result<String> {
    SysMessage::new("error")
        .data(json!({ "code": code, "msg": msg }))
        .to_json()
}

pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        let hub = app.hub();
        let peer = hub.connect();
        if let Err(e) = run_session(&app, &peer, socket).await {
            tracing::debug!(peer = %peer.id(), error = %e, "session ended with error");
        }
        hub.disconnect(&peer);
    })
}

/// Apply one text frame and build the reply. Client errors become `sys.error`
/// replies instead of ending the session.
pub fn handle_text(hub: &SignalingHub, peer: &Peer, s: &str) -> Result<String> {
    let cmd = Envelope::parse(s).and_then(|env| env.room_command());
    match cmd {
        Ok(Some(RoomCommand::Join(room))) => {
            hub.join(&room, peer);
            SysMessage::new("joined").room(&room).to_json()
        }
        Ok(Some(RoomCommand::Leave(room))) => {
            hub.leave(&room, peer);
            SysMessage::new("left").room(&room).to_json()
        }
        Ok(None) => sys_error_json("BAD_REQUEST", "unknown svc"),
        Err(e) => sys_error_json(e.client_code().as_str(), &e.to_string()),
    }
}

async fn run_session(app: &AppState, peer: &Peer, socket: WebSocket) -> Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let closed = |_: axum::Error| StatsError::Internal("socket closed".into());

    let authed = SysMessage::new("authed")
        .data(json!({ "peer": peer.id() }))
        .to_json()?;
    ws_tx.send(Message::Text(authed)).await.map_err(closed)?;

    let sig = &app.cfg().signaling;
    let ping_every = Duration::from_millis(sig.ping_interval_ms);
    let idle_timeout = Duration::from_millis(sig.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            incoming = ws_rx.next() => {
                let Some(Ok(msg)) = incoming else { break; };
                last_activity = Instant::now();

                let reply = match msg {
                    Message::Text(s) => handle_text(&app.hub(), peer, &s)?,
                    Message::Binary(_) => sys_error_json("BAD_REQUEST", "binary frames are not supported")?,
                    Message::Ping(payload) => {
                        ws_tx.send(Message::Pong(payload)).await.map_err(closed)?;
                        continue;
                    }
                    Message::Pong(_) => continue,
                    Message::Close(_) => break,
                };
                ws_tx.send(Message::Text(reply)).await.map_err(closed)?;
            }

            _ = ping_tick.tick() => {
                ws_tx.send(Message::Ping(Vec::new())).await.map_err(closed)?;
            }

            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    let _ = ws_tx.send(Message::Text(sys_error_json("TIMEOUT", "idle timeout")?)).await;
                    break;
                }
            }
        }
    }

    Ok(())
}
