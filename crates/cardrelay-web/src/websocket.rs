//! WebSocket push channel.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use cardrelay_core::{ClientCommand, ClientFrame, RelayEvent};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::{AppState, ChannelId};

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle one push channel from open to close.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let channel_id = state.channels.register(tx);
    info!(%channel_id, members = state.channels.len(), "WebSocket client connected");

    if let Err(e) = state
        .channels
        .send_to(&channel_id, &RelayEvent::connection_established())
    {
        warn!(%channel_id, error = %e, "Failed to queue greeting");
    }

    // Drain this channel's queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => handle_frame(&recv_state, &channel_id, text.as_str()),
                Ok(Message::Close(_)) => {
                    debug!(%channel_id, "WebSocket client sent close frame");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(%channel_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.channels.unregister(&channel_id);
    info!(%channel_id, members = state.channels.len(), "WebSocket client disconnected");
}

/// React to one text frame. Replies go to the sending channel only.
fn handle_frame(state: &AppState, channel_id: &ChannelId, text: &str) {
    let frame = match ClientFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(%channel_id, error = %e, "Ignoring malformed message");
            return;
        }
    };

    let reply = match frame.command() {
        ClientCommand::Ping => RelayEvent::pong(),
        ClientCommand::Register { device_id } => {
            info!(%channel_id, %device_id, "Client registered");
            RelayEvent::registration_acknowledged(device_id)
        }
        ClientCommand::Unknown(kind) => {
            debug!(%channel_id, kind = %kind, "Ignoring unknown message type");
            return;
        }
    };

    if let Err(e) = state.channels.send_to(channel_id, &reply) {
        debug!(%channel_id, error = %e, "Reply not delivered");
    }
}
