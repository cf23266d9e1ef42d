//! Live inquiry feed over WebSocket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::AppState;
use crate::triage::{InquiryEvent, InquiryProcessor};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("Live-feed client connecting");
    ws.on_upgrade(move |socket| handle_socket(socket, state.processor, state.feed_sync_limit))
}

async fn handle_socket(mut socket: WebSocket, processor: Arc<InquiryProcessor>, sync_limit: usize) {
    // Subscribe before the snapshot so nothing logged in between is lost
    let mut rx = processor.subscribe();

    if !send_sync(&mut socket, &processor, sync_limit).await {
        warn!("Failed to send initial sync, client disconnected");
        return;
    }
    info!("Live-feed client connected");

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_event(&mut socket, &event).await {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(missed = n, "Live-feed client lagged behind broadcast");
                        if !send_sync(&mut socket, &processor, sync_limit).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        debug!(text = %text.as_str(), "Ignoring client message on read-only feed");
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Live-feed client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("Live-feed connection closed");
}

/// Push a snapshot of recent inquiries. Returns `false` once the client is gone.
async fn send_sync(socket: &mut WebSocket, processor: &InquiryProcessor, limit: usize) -> bool {
    match processor.sync_event(limit).await {
        Ok(event) => send_event(socket, &event).await,
        Err(e) => {
            warn!(error = %e, "Could not load inquiries for sync");
            true
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &InquiryEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize live-feed event");
            true
        }
    }
}
