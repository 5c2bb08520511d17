//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::room::{GameSession, RoomError};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use hexafield_core::UserId;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// All active sessions
    pub sessions: DashMap<String, GameSession>,
    /// Mapping from user ID to their session ID
    pub user_sessions: DashMap<UserId, String>,
    /// Mapping from user ID to their message sender
    pub user_senders: DashMap<UserId, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            user_sessions: DashMap::new(),
            user_senders: DashMap::new(),
        }
    }

    /// Send a message to a specific user.
    pub fn send_to_user(&self, user: &UserId, msg: ServerMessage) {
        if let Some(sender) = self.user_senders.get(user) {
            let _ = sender.send(msg);
        }
    }

    /// Send to every member of an already locked session.
    fn send_to_members(&self, session: &GameSession, msg: &ServerMessage) {
        for member in &session.members {
            self.send_to_user(member, msg.clone());
        }
    }

    fn send_error(&self, user: &UserId, err: RoomError) {
        self.send_to_user(
            user,
            ServerMessage::Error {
                message: err.to_string(),
            },
        );
    }

    fn session_of(&self, user: &UserId) -> Option<String> {
        self.user_sessions.get(user).map(|id| id.value().clone())
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Hexafield relay listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let user_id = UserId::new(Uuid::new_v4().to_string());

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.user_senders.insert(user_id.clone(), tx);

    let welcome = ServerMessage::Welcome {
        user_id: user_id.clone(),
    };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text.into())).await?;

    // Forward queued messages to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if ws_sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Could not encode outgoing message: {}", e),
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(&user_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", user_id, e);
                    state.send_error(&user_id, RoomError::MalformedAction(e.to_string()));
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", user_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_user(&user_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", user_id, e);
                break;
            }
            _ => {}
        }
    }

    leave_session(&user_id, &state);
    state.user_senders.remove(&user_id);
    send_task.abort();

    info!("Connection closed for {}", user_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(user_id: &UserId, msg: ClientMessage, state: &Arc<ServerState>) {
    match msg {
        ClientMessage::JoinSession { session_id, config } => {
            if let Some(current) = state.session_of(user_id) {
                state.send_error(user_id, RoomError::AlreadyInSession(current));
                return;
            }

            let mut session = state
                .sessions
                .entry(session_id.clone())
                .or_insert_with(|| GameSession::new(session_id.clone(), config.unwrap_or_default()));

            match session.add_member(user_id.clone()) {
                Ok(replay) => {
                    state.user_sessions.insert(user_id.clone(), session_id.clone());
                    info!(
                        "{} joined session {} ({} actions to replay)",
                        user_id,
                        session_id,
                        replay.len()
                    );

                    // Replay before releasing the lock so no live action slips in ahead of it
                    state.send_to_user(user_id, ServerMessage::Replay { actions: replay });
                    let joined = ServerMessage::Joined {
                        session: session.to_info(),
                    };
                    state.send_to_members(&session, &joined);
                }
                Err(e) => {
                    let empty = session.member_count() == 0;
                    drop(session);
                    if empty {
                        state.sessions.remove(&session_id);
                    }
                    state.send_error(user_id, e);
                }
            }
        }

        ClientMessage::LeaveSession => {
            if leave_session(user_id, state) {
                state.send_to_user(user_id, ServerMessage::Left);
            } else {
                state.send_error(user_id, RoomError::NotInSession);
            }
        }

        ClientMessage::Dispatch { action } => {
            let Some(session_id) = state.session_of(user_id) else {
                state.send_error(user_id, RoomError::NotInSession);
                return;
            };
            let Some(mut session) = state.sessions.get_mut(&session_id) else {
                state.send_error(user_id, RoomError::SessionNotFound);
                return;
            };

            match session.sequence(action) {
                Ok(sequenced) => {
                    // Broadcast under the lock to keep delivery in sequence order
                    let msg = ServerMessage::Action {
                        seq: sequenced.seq,
                        action: sequenced.action,
                    };
                    state.send_to_members(&session, &msg);
                }
                Err(e) => {
                    drop(session);
                    warn!("Rejected action from {} in {}: {}", user_id, session_id, e);
                    state.send_error(user_id, e);
                }
            }
        }

        ClientMessage::Snapshot => {
            let Some(session_id) = state.session_of(user_id) else {
                state.send_error(user_id, RoomError::NotInSession);
                return;
            };
            let snapshot = state
                .sessions
                .get(&session_id)
                .ok_or(RoomError::SessionNotFound)
                .and_then(|session| session.snapshot());
            match snapshot {
                Ok(world) => state.send_to_user(user_id, ServerMessage::Snapshot { state: world }),
                Err(e) => state.send_error(user_id, e),
            }
        }

        ClientMessage::Ping => {
            state.send_to_user(user_id, ServerMessage::Pong);
        }
    }
}

/// Remove a user from their session, dropping the session once empty.
///
/// Returns false if the user was not in a session.
fn leave_session(user_id: &UserId, state: &Arc<ServerState>) -> bool {
    let Some((_, session_id)) = state.user_sessions.remove(user_id) else {
        return false;
    };

    let should_remove = match state.sessions.get_mut(&session_id) {
        Some(mut session) => {
            let is_empty = session.remove_member(user_id).unwrap_or(false);
            if !is_empty {
                let joined = ServerMessage::Joined {
                    session: session.to_info(),
                };
                state.send_to_members(&session, &joined);
            }
            is_empty
        }
        None => false,
    };

    if should_remove {
        state.sessions.remove(&session_id);
        info!("Session {} closed", session_id);
    }
    true
}
