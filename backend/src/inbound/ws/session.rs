//! Per-connection WebSocket handler.
//!
//! Pushes an `activeRound` frame on connect and after every change the
//! follower observes. The public contract pings every 5s and considers a
//! connection idle after 10s without client traffic. Tests shorten these
//! intervals to speed up feedback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use mockable::Clock;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{ActiveRoundFollower, ActiveRoundUpdate};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    follower: ActiveRoundFollower,
    clock: Arc<dyn Clock>,
    session: Session,
    stream: MessageStream,
) {
    WsSession { follower, clock }.run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    FeedClosed,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    follower: ActiveRoundFollower,
    clock: Arc<dyn Clock>,
}

impl WsSession {
    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut updates = self.follower.subscribe();

        let initial = updates.borrow_and_update().clone();
        let mut result = self
            .send_update(&mut session, initial)
            .await
            .map_err(SessionError::Network);

        while result.is_ok() {
            result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                changed = updates.changed() => {
                    self.handle_round_change(&mut session, &mut updates, changed.is_ok())
                        .await
                }
            };
        }

        if let Err(error) = result {
            self.log_shutdown_reason(&error);
            let close_action = self.close_action_for(&error);
            self.close_session_if_needed(session, close_action).await;
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_round_change(
        &self,
        session: &mut Session,
        updates: &mut watch::Receiver<ActiveRoundUpdate>,
        follower_alive: bool,
    ) -> Result<(), SessionError> {
        if !follower_alive {
            return Err(SessionError::FeedClosed);
        }
        let update = updates.borrow_and_update().clone();
        self.send_update(session, update)
            .await
            .map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Refresh) => {
                let update = ActiveRoundUpdate {
                    trigger: None,
                    ..self.follower.current()
                };
                self.send_update(session, update)
                    .await
                    .map_err(SessionError::Network)
            }
            Err(error) => {
                warn!(error = %error, "unrecognised client frame");
                Err(SessionError::InvalidPayload)
            }
        }
    }

    async fn send_update(
        &self,
        session: &mut Session,
        update: ActiveRoundUpdate,
    ) -> Result<(), Closed> {
        let message = ServerMessage::active_round(update.trigger, update.active, self.clock.utc());
        match serde_json::to_string(&message) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "could not encode active round frame");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("live round client went quiet; closing");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "could not push live round frame; closing");
            }
            SessionError::FeedClosed => {
                warn!("change feed closed; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => debug!("live round stream ended"),
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::FeedClosed => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Away,
                description: Some("server shutting down".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "close frame not delivered");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
