//! Per-connection WebSocket handler.
//!
//! Keeps framing and heartbeats at the edge while the domain pushes
//! snapshots and notices through the shared hub. Pings every 5s and
//! considers a connection idle after 10s without client traffic; tests
//! shorten both so feedback stays fast.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use tokio::sync::broadcast::error::RecvError;
use tokio::time;
use tracing::warn;

use crate::domain::notice::Notice;

use super::messages::{ConnectionState, ServerFrame};
use super::state::WsState;

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(state: WsState, session: Session, stream: MessageStream) {
    DashboardSession::new(state).run(session, stream).await;
}

enum SessionEnd {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    HubClosed,
    Network,
}

struct DashboardSession {
    state: WsState,
}

impl DashboardSession {
    fn new(state: WsState) -> Self {
        Self { state }
    }

    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        let mut frames = self.state.subscribe();
        let mut notices = self.state.notices.subscribe();
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        if self
            .send_frame(
                &mut session,
                &ServerFrame::ConnectionStatus {
                    state: ConnectionState::Connected,
                },
            )
            .await
            .is_err()
        {
            return;
        }

        let end = loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_client_message(&mut session, &mut last_heartbeat, message).await
                }
                frame = frames.recv() => {
                    self.forward_frame(&mut session, frame).await
                }
                notice = notices.recv() => {
                    self.forward_notice(&mut session, notice).await
                }
            };
            if let Err(end) = result {
                break end;
            }
        };

        self.close(session, end).await;
    }

    async fn handle_heartbeat(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionEnd> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionEnd::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(|_| SessionEnd::Network)
    }

    async fn handle_client_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, actix_ws::ProtocolError>>,
    ) -> Result<(), SessionEnd> {
        let Some(message) = message else {
            return Err(SessionEnd::StreamClosed);
        };
        let message = message.map_err(|error| {
            warn!(error = %error, "WebSocket protocol error");
            SessionEnd::StreamClosed
        })?;
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(|_| SessionEnd::Network)
            }
            Message::Close(reason) => Err(SessionEnd::ClientClosed(reason)),
            // The dashboard only listens; any other traffic just proves
            // the client is alive.
            _ => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
        }
    }

    async fn forward_frame(
        &self,
        session: &mut Session,
        frame: Result<ServerFrame, RecvError>,
    ) -> Result<(), SessionEnd> {
        match frame {
            Ok(frame) => self.send_frame(session, &frame).await,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "session lagged behind the frame hub");
                Ok(())
            }
            Err(RecvError::Closed) => Err(SessionEnd::HubClosed),
        }
    }

    async fn forward_notice(
        &self,
        session: &mut Session,
        notice: Result<Notice, RecvError>,
    ) -> Result<(), SessionEnd> {
        match notice {
            Ok(notice) => {
                self.send_frame(session, &ServerFrame::Notice { notice })
                    .await
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "session lagged behind the notice hub");
                Ok(())
            }
            Err(RecvError::Closed) => Err(SessionEnd::HubClosed),
        }
    }

    async fn send_frame(
        &self,
        session: &mut Session,
        frame: &ServerFrame,
    ) -> Result<(), SessionEnd> {
        match serde_json::to_string(frame) {
            Ok(body) => session.text(body).await.map_err(|_| SessionEnd::Network),
            Err(error) => {
                warn!(error = %error, "failed to serialize dashboard frame");
                Ok(())
            }
        }
    }

    async fn close(&self, session: Session, end: SessionEnd) {
        let reason = match end {
            SessionEnd::HeartbeatTimeout => Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            }),
            SessionEnd::HubClosed => Some(CloseReason {
                code: CloseCode::Away,
                description: Some("server shutting down".to_owned()),
            }),
            SessionEnd::ClientClosed(reason) => reason,
            SessionEnd::StreamClosed | SessionEnd::Network => None,
        };
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "failed to close WebSocket session");
        }
    }
}
