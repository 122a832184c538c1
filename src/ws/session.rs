use crate::db;
use crate::models;
use crate::ws::protocol::{InboundFrame, OutboundFrame, ProtocolError};
use crate::ws::registry::{SessionGuard, SessionRegistry};
use crate::ws::responder::Responder;
use actix::{Actor, ActorContext, ActorFutureExt, AsyncContext, StreamHandler, WrapFuture};
use actix_web_actors::ws;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Typed exit reasons for the session state machine. Each maps onto the
/// close code the peer observes; nothing beyond the code leaks outward.
#[derive(Debug, thiserror::Error)]
pub enum SessionClose {
    #[error("policy violation")]
    PolicyViolation,
    #[error("unsupported frame: {0}")]
    Unsupported(#[from] ProtocolError),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl SessionClose {
    pub fn close_code(&self) -> ws::CloseCode {
        match self {
            SessionClose::PolicyViolation => ws::CloseCode::Policy,
            SessionClose::Unsupported(_) => ws::CloseCode::Unsupported,
            SessionClose::Storage(_) | SessionClose::Internal(_) => ws::CloseCode::Error,
        }
    }

    pub fn reason(&self) -> ws::CloseReason {
        ws::CloseReason {
            code: self.close_code(),
            description: None,
        }
    }
}

/// Per-connection actor owning the websocket. Starts in the authenticated
/// `Open` state when the handshake carried a verified identity, or closes
/// immediately with a policy-violation code when it did not; the identity
/// is fixed for the lifetime of the connection.
pub struct WsChatSession {
    session_id: Uuid,
    identity: Option<models::AuthUser>,
    pg_pool: PgPool,
    responder: Arc<dyn Responder>,
    registry: Arc<SessionRegistry>,
    guard: Option<SessionGuard>,
}

impl WsChatSession {
    pub fn new(
        identity: Option<models::AuthUser>,
        pg_pool: PgPool,
        responder: Arc<dyn Responder>,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            identity,
            pg_pool,
            responder,
            registry,
            guard: None,
        }
    }

    fn close_with(&mut self, close: SessionClose, ctx: &mut ws::WebsocketContext<Self>) {
        tracing::warn!(session = %self.session_id, "closing chat session: {}", close);
        ctx.close(Some(close.reason()));
        ctx.stop();
    }
}

impl Actor for WsChatSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        match &self.identity {
            Some(user) => {
                self.guard = Some(self.registry.register(self.session_id, user.id.clone()));
                tracing::info!(
                    session = %self.session_id,
                    user = %user.id,
                    active = self.registry.active_count(),
                    "chat session opened"
                );
            }
            // authentication failed at the handshake; close before any frame
            // is read
            None => {
                tracing::warn!(
                    session = %self.session_id,
                    "chat session rejected: no verified identity"
                );
                ctx.close(Some(SessionClose::PolicyViolation.reason()));
                ctx.stop();
            }
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        // the registry guard drops with the actor on every exit path
        tracing::info!(session = %self.session_id, "chat session closed");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsChatSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let Some(user) = self.identity.clone() else {
                    self.close_with(SessionClose::PolicyViolation, ctx);
                    return;
                };

                let frame = match InboundFrame::parse(&text) {
                    Ok(frame) => frame,
                    Err(err) => {
                        self.close_with(SessionClose::Unsupported(err), ctx);
                        return;
                    }
                };

                // ctx.wait parks the inbound stream until this frame is
                // answered: one frame in flight, strict arrival order
                let fut = process_frame(
                    self.pg_pool.clone(),
                    self.responder.clone(),
                    user.id,
                    frame,
                )
                .into_actor(self)
                .map(|outcome, act, ctx| match outcome {
                    Ok(outbound) => {
                        act.registry.record_frame(act.session_id);
                        ctx.text(outbound);
                    }
                    Err(close) => act.close_with(close, ctx),
                });
                ctx.wait(fut);
            }
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Binary(_)) => {
                self.close_with(SessionClose::Unsupported(ProtocolError::Binary), ctx)
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::info!(session = %self.session_id, "peer closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(session = %self.session_id, "websocket protocol error: {}", err);
                ctx.stop();
            }
        }
    }
}

/// One pass of the per-message loop: ownership check, reply computation,
/// transactional persistence of both rows, outbound serialization.
async fn process_frame(
    pg_pool: PgPool,
    responder: Arc<dyn Responder>,
    user_id: String,
    frame: InboundFrame,
) -> Result<String, SessionClose> {
    let chat = db::chat::fetch(&pg_pool, frame.chat_id)
        .await
        .map_err(SessionClose::Storage)?;
    match chat {
        Some(chat) if chat.user_id == user_id => {}
        _ => {
            // a foreign chat is indistinguishable from a missing one
            tracing::warn!(chat_id = %frame.chat_id, "frame for missing or foreign chat");
            return Err(SessionClose::PolicyViolation);
        }
    }

    let reply = responder.reply(&frame.message);
    let (_user_row, ai_row) = db::chat_message::insert_exchange(
        &pg_pool,
        frame.chat_id,
        &user_id,
        &frame.message,
        &reply,
    )
    .await
    .map_err(SessionClose::Storage)?;

    serde_json::to_string(&OutboundFrame::from(&ai_row))
        .map_err(|err| SessionClose::Internal(err.to_string()))
}
