use crate::connectors::TokenVerifier;
use crate::ws::registry::SessionRegistry;
use crate::ws::responder::Responder;
use crate::ws::session::WsChatSession;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Entry point for chat websocket connections. The handshake precedes
/// normal request auth, so the bearer token rides in the query string.
#[tracing::instrument(name = "Chat websocket connection", skip_all)]
pub async fn chat_websocket(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    pg_pool: web::Data<PgPool>,
    verifier: web::Data<Arc<dyn TokenVerifier>>,
    responder: web::Data<Arc<dyn Responder>>,
    registry: web::Data<Arc<SessionRegistry>>,
) -> Result<HttpResponse, Error> {
    // soft mode: a missing or rejected token yields no identity, the session
    // closes the channel itself and no error crosses this boundary
    let identity = match query.token.as_deref() {
        Some(token) => match verifier.verify(token).await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("websocket authentication failed: {}", err);
                None
            }
        },
        None => None,
    };

    let session = WsChatSession::new(
        identity,
        pg_pool.get_ref().clone(),
        responder.get_ref().clone(),
        registry.get_ref().clone(),
    );

    ws::start(session, &req, stream)
}
