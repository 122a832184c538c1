use crate::db;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{get, web, Responder, Result};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[tracing::instrument(name = "List chats.", skip_all)]
#[get("")]
pub async fn list(
    user: web::ReqData<Arc<models::AuthUser>>,
    query: web::Query<ListQuery>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).max(0);

    db::chat::fetch_by_user(pg_pool.get_ref(), &user.id, skip, limit)
        .await
        .map(web::Json)
        .map_err(|_err| JsonResponse::internal_server_error(""))
}

#[tracing::instrument(name = "Get chat.", skip_all)]
#[get("/{id}")]
pub async fn item(
    path: web::Path<(Uuid,)>,
    user: web::ReqData<Arc<models::AuthUser>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let id = path.0;
    db::chat::fetch(pg_pool.get_ref(), id)
        .await
        .map_err(|_err| JsonResponse::internal_server_error(""))
        .and_then(|chat| match chat {
            // a foreign chat looks exactly like a missing one
            Some(chat) if chat.user_id != user.id => {
                Err(JsonResponse::not_found("record not found"))
            }
            Some(chat) => Ok(web::Json(chat)),
            None => Err(JsonResponse::not_found("record not found")),
        })
}
