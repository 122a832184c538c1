use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{post, web, HttpResponse, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Add chat.", skip_all)]
#[post("")]
pub async fn item(
    user: web::ReqData<Arc<models::AuthUser>>,
    form: web::Json<forms::ChatCreateForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid data received {:?}", errors.to_string());
        return Err(JsonResponse::build().set_msg(errors.to_string()).form_error());
    }

    db::chat::insert(pg_pool.get_ref(), &user.id, &form.title)
        .await
        .map(|chat| HttpResponse::Created().json(chat))
        .map_err(|_err| JsonResponse::internal_server_error("Failed to create chat"))
}
