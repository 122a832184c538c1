use crate::connectors::TokenVerifier;
use crate::middleware::authentication::get_header;
use actix_web::dev::ServiceRequest;
use actix_web::{web, HttpMessage};
use std::sync::Arc;

#[tracing::instrument(name = "Authenticate with bearer token", skip_all)]
pub async fn try_bearer(req: &mut ServiceRequest) -> Result<bool, String> {
    let authorization = get_header::<String>(req, "authorization")?;
    let Some(authorization) = authorization else {
        return Ok(false);
    };

    let token = authorization
        .strip_prefix("Bearer ")
        .ok_or_else(|| "authorization header is not a bearer token".to_string())?
        .to_string();

    let verifier = req
        .app_data::<web::Data<Arc<dyn TokenVerifier>>>()
        .ok_or_else(|| "token verifier is not configured".to_string())?
        .clone();

    let user = verifier.verify(&token).await.map_err(|err| {
        tracing::debug!("token verification failed: {}", err);
        "invalid bearer token".to_string()
    })?;

    if req.extensions_mut().insert(Arc::new(user)).is_some() {
        return Err("user already authenticated".to_string());
    }

    Ok(true)
}
