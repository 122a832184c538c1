use crate::configuration::Settings;
use crate::connectors::{self, TokenVerifier};
use crate::middleware;
use crate::routes;
use crate::ws;
use actix_cors::Cors;
use actix_web::{dev::Server, error, http, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let token_verifier: web::Data<Arc<dyn TokenVerifier>> = web::Data::new(Arc::new(
        connectors::IdentityClient::new(settings.auth.clone()),
    ));
    let responder: web::Data<Arc<dyn ws::Responder>> =
        web::Data::new(Arc::new(ws::EchoResponder));
    let session_registry = web::Data::new(Arc::new(ws::SessionRegistry::new()));

    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg: String = match err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "{{\"kind\":\"deserialize\",\"line\":{}, \"column\":{}, \"msg\":\"{}\"}}",
                err.line(),
                err.column(),
                err
            ),
            _ => format!("{{\"kind\":\"other\",\"msg\":\"{}\"}}", err),
        };
        error::InternalError::new(msg, http::StatusCode::BAD_REQUEST).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .service(routes::health_check)
            .service(
                web::scope("/v1")
                    .wrap(middleware::authentication::Manager::new())
                    .service(
                        web::scope("/chats")
                            .service(routes::chat::add::item)
                            .service(routes::chat::get::list)
                            .service(routes::chat::get::item),
                    ),
            )
            .service(web::resource("/ws").route(web::get().to(ws::chat_websocket)))
            .app_data(json_config.clone())
            .app_data(pg_pool.clone())
            .app_data(settings.clone())
            .app_data(token_verifier.clone())
            .app_data(responder.clone())
            .app_data(session_registry.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
