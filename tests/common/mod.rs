use chatd::configuration::{get_configuration, DatabaseSettings, Settings};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KID: &str = "test-key-1";
pub const JWKS_DOCUMENT: &str = include_str!("../fixtures/jwks.json");
const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/jwt_private.pem");

pub struct TestApp {
    pub address: String,
    pub ws_address: String,
    pub db_pool: PgPool,
    pub client_id: String,
    // keeps the JWKS endpoint alive for the app's lifetime
    _jwks_server: MockServer,
}

impl TestApp {
    pub fn token_for(&self, sub: &str) -> String {
        issue_token(sub, &self.client_id, 3600)
    }
}

/// Serves the fixture signing-key set the way the identity provider would.
pub async fn start_jwks_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JWKS_DOCUMENT, "application/json"))
        .mount(&server)
        .await;
    server
}

pub fn issue_token(sub: &str, aud: &str, exp_offset_secs: i64) -> String {
    issue_token_with_kid(sub, aud, exp_offset_secs, TEST_KID)
}

pub fn issue_token_with_kid(sub: &str, aud: &str, exp_offset_secs: i64, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    let claims = json!({ "sub": sub, "aud": aud, "exp": exp });
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM).expect("fixture key is valid PEM");
    encode(&header, &claims, &key).expect("token signing")
}

pub async fn spawn_app() -> Option<TestApp> {
    let configuration = get_configuration().expect("Failed to get configuration");
    spawn_app_with_configuration(configuration).await
}

pub async fn spawn_app_with_configuration(mut configuration: Settings) -> Option<TestApp> {
    let jwks_server = start_jwks_server().await;
    configuration.auth.jwks_url = Some(format!("{}/jwks.json", jwks_server.uri()));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let ws_address = format!("ws://127.0.0.1:{}", port);
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    let connection_pool = match configure_database(&configuration.database).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Skipping test: failed to connect to postgres: {}", err);
            return None;
        }
    };

    let client_id = configuration.auth.client_id.clone();
    let server = chatd::startup::run(listener, connection_pool.clone(), configuration)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    Some(TestApp {
        address,
        ws_address,
        db_pool: connection_pool,
        client_id,
        _jwks_server: jwks_server,
    })
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    Ok(connection_pool)
}
