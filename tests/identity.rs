mod common;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chatd::configuration::AuthSettings;
use chatd::connectors::{IdentityClient, TokenVerifier};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use wiremock::MockServer;

const CLIENT_ID: &str = "local-client";

fn auth_settings(jwks_url: String) -> AuthSettings {
    AuthSettings {
        region: "us-east-1".to_string(),
        user_pool_id: "local-pool".to_string(),
        client_id: CLIENT_ID.to_string(),
        jwks_url: Some(jwks_url),
    }
}

async fn verifier() -> (IdentityClient, MockServer) {
    let server = common::start_jwks_server().await;
    let client = IdentityClient::new(auth_settings(format!("{}/jwks.json", server.uri())));
    (client, server)
}

#[tokio::test]
async fn valid_token_yields_the_subject_identity() {
    let (client, _server) = verifier().await;
    let token = common::issue_token("u1", CLIENT_ID, 3600);

    let user = client.verify(&token).await.expect("verification");
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (client, _server) = verifier().await;
    let token = common::issue_token("u1", CLIENT_ID, -3600);

    assert!(client.verify(&token).await.is_err());
}

#[tokio::test]
async fn wrong_audience_is_rejected() {
    let (client, _server) = verifier().await;
    let token = common::issue_token("u1", "someone-else", 3600);

    assert!(client.verify(&token).await.is_err());
}

#[tokio::test]
async fn symmetric_signature_is_rejected() {
    let (client, _server) = verifier().await;
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(common::TEST_KID.to_string());
    let exp = chrono::Utc::now().timestamp() + 3600;
    let claims = json!({ "sub": "u1", "aud": CLIENT_ID, "exp": exp });
    let token = encode(&header, &claims, &EncodingKey::from_secret(b"secret")).expect("hs256");

    assert!(client.verify(&token).await.is_err());
}

#[tokio::test]
async fn unsigned_token_is_rejected() {
    let (client, _server) = verifier().await;
    let exp = chrono::Utc::now().timestamp() + 3600;
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": "u1", "aud": CLIENT_ID, "exp": exp }).to_string(),
    );
    let token = format!("{}.{}.", header, payload);

    assert!(client.verify(&token).await.is_err());
}

#[tokio::test]
async fn unknown_key_id_is_rejected() {
    let (client, _server) = verifier().await;
    let token = common::issue_token_with_kid("u1", CLIENT_ID, 3600, "rotated-away");

    assert!(client.verify(&token).await.is_err());
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (client, _server) = verifier().await;

    assert!(client.verify("garbage").await.is_err());
}

#[tokio::test]
async fn unreachable_key_set_is_rejected() {
    let client = IdentityClient::new(auth_settings(
        "http://127.0.0.1:1/jwks.json".to_string(),
    ));
    let token = common::issue_token("u1", CLIENT_ID, 3600);

    assert!(client.verify(&token).await.is_err());
}

#[tokio::test]
async fn key_set_is_fetched_once_and_cached() {
    let (client, server) = verifier().await;
    let token = common::issue_token("u1", CLIENT_ID, 3600);

    client.verify(&token).await.expect("first verification");
    client.verify(&token).await.expect("second verification");

    let requests = server
        .received_requests()
        .await
        .expect("recorded requests");
    assert_eq!(requests.len(), 1);
}
