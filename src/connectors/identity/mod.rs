use crate::configuration::AuthSettings;
use crate::connectors::VerificationError;
use crate::models::AuthUser;
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::OnceCell;

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, VerificationError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Verifies bearer tokens against the identity provider's published
/// signing-key set.
pub struct IdentityClient {
    settings: AuthSettings,
    http: reqwest::Client,
    signing_keys: OnceCell<JwkSet>,
}

impl IdentityClient {
    pub fn new(settings: AuthSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
            signing_keys: OnceCell::new(),
        }
    }

    // Fetched lazily once and shared by every verification afterwards.
    // There is no invalidation; rotating the pool's keys requires a restart.
    async fn signing_keys(&self) -> Result<&JwkSet, VerificationError> {
        self.signing_keys
            .get_or_try_init(|| async {
                let url = self.settings.jwks_url();
                tracing::info!("Fetching signing-key set from {}", url);
                let response = self
                    .http
                    .get(&url)
                    .send()
                    .await
                    .map_err(|err| VerificationError::KeyFetch(err.to_string()))?
                    .error_for_status()
                    .map_err(|err| VerificationError::KeyFetch(err.to_string()))?;
                response
                    .json::<JwkSet>()
                    .await
                    .map_err(|err| VerificationError::KeyFetch(err.to_string()))
            })
            .await
    }
}

#[async_trait]
impl TokenVerifier for IdentityClient {
    async fn verify(&self, token: &str) -> Result<AuthUser, VerificationError> {
        let header = decode_header(token).map_err(|_| VerificationError::Malformed)?;
        // asymmetric signatures only; "none" never parses as an algorithm
        if header.alg != Algorithm::RS256 {
            return Err(VerificationError::Algorithm);
        }
        let kid = header.kid.ok_or(VerificationError::Malformed)?;

        let keys = self.signing_keys().await?;
        let jwk = keys.find(&kid).ok_or(VerificationError::UnknownKey)?;
        let decoding_key =
            DecodingKey::from_jwk(jwk).map_err(|_| VerificationError::UnknownKey)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.settings.client_id.as_str()]);

        let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|err| {
            tracing::debug!("token rejected: {}", err);
            VerificationError::Invalid
        })?;

        Ok(AuthUser {
            id: data.claims.sub,
        })
    }
}
