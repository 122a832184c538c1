use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

/// Identity-provider settings for the token verifier. The signing-key set is
/// published by the user pool under its well-known JWKS path; `jwks_url`
/// overrides the derived URL for local and test deployments.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthSettings {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    #[serde(default)]
    pub jwks_url: Option<String>,
}

impl AuthSettings {
    pub fn override_from_env(&mut self) {
        if let Ok(region) = std::env::var("AWS_REGION") {
            self.region = region;
        }
        if let Ok(user_pool_id) = std::env::var("AWS_USER_POOL_ID") {
            self.user_pool_id = user_pool_id;
        }
        if let Ok(client_id) = std::env::var("AWS_USER_POOL_CLIENT_ID") {
            self.client_id = client_id;
        }
        if let Ok(jwks_url) = std::env::var("AUTH_JWKS_URL") {
            self.jwks_url = Some(jwks_url);
        }
    }

    pub fn jwks_url(&self) -> String {
        match &self.jwks_url {
            Some(url) => url.clone(),
            None => format!(
                "https://cognito-idp.{}.amazonaws.com/{}/.well-known/jwks.json",
                self.region, self.user_pool_id
            ),
        }
    }
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = config::Config::default();
    settings.merge(config::File::with_name("configuration"))?;

    let mut config: Settings = settings.try_deserialize()?;

    // identity-provider identifiers come from the deployment environment
    config.auth.override_from_env();

    Ok(config)
}
