/// Verified identity extracted from a bearer token. Lives only for the
/// duration of one request or one websocket connection, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}
