use rand::RngExt;
use rand::distr::Alphanumeric;
use tower_sessions::Session;

use crate::error::ReimagineError;

const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Random alphanumeric string, used for tokens and editing session ids.
pub(crate) fn random_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Returns the session's form token, minting one on first use.
pub(crate) async fn csrf_token(session: &Session) -> Result<String, ReimagineError> {
    if let Some(existing) = session.get::<String>(CSRF_TOKEN_KEY).await? {
        return Ok(existing);
    }
    let token = random_token();
    session.insert(CSRF_TOKEN_KEY, token.clone()).await?;
    Ok(token)
}

pub(crate) async fn validate_csrf(session: &Session, token: &str) -> Result<(), ReimagineError> {
    match session.get::<String>(CSRF_TOKEN_KEY).await? {
        Some(expected) if !token.is_empty() && expected == token => Ok(()),
        _ => Err(ReimagineError::Unauthorized),
    }
}
