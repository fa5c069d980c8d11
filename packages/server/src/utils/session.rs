use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Admin session claims carried in the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Always "admin"; there is exactly one admin.
    pub exp: usize,  // Expiration timestamp
}

pub const ADMIN_SUBJECT: &str = "admin";

/// Sign a new admin session token.
pub fn sign(secret: &str, max_age_secs: u64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(max_age_secs as i64))
        .ok_or_else(|| anyhow::anyhow!("session expiry out of range"))?
        .timestamp();

    let claims = Claims {
        sub: ADMIN_SUBJECT.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Compare two secrets without short-circuiting, so the comparison time
/// does not leak how many leading bytes matched.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Verify and decode a session token.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
