use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::error::{Error, Result};

pub const RESET_TOKEN_LENGTH: usize = 48;
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hashed)
        .map_err(|e| Error::Internal(format!("stored password hash is malformed: {}", e)))?;
    let ok = Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(ok)
}

pub fn generate_reset_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn reset_token_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS)
}

pub fn reset_token_expired(expiry: Option<DateTime<Utc>>) -> bool {
    match expiry {
        Some(at) => at < Utc::now(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("segredo123").unwrap();
        assert_ne!(hash, "segredo123");
        assert!(verify_password("segredo123", &hash).unwrap());
        assert!(!verify_password("outra-senha", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        let err = verify_password("x", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn reset_tokens_are_alphanumeric_and_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn expiry_checks() {
        assert!(reset_token_expired(None));
        assert!(reset_token_expired(Some(Utc::now() - Duration::minutes(1))));
        assert!(!reset_token_expired(Some(reset_token_expiry())));
    }
}
