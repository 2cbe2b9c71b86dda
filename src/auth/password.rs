use bcrypt::BcryptError;
use once_cell::sync::Lazy;
use thiserror::Error;

/// Cost used for stored hashes unless configured otherwise
pub const DEFAULT_PASSWORD_COST: u32 = 10;

static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("leadblocks-unknown-user", DEFAULT_PASSWORD_COST).ok());

/// The hashing library failed for a reason other than a bad stored hash
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] BcryptError);

pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Compare `plaintext` against a stored bcrypt hash.
///
/// A mismatch or an unreadable stored hash is `Ok(false)`; only internal
/// hashing faults surface as errors.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    match bcrypt::verify(plaintext, stored_hash) {
        Ok(matches) => Ok(matches),
        Err(
            BcryptError::InvalidHash(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidCost(_)
            | BcryptError::InvalidBase64(_),
        ) => Ok(false),
        Err(e) => Err(PasswordError(e)),
    }
}

/// Spend the same bcrypt work as a real check when there is no stored hash,
/// so an unknown account costs as much as a wrong password.
pub fn verify_against_dummy(plaintext: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plaintext, hash);
    }
}

pub(crate) fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH.as_deref()
}

#[cfg(test)]
pub(crate) fn dummy_hash_computed() -> bool {
    Lazy::get(&DUMMY_HASH).is_some()
}
