use rand::RngCore;

use crate::constants::{KDF_CONTEXT_PASSWORD, PASSWORD_SALT_SIZE};

pub fn generate_salt() -> [u8; PASSWORD_SALT_SIZE] {
    let mut salt = [0u8; PASSWORD_SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

// BLAKE3 KDF with domain separation
fn derive_hash(salt: &[u8], password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_PASSWORD);
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize()
}

/// Returns `(salt, hash)` hex-encoded for storage.
pub fn hash_password(password: &str) -> (String, String) {
    let salt = generate_salt();
    let hash = derive_hash(&salt, password);
    (hex::encode(salt), hash.to_hex().to_string())
}

/// Verifies a candidate password against a stored salt/hash pair.
///
/// Comparison goes through `blake3::Hash` equality, which is constant
/// time. Malformed stored values verify as false rather than erroring.
pub fn verify_password(salt_hex: &str, hash_hex: &str, candidate: &str) -> bool {
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = blake3::Hash::from_hex(hash_hex) else {
        return false;
    };
    derive_hash(&salt, candidate) == expected
}
