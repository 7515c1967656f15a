//! Password hashing and verification
//!
//! Passwords are stored as lowercase-hex SHA-256 over `salt || password`.
//! Rows migrated from the pre-hashing deployment carry an empty salt and the
//! plaintext password in the hash column; verification keeps an explicit
//! legacy branch for those rows. New rows are always salted and hashed.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated salts, in hex characters
const SALT_LEN: usize = 32;

/// Hash a password with the given salt (lowercase hex SHA-256)
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Generate a random hex salt for a new credential row
pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LEN)
        .map(|_| {
            let nibble: u8 = rng.gen_range(0..16);
            char::from_digit(nibble as u32, 16).unwrap_or('0')
        })
        .collect()
}

/// Verify a password attempt against a stored credential
///
/// Two explicit branches:
/// - salted rows: recompute the hash and compare
/// - legacy rows (empty salt): plaintext equality against the stored value
///
/// The legacy branch is a migration shim only; nothing ever writes a new
/// plaintext row.
pub fn verify_password(attempt: &str, stored_hash: &str, stored_salt: &str) -> bool {
    if stored_salt.is_empty() {
        // Legacy pre-hashing row
        return attempt == stored_hash;
    }

    hash_password(attempt, stored_salt) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_salt_sensitive() {
        let a = hash_password("hunter2", "aaaa");
        let b = hash_password("hunter2", "aaaa");
        let c = hash_password("hunter2", "bbbb");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn salted_verification_round_trips() {
        let salt = generate_salt();
        let hash = hash_password("s3cret", &salt);
        assert!(verify_password("s3cret", &hash, &salt));
        assert!(!verify_password("wrong", &hash, &salt));
    }

    #[test]
    fn legacy_plaintext_rows_verify_by_equality() {
        assert!(verify_password("letmein", "letmein", ""));
        assert!(!verify_password("letmein", "other", ""));
    }

    #[test]
    fn generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
