// Salted password hashing for the `users` table.
//
// Stored form: `sha256$<salt hex>$<digest hex>`.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

// Domain separation so a password digest never collides with other SHA-256 uses.
const PASSWORD_DOMAIN: &[u8] = b"DASHPASS";
const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(PASSWORD_DOMAIN);
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_password_with_salt(password, &salt)
}

pub fn hash_password_with_salt(password: &str, salt: &[u8]) -> String {
    format!(
        "{SCHEME}${}${}",
        hex::encode(salt),
        hex::encode(digest(salt, password))
    )
}

/// Checks `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(SCHEME), Some(salt_hex), Some(digest_hex)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };
    digest(&salt, password).ct_eq(&expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_right_password_only() {
        let stored = hash_password("123456");
        assert!(verify_password("123456", &stored));
        assert!(!verify_password("1234567", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn fixed_salt_is_deterministic() {
        let a = hash_password_with_salt("pw", b"0123456789abcdef");
        let b = hash_password_with_salt("pw", b"0123456789abcdef");
        assert_eq!(a, b);
        assert!(a.starts_with("sha256$30313233"));
    }

    #[test]
    fn malformed_hashes_never_verify() {
        for stored in ["", "plain", "md5$00$00", "sha256$zz$00", "sha256$00"] {
            assert!(!verify_password("pw", stored), "{stored}");
        }
    }
}
