use bcrypt::{DEFAULT_COST, hash, verify};

pub fn hash_password(password: &str) -> String {
    hash(password, DEFAULT_COST).expect("Failed to hash password")
}

/// A hash that cannot be parsed counts as a failed verification rather
/// than a panic; such rows can only come from manual edits.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("hunter42");
        let second = hash_password("hunter42");

        assert_ne!(first, "hunter42");
        assert_ne!(first, second);
        assert!(verify_password("hunter42", &first));
        assert!(!verify_password("hunter43", &first));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("hunter42", "not-a-bcrypt-hash"));
    }
}
