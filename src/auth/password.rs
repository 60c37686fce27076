use sha2::{Digest, Sha256};

/// Check a submitted password against the configured admin password.
///
/// Both sides are hashed first so the comparison always covers 32 bytes
/// regardless of input length, then compared without early exit.
#[must_use]
pub fn verify_admin_password(submitted: &str, expected: &str) -> bool {
    let submitted = Sha256::digest(submitted.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    submitted
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
