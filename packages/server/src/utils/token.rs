use rand::Rng;

/// Length in bytes of a password reset token before hex encoding.
const RESET_TOKEN_BYTES: usize = 32;

/// Generate a random password reset token: 64 lowercase hex characters.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
