//! Short token generation.
//!
//! Tokens are the public lookup keys for links, so they must be unpredictable:
//! generation draws from the OS CSPRNG rather than a seeded PRNG.

use base64::Engine as _;

/// Random bytes fed into the encoder per token.
const TOKEN_BYTES: usize = 10;

/// Length of the final URL-safe token.
pub const TOKEN_LENGTH: usize = 10;

/// Generates a random, URL-safe short token.
///
/// Draws [`TOKEN_BYTES`] bytes from the OS entropy source, encodes them as
/// URL-safe base64 without padding, and truncates to [`TOKEN_LENGTH`]
/// characters (~57 bits of entropy).
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    encoded.truncate(TOKEN_LENGTH);
    encoded
}
