//! Join code generation for game sessions.
//!
//! Join codes are short strings using Crockford's Base32 alphabet, so they
//! are easy to read out and type in chat.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

/// Length of generated join codes.
pub const JOIN_CODE_LEN: usize = 6;

/// Generate a join code using the thread-local RNG.
///
/// Uniqueness against live sessions is the caller's job; 32^6 codes make
/// collisions rare but possible.
pub fn generate_join_code() -> String {
    generate_join_code_with(&mut rand::rng())
}

pub fn generate_join_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}
