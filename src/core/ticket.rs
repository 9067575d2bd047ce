//! # Ticket Numbers
//!
//! A ticket is `TICKET-` + the last six digits of the current Unix millisecond
//! timestamp + four random base-36 characters, e.g. `TICKET-482913K7QZ`.
//!
//! Good enough to tell complaints apart within a session. Not a security token.

use chrono::Utc;
use rand::Rng;

pub const TICKET_PREFIX: &str = "TICKET-";

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;
const TIMESTAMP_DIGITS: i64 = 1_000_000;

/// Generate a ticket number from the wall clock and the thread-local RNG.
pub fn generate() -> String {
    generate_with(Utc::now().timestamp_millis(), &mut rand::rng())
}

/// Deterministic core of [`generate`]: caller supplies the clock and randomness.
pub fn generate_with<R: Rng + ?Sized>(timestamp_millis: i64, rng: &mut R) -> String {
    let digits = timestamp_millis.rem_euclid(TIMESTAMP_DIGITS);
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{TICKET_PREFIX}{digits:06}{suffix}")
}

/// Whether `s` has the exact ticket shape: prefix, 6 digits, 4 of `[A-Z0-9]`.
pub fn is_well_formed(s: &str) -> bool {
    let Some(rest) = s.strip_prefix(TICKET_PREFIX) else {
        return false;
    };
    let bytes = rest.as_bytes();
    bytes.len() == 6 + SUFFIX_LEN
        && bytes[..6].iter().all(u8::is_ascii_digit)
        && bytes[6..]
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}
