//! Bijective base-62 codec between link ids and short codes.
//!
//! Digits are taken from [`ALPHABET`], so `0` encodes to `"a"` and `61` to
//! `"9"`. Codes are written most-significant digit first.

use smol_str::SmolStr;

use crate::error::DecodeError;

/// The 62 code symbols, in digit order.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Numeric base of the code, equal to the alphabet size.
pub const BASE: u64 = ALPHABET.len() as u64;

/// Length of the code for `u64::MAX`; no id needs more digits.
pub const MAX_CODE_LEN: usize = 11;

const INVALID: u8 = u8::MAX;
const DIGITS: [u8; 128] = digit_table();

const fn digit_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut digit = 0;
    while digit < ALPHABET.len() {
        table[ALPHABET[digit] as usize] = digit as u8;
        digit += 1;
    }
    table
}

fn digit_of(symbol: char) -> Option<u64> {
    let digit = *DIGITS.get(symbol as usize)?;
    (digit != INVALID).then_some(u64::from(digit))
}

/// Encodes `id` as a base-62 code. Never returns an empty string.
pub fn encode(id: u64) -> SmolStr {
    let mut buf = [0_u8; MAX_CODE_LEN];
    let mut start = MAX_CODE_LEN;
    let mut rest = id;

    // Fill from the right so the most significant digit ends up first.
    loop {
        start -= 1;
        buf[start] = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
        if rest == 0 {
            break;
        }
    }

    buf[start..].iter().map(|&symbol| char::from(symbol)).collect()
}

/// Decodes a base-62 code into the id it encodes.
///
/// Fails on empty input, on any symbol outside [`ALPHABET`], and on codes
/// whose value does not fit in a `u64`.
pub fn decode(code: &str) -> Result<u64, DecodeError> {
    if code.is_empty() {
        return Err(DecodeError::Empty);
    }

    code.chars()
        .enumerate()
        .try_fold(0_u64, |acc, (position, character)| {
            let digit = digit_of(character).ok_or(DecodeError::InvalidCharacter {
                character,
                position,
            })?;
            acc.checked_mul(BASE)
                .and_then(|value| value.checked_add(digit))
                .ok_or_else(|| DecodeError::Overflow(code.to_owned()))
        })
}
