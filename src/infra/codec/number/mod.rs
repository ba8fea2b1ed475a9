//! Unsigned integer parsing for command arguments.
//!
//! The radix is picked from the token prefix:
//! - `0x` / `0X` → hexadecimal
//! - leading `0` followed by more digits → octal
//! - anything else → decimal
//!
//! The whole token must be consumed: trailing characters are an error rather
//! than silently ignored.
use crate::error::NumberError;

/// Parse an unsigned 32-bit integer, detecting the radix from its prefix.
pub fn parse_u32(token: &[u8]) -> Result<u32, NumberError> {
    let (radix, digits) = split_radix(token);
    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    let mut value: u32 = 0;
    for &byte in digits {
        let digit = (byte as char)
            .to_digit(radix)
            .ok_or(NumberError::InvalidDigit)?;
        value = value
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit))
            .ok_or(NumberError::Overflow)?;
    }
    Ok(value)
}

/// Parse an integer and keep its low byte, matching how data bytes are
/// loaded into a frame (`257` becomes `1`).
pub fn parse_u8_truncating(token: &[u8]) -> Result<u8, NumberError> {
    parse_u32(token).map(|value| value as u8)
}

/// Strip the radix prefix and return `(radix, digits)`.
fn split_radix(token: &[u8]) -> (u32, &[u8]) {
    match token {
        [b'0', b'x' | b'X', rest @ ..] => (16, rest),
        // A lone "0" stays decimal zero.
        [b'0', rest @ ..] if !rest.is_empty() => (8, rest),
        _ => (10, token),
    }
}
