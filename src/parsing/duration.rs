//! Threshold duration parsing.
//!
//! Accepts a sequence of decimal numbers, each with an optional fraction and a
//! mandatory unit suffix: `250ms`, `1.5s`, `1h45m`, `2m30.5s`. A bare `0` is
//! allowed without a unit. A leading `-` or `+` sets the sign of the whole
//! value, and the result must fit in a signed 64-bit count of nanoseconds.
//!
//! | Suffix | Unit |
//! |--------|------|
//! | `ns` | nanoseconds |
//! | `us`, `µs`, `μs` | microseconds |
//! | `ms` | milliseconds |
//! | `s` | seconds |
//! | `m` | minutes |
//! | `h` | hours |

use chrono::TimeDelta;

use crate::error::{DeltaError, Result};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

// Fraction digits beyond this cannot change a nanosecond result for any unit.
const MAX_FRACTION_DIGITS: usize = 19;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(60 * 60 * NANOS_PER_SEC),
        _ => None,
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn out_of_range(input: &str) -> DeltaError {
    DeltaError::invalid_duration(input, "duration out of range")
}

/// Parses a signed, unit-suffixed duration string.
///
/// # Examples
///
/// ```rust
/// use chrono::TimeDelta;
/// use tsgap::parsing::parse_duration;
///
/// assert_eq!(parse_duration("250ms").unwrap(), TimeDelta::milliseconds(250));
/// assert_eq!(parse_duration("1h45m").unwrap(), TimeDelta::minutes(105));
/// assert_eq!(parse_duration("1.5s").unwrap(), TimeDelta::milliseconds(1500));
/// assert_eq!(parse_duration("-5s").unwrap(), TimeDelta::seconds(-5));
/// assert!(parse_duration("100").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<TimeDelta> {
    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('-') {
        rest = stripped;
        negative = true;
    }

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(DeltaError::invalid_duration(input, "empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_number) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(DeltaError::invalid_duration(input, "expected a number"));
        }

        let unit_end = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_end);
        if unit.is_empty() {
            return Err(DeltaError::invalid_duration(input, "missing unit"));
        }
        let scale = unit_nanos(unit)
            .ok_or_else(|| DeltaError::invalid_duration(input, "unknown unit"))?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range(input))?
        };
        let mut term = whole.checked_mul(scale).ok_or_else(|| out_of_range(input))?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            // At most 19 ASCII digits, always fits.
            let numerator: u128 = digits.parse().unwrap_or(0);
            term = term
                .checked_add(numerator * scale / 10u128.pow(digits.len() as u32))
                .ok_or_else(|| out_of_range(input))?;
        }

        total = total.checked_add(term).ok_or_else(|| out_of_range(input))?;
        rest = tail;
    }

    // i64::MIN has no positive counterpart, so the magnitude is signed last.
    let nanos = if negative {
        0i128
            .checked_sub_unsigned(total)
            .and_then(|n| i64::try_from(n).ok())
    } else {
        i64::try_from(total).ok()
    }
    .ok_or_else(|| out_of_range(input))?;
    Ok(TimeDelta::nanoseconds(nanos))
}
