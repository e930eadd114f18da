//! Memory-size string parsing and byte formatting.
//!
//! Size strings are a number optionally followed by a single `K`, `M` or `G`
//! suffix (case-insensitive), each a power of 1024. A plain number is a raw
//! byte count.

use humansize::{BINARY, DECIMAL, format_size};

use crate::error::{DiskError, Result};

/// Number of fractional digits kept when parsing decimal sizes.
const FRACTION_DIGITS: u32 = 9;
const FRACTION_SCALE: u64 = 1_000_000_000;

/// Parse a memory-size string such as `"80G"`, `"1.4M"` or `"53K"` into bytes.
///
/// Decimal values are evaluated in fixed point and truncated toward zero, so
/// `"1.4M"` gives `1_468_006` (1.4 × 1024², rounded down).
///
/// # Errors
///
/// Returns [`DiskError::InvalidSize`] carrying the original text if:
/// - The string is empty or the numeric part is not a valid non-negative number
/// - The suffix is anything other than `K`, `M` or `G`
/// - The resulting value would overflow `u64`
///
/// # Examples
///
/// ```
/// # use cachedisk::memstr_to_bytes;
/// assert_eq!(memstr_to_bytes("53K").unwrap(), 53 * 1024);
/// assert_eq!(memstr_to_bytes("1.4M").unwrap(), 1_468_006);
/// assert!(memstr_to_bytes("1.4N").is_err());
/// ```
pub fn memstr_to_bytes(text: &str) -> Result<u64> {
    parse_memstr(text).ok_or_else(|| DiskError::InvalidSize {
        text: text.to_string(),
    })
}

fn parse_memstr(text: &str) -> Option<u64> {
    let upper = text.trim().to_uppercase();
    let (number_str, multiplier) = parse_size_unit(&upper);

    if number_str.contains('.') {
        parse_decimal_size(number_str, multiplier)
    } else {
        parse_integer_size(number_str, multiplier)
    }
}

/// Split off the unit suffix and return the numeric part with its multiplier.
fn parse_size_unit(size_str: &str) -> (&str, u64) {
    const UNITS: &[(char, u64)] = &[('K', 1_024), ('M', 1_048_576), ('G', 1_073_741_824)];

    for (suffix, multiplier) in UNITS {
        if let Some(number) = size_str.strip_suffix(*suffix) {
            return (number, *multiplier);
        }
    }

    (size_str, 1)
}

/// Parse a decimal size value (e.g. `"1.5"`).
fn parse_decimal_size(number_str: &str, multiplier: u64) -> Option<u64> {
    let (integer_str, fractional_str) = number_str.split_once('.')?;
    if integer_str.is_empty() && fractional_str.is_empty() {
        return None;
    }

    let integer_part: u64 = if integer_str.is_empty() {
        0
    } else {
        integer_str.parse().ok()?
    };
    let fractional_part = parse_fractional_part(fractional_str)?;

    let integer_bytes = integer_part.checked_mul(multiplier)?;
    let fractional_bytes = fractional_part.checked_mul(multiplier)? / FRACTION_SCALE;

    integer_bytes.checked_add(fractional_bytes)
}

/// Parse the fractional digits into billionths, truncating extra precision.
fn parse_fractional_part(fractional_str: &str) -> Option<u64> {
    if !fractional_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let kept = &fractional_str[..fractional_str.len().min(FRACTION_DIGITS as usize)];
    if kept.is_empty() {
        return Some(0);
    }

    let value: u64 = kept.parse().ok()?;
    let digits = u32::try_from(kept.len()).ok()?;

    Some(value * 10u64.pow(FRACTION_DIGITS - digits))
}

/// Parse an integer size value.
fn parse_integer_size(number_str: &str, multiplier: u64) -> Option<u64> {
    let number: u64 = number_str.parse().ok()?;
    number.checked_mul(multiplier)
}

/// Format a byte count for display, in binary (`KiB`) or decimal (`kB`) units.
#[must_use]
pub fn format_bytes(bytes: u64, binary: bool) -> String {
    if binary {
        format_size(bytes, BINARY)
    } else {
        format_size(bytes, DECIMAL)
    }
}
