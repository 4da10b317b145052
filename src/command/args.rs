//! Argument scanning for command lines.
//!
//! Numbers follow C `%i` conventions: an optional sign, then `0x`/`0X` for
//! hexadecimal, a leading `0` for octal, decimal otherwise. Scanning stops at
//! the first character that cannot continue the number, so `"12ms"` yields 12.

use crate::error::Error;

/// Scan a signed integer from the start of `text`, skipping leading whitespace.
///
/// Returns the value and the unconsumed remainder, or `None` when no digit
/// could be read or the value overflows an `i64`.
pub fn scan_int(text: &str) -> Option<(i64, &str)> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let radix = if bytes.get(pos) == Some(&b'0') {
        match bytes.get(pos + 1) {
            Some(b'x' | b'X') if bytes.get(pos + 2).is_some_and(u8::is_ascii_hexdigit) => {
                pos += 2;
                16
            }
            _ => 8,
        }
    } else {
        10
    };

    let digits_start = pos;
    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(pos).and_then(|&b| (b as char).to_digit(radix)) {
        value = value.checked_mul(radix as i64)?.checked_add(digit as i64)?;
        pos += 1;
    }

    if pos == digits_start {
        return None;
    }

    Some((if negative { -value } else { value }, &text[pos..]))
}

/// Parse the strictly positive count following `keyword` in `line`.
///
/// `"flash 3"` with keyword `"flash"` yields 3. A missing keyword, a missing
/// or malformed number, zero, a negative value or a value above `u32::MAX`
/// is an [`Error::ParseError`].
pub fn parse_count(line: &str, keyword: &str) -> Result<u32, Error> {
    let rest = line
        .trim_start()
        .strip_prefix(keyword)
        .ok_or(Error::ParseError)?;
    let (value, _) = scan_int(rest).ok_or(Error::ParseError)?;
    if value <= 0 {
        return Err(Error::ParseError);
    }
    u32::try_from(value).map_err(|_| Error::ParseError)
}
