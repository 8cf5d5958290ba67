/// Round `offset` up to the next even offset.
///
/// Member data is padded to an even number of bytes.
#[inline]
pub(crate) fn pad2(offset: u64) -> u64 {
    offset.saturating_add(offset & 1)
}

/// Parse a space padded numeric header field.
///
/// Padding may surround the digits, but there must be at least one digit.
pub(crate) fn parse_u64_digits(mut digits: &[u8], radix: u32) -> Option<u64> {
    while let [b' ', rest @ ..] = digits {
        digits = rest;
    }
    if digits.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut iter = digits.iter();
    for &c in &mut iter {
        if c == b' ' {
            break;
        }
        let x = (c as char).to_digit(radix)?;
        result = result
            .checked_mul(u64::from(radix))?
            .checked_add(u64::from(x))?;
    }
    if iter.all(|&c| c == b' ') {
        Some(result)
    } else {
        None
    }
}

/// Remove trailing space padding.
pub(crate) fn trim_spaces(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., b' '] = bytes {
        bytes = rest;
    }
    bytes
}
