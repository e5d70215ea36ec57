//! Decoding of four-digit `\uXXXX` escapes without buffering bytes.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! as they arrive and yields the UTF-16 code unit they spell once the fourth
//! digit is fed, resetting itself for the next escape. Pairing surrogates into
//! a scalar value is left to the caller, since the two halves arrive as two
//! separate escapes.

use crate::error::SyntaxErrorKind;

/// Accumulates up to four hexadecimal digits.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
            b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
            _ => None,
        }
    }

    /// Feed one hex digit.
    ///
    /// Returns `Ok(None)` until the fourth digit, then `Ok(Some(unit))`.
    pub(crate) fn feed(&mut self, b: u8) -> Result<Option<u16>, SyntaxErrorKind> {
        let d = Self::hex_val(b).ok_or(SyntaxErrorKind::InvalidUnicodeEscapeChar(b))?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

/// High half of a surrogate pair.
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Low half of a surrogate pair.
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combine a surrogate pair into the scalar value it encodes.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
