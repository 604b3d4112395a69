//! Interleaved 2 of 5 encoder.
//!
//! Digits are encoded in pairs: the first digit of a pair in the bars, the second in the
//! spaces. Odd-length payloads are left-padded with a zero.

use super::{EncodeError, EncodedBarcode};

/// Wide (`true`) / narrow element flags per digit.
const DIGITS: [[bool; 5]; 10] = [
    [false, false, true, true, false],
    [true, false, false, false, true],
    [false, true, false, false, true],
    [true, true, false, false, false],
    [false, false, true, false, true],
    [true, false, true, false, false],
    [false, true, true, false, false],
    [false, false, false, true, true],
    [true, false, false, true, false],
    [false, true, false, true, false],
];

const NARROW: u8 = 1;
const WIDE: u8 = 3;
const START: [u8; 4] = [1, 1, 1, 1];
const STOP: [u8; 3] = [WIDE, NARROW, NARROW];

pub fn encode(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let mut digits = Vec::with_capacity(text.len() + 1);
    for (position, ch) in text.chars().enumerate() {
        match ch.to_digit(10) {
            Some(d) => digits.push(d as usize),
            None => return Err(EncodeError::InvalidCharacter { ch, position }),
        }
    }
    if digits.len() % 2 == 1 {
        digits.insert(0, 0);
    }

    let mut modules = Vec::new();
    EncodedBarcode::push_widths(&mut modules, &START);
    for pair in digits.chunks(2) {
        let bars = DIGITS[pair[0]];
        let spaces = DIGITS[pair[1]];
        let mut widths = [0u8; 10];
        for i in 0..5 {
            widths[i * 2] = if bars[i] { WIDE } else { NARROW };
            widths[i * 2 + 1] = if spaces[i] { WIDE } else { NARROW };
        }
        EncodedBarcode::push_widths(&mut modules, &widths);
    }
    EncodedBarcode::push_widths(&mut modules, &STOP);

    Ok(EncodedBarcode {
        modules,
        human_readable: digits.iter().map(|d| char::from(b'0' + *d as u8)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_digit_has_two_wide_elements() {
        for pattern in DIGITS {
            assert_eq!(pattern.iter().filter(|w| **w).count(), 2);
        }
    }

    #[test]
    fn test_odd_length_is_padded() {
        let encoded = encode("123").unwrap();
        assert_eq!(encoded.human_readable, "0123");
    }

    #[test]
    fn test_module_count() {
        let encoded = encode("12").unwrap();
        // start 4 + one pair (2 wide * 2 digits at 3 + 6 narrow) + stop 5
        assert_eq!(encoded.width(), 4 + (4 * 3 + 6) + 5);
    }

    #[test]
    fn test_rejects_letters() {
        assert!(matches!(
            encode("12A4"),
            Err(EncodeError::InvalidCharacter { ch: 'A', position: 2 })
        ));
    }
}
