//! EAN/UPC family encoders: EAN-13, EAN-8, UPC-A and ISBN-13.
//!
//! All four share the same digit tables and the mod-10 check with alternating 3/1
//! weights. When the caller passes the full length including the check digit, the digit
//! is verified instead of recomputed.

use super::{EncodeError, EncodedBarcode};

/// Left-hand odd parity (set A)
const L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// Left-hand even parity (set B)
const G_CODES: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101", "0111001", "0000101", "0010001",
    "0001001", "0010111",
];

/// Right-hand (set C)
const R_CODES: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100", "1001110", "1010000", "1000100",
    "1001000", "1110100",
];

/// Parity of the six left digits, selected by the leading EAN-13 digit (`true` = G code).
const FIRST_DIGIT_PARITY: [[bool; 6]; 10] = [
    [false, false, false, false, false, false],
    [false, false, true, false, true, true],
    [false, false, true, true, false, true],
    [false, false, true, true, true, false],
    [false, true, false, false, true, true],
    [false, true, true, false, false, true],
    [false, true, true, true, false, false],
    [false, true, false, true, false, true],
    [false, true, false, true, true, false],
    [false, true, true, false, true, false],
];

const EDGE_GUARD: &str = "101";
const CENTER_GUARD: &str = "01010";

/// Mod-10 check digit. Weights alternate 3, 1, 3, ... starting from the rightmost digit.
pub fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Parse `text` into digits, appending or verifying the check digit so that the result
/// has `full_len` digits.
fn complete_digits(text: &str, full_len: usize) -> Result<Vec<u8>, EncodeError> {
    let mut digits = Vec::with_capacity(full_len);
    for (position, ch) in text.chars().enumerate() {
        match ch.to_digit(10) {
            Some(d) => digits.push(d as u8),
            None => return Err(EncodeError::InvalidCharacter { ch, position }),
        }
    }

    if digits.len() == full_len - 1 {
        let check = check_digit(&digits);
        digits.push(check);
        Ok(digits)
    } else if digits.len() == full_len {
        let expected = check_digit(&digits[..full_len - 1]);
        let found = digits[full_len - 1];
        if expected != found {
            return Err(EncodeError::ChecksumMismatch { expected, found });
        }
        Ok(digits)
    } else {
        Err(EncodeError::InvalidLength {
            expected: format!("{} or {}", full_len - 1, full_len),
            actual: digits.len(),
        })
    }
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

/// Modules for a complete 13-digit EAN.
fn ean13_modules(digits: &[u8]) -> Vec<bool> {
    let parity = FIRST_DIGIT_PARITY[digits[0] as usize];
    let mut modules = Vec::with_capacity(95);

    EncodedBarcode::push_pattern(&mut modules, EDGE_GUARD);
    for (i, &d) in digits[1..7].iter().enumerate() {
        let table = if parity[i] { &G_CODES } else { &L_CODES };
        EncodedBarcode::push_pattern(&mut modules, table[d as usize]);
    }
    EncodedBarcode::push_pattern(&mut modules, CENTER_GUARD);
    for &d in &digits[7..13] {
        EncodedBarcode::push_pattern(&mut modules, R_CODES[d as usize]);
    }
    EncodedBarcode::push_pattern(&mut modules, EDGE_GUARD);

    modules
}

/// Encode EAN-13 from 12 digits (check computed) or 13 digits (check verified).
pub fn encode_ean13(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let digits = complete_digits(text, 13)?;
    Ok(EncodedBarcode {
        modules: ean13_modules(&digits),
        human_readable: digits_to_string(&digits),
    })
}

/// Encode EAN-8 from 7 digits (check computed) or 8 digits (check verified).
pub fn encode_ean8(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let digits = complete_digits(text, 8)?;
    let mut modules = Vec::with_capacity(67);

    EncodedBarcode::push_pattern(&mut modules, EDGE_GUARD);
    for &d in &digits[..4] {
        EncodedBarcode::push_pattern(&mut modules, L_CODES[d as usize]);
    }
    EncodedBarcode::push_pattern(&mut modules, CENTER_GUARD);
    for &d in &digits[4..] {
        EncodedBarcode::push_pattern(&mut modules, R_CODES[d as usize]);
    }
    EncodedBarcode::push_pattern(&mut modules, EDGE_GUARD);

    Ok(EncodedBarcode {
        modules,
        human_readable: digits_to_string(&digits),
    })
}

/// Encode UPC-A from 11 or 12 digits. The bars are those of EAN-13 with a leading zero.
pub fn encode_upca(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let upc = complete_digits(text, 12)?;
    let mut digits = Vec::with_capacity(13);
    digits.push(0);
    digits.extend_from_slice(&upc);

    Ok(EncodedBarcode {
        modules: ean13_modules(&digits),
        human_readable: digits_to_string(&upc),
    })
}

/// Encode ISBN-13. Hyphens are ignored and the Bookland prefix (978/979) is required.
pub fn encode_isbn13(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let cleaned: String = text.chars().filter(|&c| c != '-').collect();
    if !(cleaned.starts_with("978") || cleaned.starts_with("979")) {
        return Err(EncodeError::InvalidPrefix(format!(
            "ISBN-13 must start with 978 or 979, got {:?}",
            text
        )));
    }
    encode_ean13(&cleaned)
}
