//! Code 39 encoder with mod-43 check character.

use super::{EncodeError, EncodedBarcode};

/// Character set in check-value order.
const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Module patterns in `CHARSET` order (wide elements are 2 modules).
const PATTERNS: [&str; 43] = [
    "101001101101", "110100101011", "101100101011", "110110010101", "101001101011",
    "110100110101", "101100110101", "101001011011", "110100101101", "101100101101",
    "110101001011", "101101001011", "110110100101", "101011001011", "110101100101",
    "101101100101", "101010011011", "110101001101", "101101001101", "101011001101",
    "110101010011", "101101010011", "110110101001", "101011010011", "110101101001",
    "101101101001", "101010110011", "110101011001", "101101011001", "101011011001",
    "110010101011", "100110101011", "110011010101", "100101101011", "110010110101",
    "100110110101", "100101011011", "110010101101", "100110101101", "100100100101",
    "100100101001", "100101001001", "101001001001",
];

/// Start/stop character `*`.
const GUARD: &str = "100101101101";

/// Encode `text` as Code 39. Lower-case letters are upper-cased first.
pub fn encode(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let upper = text.to_ascii_uppercase();
    let values = upper
        .chars()
        .enumerate()
        .map(|(position, ch)| {
            CHARSET
                .find(ch)
                .ok_or(EncodeError::InvalidCharacter { ch, position })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let check = values.iter().sum::<usize>() % 43;

    let mut modules = Vec::new();
    EncodedBarcode::push_pattern(&mut modules, GUARD);
    for &v in values.iter().chain(std::iter::once(&check)) {
        modules.push(false);
        EncodedBarcode::push_pattern(&mut modules, PATTERNS[v]);
    }
    modules.push(false);
    EncodedBarcode::push_pattern(&mut modules, GUARD);

    Ok(EncodedBarcode {
        modules,
        human_readable: upper,
    })
}

/// Check character for an already upper-cased payload
pub fn check_character(text: &str) -> Option<char> {
    let sum = text
        .chars()
        .map(|ch| CHARSET.find(ch))
        .sum::<Option<usize>>()?;
    CHARSET.chars().nth(sum % 43)
}
