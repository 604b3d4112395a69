//! Codabar encoder.

use super::{EncodeError, EncodedBarcode};

const CHARSET: &str = "0123456789-$:/.+ABCD";

/// Module patterns in `CHARSET` order (wide elements are 2 modules).
const PATTERNS: [&str; 20] = [
    "101010011",
    "101011001",
    "101001011",
    "110010101",
    "101101001",
    "110101001",
    "100101011",
    "100101101",
    "100110101",
    "110100101",
    "101001101",
    "101100101",
    "1101011011",
    "1101101011",
    "1101101101",
    "1011011011",
    "1011001001",
    "1001001011",
    "1010010011",
    "1010011001",
];

fn is_guard(ch: char) -> bool {
    matches!(ch, 'A'..='D')
}

/// Encode `text` as Codabar. Start/stop characters (A-D) are kept when the payload
/// carries both, otherwise the payload is wrapped in `A...B`.
pub fn encode(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let upper = text.to_ascii_uppercase();
    let chars: Vec<char> = upper.chars().collect();

    let guarded = chars.len() >= 2 && is_guard(chars[0]) && is_guard(chars[chars.len() - 1]);
    let payload = if guarded {
        &chars[1..chars.len() - 1]
    } else {
        &chars[..]
    };
    let offset = usize::from(guarded);

    for (i, &ch) in payload.iter().enumerate() {
        if is_guard(ch) || !CHARSET.contains(ch) {
            return Err(EncodeError::InvalidCharacter {
                ch,
                position: i + offset,
            });
        }
    }

    let full: String = if guarded {
        upper.clone()
    } else {
        format!("A{}B", upper)
    };

    let mut modules = Vec::new();
    for (i, ch) in full.chars().enumerate() {
        if i > 0 {
            modules.push(false);
        }
        let idx = CHARSET.find(ch).unwrap_or_default();
        EncodedBarcode::push_pattern(&mut modules, PATTERNS[idx]);
    }

    Ok(EncodedBarcode {
        modules,
        human_readable: payload.iter().collect(),
    })
}
