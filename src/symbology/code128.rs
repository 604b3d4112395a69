//! Code 128 encoder.
//!
//! Digit-only payloads of even length are packed two digits per symbol in code set C.
//! Everything else goes through code set B, with SHIFT to code set A for ASCII control
//! characters.

use super::{EncodeError, EncodedBarcode};

/// Symbol patterns 0..=105 as bar/space widths, 6 elements summing to 11 modules.
const PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232",
];

/// STOP pattern including the final 2-module termination bar.
const STOP: &str = "2331112";

const SHIFT: u8 = 98;
const START_B: u8 = 104;
const START_C: u8 = 105;

/// Encode `text` as Code 128.
pub fn encode(text: &str) -> Result<EncodedBarcode, EncodeError> {
    let values = symbol_values(text)?;
    let check = checksum(&values);

    let mut modules = Vec::with_capacity((values.len() + 1) * 11 + 13);
    for &v in values.iter().chain(std::iter::once(&check)) {
        push_symbol(&mut modules, PATTERNS[v as usize]);
    }
    push_symbol(&mut modules, STOP);

    Ok(EncodedBarcode {
        modules,
        human_readable: text.chars().filter(|c| !c.is_ascii_control()).collect(),
    })
}

/// Start symbol followed by data symbol values, check symbol excluded.
fn symbol_values(text: &str) -> Result<Vec<u8>, EncodeError> {
    let bytes = text.as_bytes();

    if bytes.len() % 2 == 0 && bytes.iter().all(u8::is_ascii_digit) {
        let mut values = vec![START_C];
        values.extend(
            bytes
                .chunks(2)
                .map(|pair| (pair[0] - b'0') * 10 + (pair[1] - b'0')),
        );
        return Ok(values);
    }

    let mut values = vec![START_B];
    for (position, ch) in text.chars().enumerate() {
        if !ch.is_ascii() {
            return Err(EncodeError::InvalidCharacter { ch, position });
        }
        let b = ch as u8;
        match b {
            32..=127 => values.push(b - 32),
            _ => {
                values.push(SHIFT);
                values.push(b + 64);
            }
        }
    }
    Ok(values)
}

/// Weighted mod-103 check: the start symbol has weight 1, the n-th data symbol weight n.
fn checksum(values: &[u8]) -> u8 {
    let sum: usize = values
        .iter()
        .enumerate()
        .map(|(i, &v)| i.max(1) * v as usize)
        .sum();
    (sum % 103) as u8
}

fn push_symbol(modules: &mut Vec<bool>, pattern: &str) {
    let widths: Vec<u8> = pattern.bytes().map(|b| b - b'0').collect();
    EncodedBarcode::push_widths(modules, &widths);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_eleven_modules() {
        for p in PATTERNS {
            let total: u32 = p.bytes().map(|b| (b - b'0') as u32).sum();
            assert_eq!(total, 11, "pattern {}", p);
        }
        let stop: u32 = STOP.bytes().map(|b| (b - b'0') as u32).sum();
        assert_eq!(stop, 13);
    }

    #[test]
    fn test_code_set_b_checksum() {
        let values = symbol_values("A").unwrap();
        assert_eq!(values, vec![START_B, 33]);
        assert_eq!(checksum(&values), 34);
    }

    #[test]
    fn test_even_digits_use_code_set_c() {
        let values = symbol_values("1234").unwrap();
        assert_eq!(values, vec![START_C, 12, 34]);
        // 105 + 1*12 + 2*34 = 185 -> 185 mod 103 = 82
        assert_eq!(checksum(&values), 82);
    }

    #[test]
    fn test_odd_digits_fall_back_to_code_set_b() {
        let values = symbol_values("123").unwrap();
        assert_eq!(values[0], START_B);
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_control_characters_use_shift() {
        let values = symbol_values("A\tB").unwrap();
        assert_eq!(values, vec![START_B, 33, SHIFT, 9 + 64, 34]);
    }

    #[test]
    fn test_module_count() {
        let encoded = encode("A").unwrap();
        // start + data + check symbols, then stop
        assert_eq!(encoded.width(), 3 * 11 + 13);
        assert!(encoded.modules[0]);
        assert!(*encoded.modules.last().unwrap());
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert_eq!(
            encode("Aé"),
            Err(EncodeError::InvalidCharacter { ch: 'é', position: 1 })
        );
    }
}
