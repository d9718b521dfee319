//! Parsing of the uint256 strings found in snarkjs JSON artifacts.

use crate::types::Word;
use num_bigint::BigUint;
use num_traits::Num;

/// Parse one uint256 from its JSON string form: `0x`-prefixed hex (as in
/// `solidity-args.json`) or plain decimal (as in `verification_key.json`).
/// Values wider than 256 bits are refused; nothing is reduced here.
pub fn parse_word(s: &str) -> Option<Word> {
    let s = s.trim();
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => BigUint::from_str_radix(digits, 16).ok()?,
        None => BigUint::from_str_radix(s, 10).ok()?,
    };
    biguint_to_word(&value)
}

pub fn biguint_to_word(x: &BigUint) -> Option<Word> {
    let bytes = x.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    Some(out)
}

#[inline(always)]
pub fn u64_to_word(v: u64) -> Word {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&v.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_decimal_agree() {
        let hex = parse_word("0x0000000000000000000000000000000000000000000000000000000000000021");
        assert_eq!(hex, Some(u64_to_word(33)));
        assert_eq!(parse_word("33"), Some(u64_to_word(33)));
        assert_eq!(parse_word("0x21"), Some(u64_to_word(33)));
    }

    #[test]
    fn garbage_and_overflow_are_refused() {
        assert_eq!(parse_word(""), None);
        assert_eq!(parse_word("0x"), None);
        assert_eq!(parse_word("0xzz"), None);
        assert_eq!(parse_word("-1"), None);
        let too_wide = format!("0x1{}", "0".repeat(64));
        assert_eq!(parse_word(&too_wide), None);
    }
}
