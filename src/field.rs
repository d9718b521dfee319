//! Big-endian word ↔ BN254 field element conversion.

use crate::types::Word;
use ark_bn254::{Fq, Fr};
use ark_ff::{BigInt, BigInteger, PrimeField};

/// Big-endian word → field element. `None` unless the value is strictly
/// below the modulus; nothing is reduced.
pub fn from_be_word<F: PrimeField<BigInt = BigInt<4>>>(word: &Word) -> Option<F> {
    let mut limbs = [0u64; 4];
    // limbs[0] holds the least significant 64 bits
    for (limb, chunk) in limbs.iter_mut().zip(word.rchunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(buf);
    }
    F::from_bigint(BigInt::new(limbs))
}

#[inline(always)]
pub fn fq_from_be_word(word: &Word) -> Option<Fq> {
    from_be_word::<Fq>(word)
}

#[inline(always)]
pub fn fr_from_be_word(word: &Word) -> Option<Fr> {
    from_be_word::<Fr>(word)
}

/// Field element → 32-byte big-endian word.
pub fn to_be_word<F: PrimeField<BigInt = BigInt<4>>>(value: &F) -> Word {
    let bytes = value.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{Field, Zero};

    #[test]
    fn modulus_is_not_a_canonical_scalar() {
        let modulus = Fr::MODULUS.to_bytes_be();
        let mut word = [0u8; 32];
        word.copy_from_slice(&modulus);
        assert!(fr_from_be_word(&word).is_none());

        word[31] -= 1;
        let max = fr_from_be_word(&word).expect("r - 1 is canonical");
        assert!((max + Fr::ONE).is_zero());
    }

    #[test]
    fn small_values_keep_their_position() {
        let mut word = [0u8; 32];
        word[31] = 33;
        assert_eq!(fq_from_be_word(&word), Some(Fq::from(33u64)));
        assert_eq!(to_be_word(&Fq::from(33u64)), word);
    }
}
