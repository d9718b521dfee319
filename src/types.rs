use crate::{G1_BYTES, G2_BYTES, WORD_BYTES};
use alloc::vec::Vec;
use ark_bn254::{G1Affine, G2Affine};

/// One big-endian uint256 as the EVM sees it.
pub type Word = [u8; WORD_BYTES];

/// A G1 point in EVM encoding: `x ‖ y`, with `(0, 0)` standing for infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G1Point {
    pub x: Word,
    pub y: Word,
}

impl G1Point {
    pub fn infinity() -> Self {
        G1Point {
            x: [0u8; WORD_BYTES],
            y: [0u8; WORD_BYTES],
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.x.iter().chain(self.y.iter()).all(|b| *b == 0)
    }

    pub fn from_bytes(bytes: &[u8; G1_BYTES]) -> Self {
        let mut x = [0u8; WORD_BYTES];
        let mut y = [0u8; WORD_BYTES];
        x.copy_from_slice(&bytes[..WORD_BYTES]);
        y.copy_from_slice(&bytes[WORD_BYTES..]);
        G1Point { x, y }
    }

    pub fn to_bytes(&self) -> [u8; G1_BYTES] {
        let mut out = [0u8; G1_BYTES];
        out[..WORD_BYTES].copy_from_slice(&self.x);
        out[WORD_BYTES..].copy_from_slice(&self.y);
        out
    }
}

/// A G2 point in EVM word order. Each coordinate is `[c1, c0]`, imaginary
/// part first, which is how snarkjs writes `pi_b` into the call arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2Point {
    pub x: [Word; 2],
    pub y: [Word; 2],
}

impl G2Point {
    pub fn infinity() -> Self {
        G2Point {
            x: [[0u8; WORD_BYTES]; 2],
            y: [[0u8; WORD_BYTES]; 2],
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.x
            .iter()
            .chain(self.y.iter())
            .all(|w| w.iter().all(|b| *b == 0))
    }

    pub fn from_bytes(bytes: &[u8; G2_BYTES]) -> Self {
        let mut words = [[0u8; WORD_BYTES]; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(WORD_BYTES)) {
            word.copy_from_slice(chunk);
        }
        G2Point {
            x: [words[0], words[1]],
            y: [words[2], words[3]],
        }
    }

    pub fn to_bytes(&self) -> [u8; G2_BYTES] {
        let mut out = [0u8; G2_BYTES];
        let words = [self.x[0], self.x[1], self.y[0], self.y[1]];
        for (chunk, word) in out.chunks_exact_mut(WORD_BYTES).zip(words.iter()) {
            chunk.copy_from_slice(word);
        }
        out
    }
}

/// Groth16 proof elements `(A, B, C)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proof {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

/// Everything `verifyProof` receives: the proof and the public-input vector,
/// still as raw words. Range checks happen in the verifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofCalldata {
    pub proof: Proof,
    pub public_inputs: Vec<Word>,
}

/// Decoded Groth16 verification key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationKey {
    pub alpha_g1: G1Affine,
    pub beta_g2: G2Affine,
    pub gamma_g2: G2Affine,
    pub delta_g2: G2Affine,
    /// `IC[0]` plus one point per public input.
    pub ic: Vec<G1Affine>,
}

impl VerificationKey {
    pub fn num_public_inputs(&self) -> usize {
        self.ic.len().saturating_sub(1)
    }
}
