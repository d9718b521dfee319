//! Groth16 verification with the snarkjs Solidity verifier's accept/reject rules.
//!
//! `Ok(false)` means the pairing check ran and failed. Everything the
//! `Verifier` contract guards with a `require` is an `Err`: a public-input
//! vector of the wrong length, a public input ≥ r, and a proof point the
//! curve precompiles refuse (coordinate ≥ q, off the curve, or outside the
//! subgroup).

use crate::ec::{g1_affine, g1_msm, g2_affine, pairing_check};
use crate::field::fr_from_be_word;
use crate::types::{ProofCalldata, VerificationKey};
use crate::vk::deserialize_vk_from_bytes;
use alloc::{string::String, vec::Vec};
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Verification key bytes or JSON could not be decoded.
    InvalidVk(&'static str),
    /// Call arguments do not have the `[a, b, c, inputs]` shape.
    InvalidCalldata(String),
    PublicInputsMismatch { expected: usize, provided: usize },
    /// Public input at `index` is not below the scalar field modulus.
    InputNotInField { index: usize },
    /// Proof point `a`, `b` or `c` is not a valid curve point.
    InvalidProofPoint(&'static str),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::InvalidVk(what) => write!(f, "invalid verification key: {what}"),
            VerifyError::InvalidCalldata(what) => write!(f, "invalid call arguments: {what}"),
            VerifyError::PublicInputsMismatch { expected, provided } => write!(
                f,
                "verification key expects {expected} public inputs, got {provided}"
            ),
            VerifyError::InputNotInField { index } => {
                write!(f, "public input {index} is not below the scalar field modulus")
            }
            VerifyError::InvalidProofPoint(which) => {
                write!(f, "proof point {which} is not a valid curve point")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VerifyError {}

pub struct Groth16Verifier {
    vk: VerificationKey,
}

impl Groth16Verifier {
    pub fn new_with_vk(vk: VerificationKey) -> Self {
        Self { vk }
    }

    /// Build from the compact key blob produced by `preprocess_vk`.
    pub fn new(vk_bytes: &[u8]) -> Result<Self, VerifyError> {
        Ok(Self::new_with_vk(deserialize_vk_from_bytes(vk_bytes)?))
    }

    /// Build straight from a snarkjs `verification_key.json`.
    #[cfg(feature = "serde_json")]
    pub fn new_from_json(json: &str) -> Result<Self, VerifyError> {
        Ok(Self::new_with_vk(crate::vk::load_vk_from_json(json)?))
    }

    pub fn get_vk(&self) -> &VerificationKey {
        &self.vk
    }

    pub fn verify(&self, calldata: &ProofCalldata) -> Result<bool, VerifyError> {
        let Some((ic0, ic_rest)) = self.vk.ic.split_first() else {
            return Err(VerifyError::InvalidVk("empty IC"));
        };
        let expected = ic_rest.len();
        let provided = calldata.public_inputs.len();
        if expected != provided {
            return Err(VerifyError::PublicInputsMismatch { expected, provided });
        }

        // 1) public inputs must be canonical scalars
        let scalars = calldata
            .public_inputs
            .iter()
            .enumerate()
            .map(|(index, word)| {
                fr_from_be_word(word).ok_or(VerifyError::InputNotInField { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // 2) proof points
        let proof = &calldata.proof;
        let a = g1_affine(&proof.a).ok_or(VerifyError::InvalidProofPoint("a"))?;
        let b = g2_affine(&proof.b).ok_or(VerifyError::InvalidProofPoint("b"))?;
        let c = g1_affine(&proof.c).ok_or(VerifyError::InvalidProofPoint("c"))?;

        // 3) vk_x = IC[0] + Σ input_i·IC[i+1]
        let vk_x = g1_msm(ic0, ic_rest, &scalars);
        trace!("vk_x = {:?}", vk_x);

        // 4) e(-A, B)·e(α, β)·e(vk_x, γ)·e(C, δ) == 1
        let ok = pairing_check(
            &[-a, self.vk.alpha_g1, vk_x, c],
            &[b, self.vk.beta_g2, self.vk.gamma_g2, self.vk.delta_g2],
        );
        trace!("pairing check: {}", ok);
        Ok(ok)
    }
}
