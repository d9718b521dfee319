//! Groth16 verifier for circom/snarkjs proofs over BN254.
//!
//! Accept/reject semantics follow the snarkjs Solidity verifier so that a
//! proof checked here behaves exactly as it would against the generated
//! on-chain contract.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "trace")]
macro_rules! trace {
    ($($arg:tt)*) => { std::println!($($arg)*) };
}

#[cfg(not(feature = "trace"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "serde_json")]
pub mod calldata;
pub mod ec;
pub mod field;
pub mod types;
pub mod utils;
pub mod verifier;
pub mod vk;

pub const WORD_BYTES: usize = 32;
pub const G1_BYTES: usize = 2 * WORD_BYTES;
pub const G2_BYTES: usize = 4 * WORD_BYTES;

pub use types::{G1Point, G2Point, Proof, ProofCalldata, VerificationKey};
pub use verifier::{Groth16Verifier, VerifyError};
