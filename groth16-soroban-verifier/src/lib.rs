#![no_std]
extern crate alloc;

use alloc::vec::Vec as StdVec;
use groth16_rust_verifier::{
    vk::deserialize_vk_from_bytes, G1Point, G2Point, Groth16Verifier, Proof, ProofCalldata,
    VerifyError,
};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Bytes, BytesN, Env, Symbol,
};

/// Groth16 verifier bound to one verification key at deploy time.
#[contract]
pub struct Groth16VerifierContract;

#[contracterror]
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    VkParseError = 1,
    VkNotSet = 2,
    PublicInputsMismatch = 3,
    InputNotInField = 4,
    InvalidProofPoint = 5,
}

impl From<VerifyError> for Error {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::PublicInputsMismatch { .. } => Error::PublicInputsMismatch,
            VerifyError::InputNotInField { .. } => Error::InputNotInField,
            VerifyError::InvalidProofPoint(_) => Error::InvalidProofPoint,
            VerifyError::InvalidVk(_) | VerifyError::InvalidCalldata(_) => Error::VkParseError,
        }
    }
}

fn key_vk() -> Symbol {
    symbol_short!("vk")
}

fn bytes_to_vec(bytes: &Bytes) -> StdVec<u8> {
    let mut buf = alloc::vec![0u8; bytes.len() as usize];
    bytes.copy_into_slice(&mut buf);
    buf
}

fn load_verifier(env: &Env) -> Result<Groth16Verifier, Error> {
    let vk_bytes: Bytes = env
        .storage()
        .instance()
        .get(&key_vk())
        .ok_or(Error::VkNotSet)?;
    Groth16Verifier::new(&bytes_to_vec(&vk_bytes)).map_err(|_| Error::VkParseError)
}

#[contractimpl]
impl Groth16VerifierContract {
    /// Store the compact verification key blob. A blob that does not decode
    /// fails the deployment.
    pub fn __constructor(env: Env, vk_bytes: Bytes) -> Result<(), Error> {
        deserialize_vk_from_bytes(&bytes_to_vec(&vk_bytes)).map_err(|_| Error::VkParseError)?;
        env.storage().instance().set(&key_vk(), &vk_bytes);
        Ok(())
    }

    /// `verifyProof(a, b, c, inputs)`. `b` words are imaginary part first.
    /// Returns `false` only when the pairing check fails. A wrong input
    /// count, an input ≥ r, or an invalid proof point is an error.
    pub fn verify_proof(
        env: Env,
        a: BytesN<64>,
        b: BytesN<128>,
        c: BytesN<64>,
        inputs: soroban_sdk::Vec<BytesN<32>>,
    ) -> Result<bool, Error> {
        let verifier = load_verifier(&env)?;
        let calldata = ProofCalldata {
            proof: Proof {
                a: G1Point::from_bytes(&a.to_array()),
                b: G2Point::from_bytes(&b.to_array()),
                c: G1Point::from_bytes(&c.to_array()),
            },
            public_inputs: inputs.iter().map(|w| w.to_array()).collect(),
        };
        verifier.verify(&calldata).map_err(Error::from)
    }

    /// Number of public inputs the stored key expects.
    pub fn public_input_count(env: Env) -> Result<u32, Error> {
        let verifier = load_verifier(&env)?;
        Ok(verifier.get_vk().num_public_inputs() as u32)
    }
}
