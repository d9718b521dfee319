//! Verification key decoding: the snarkjs JSON form and the compact blob the
//! contract stores.
//!
//! Blob layout (no header): `alpha (G1) ‖ beta ‖ gamma ‖ delta (G2) ‖ IC[0..]`,
//! every point in EVM encoding (see [`crate::types`]).

use crate::ec::{g1_affine, g1_point, g2_affine, g2_point};
use crate::types::{G1Point, G2Point, VerificationKey};
use crate::verifier::VerifyError;
use crate::{G1_BYTES, G2_BYTES};
use alloc::vec::Vec;
use ark_bn254::{G1Affine, G2Affine};

pub const VK_FIXED_LEN: usize = G1_BYTES + 3 * G2_BYTES;

pub fn serialize_vk_to_bytes(vk: &VerificationKey) -> Vec<u8> {
    let mut out = Vec::with_capacity(VK_FIXED_LEN + vk.ic.len() * G1_BYTES);
    out.extend_from_slice(&g1_point(&vk.alpha_g1).to_bytes());
    for g2 in [&vk.beta_g2, &vk.gamma_g2, &vk.delta_g2] {
        out.extend_from_slice(&g2_point(g2).to_bytes());
    }
    for ic in &vk.ic {
        out.extend_from_slice(&g1_point(ic).to_bytes());
    }
    out
}

fn read_g1(chunk: &[u8], what: &'static str) -> Result<G1Affine, VerifyError> {
    let mut buf = [0u8; G1_BYTES];
    buf.copy_from_slice(chunk);
    g1_affine(&G1Point::from_bytes(&buf)).ok_or(VerifyError::InvalidVk(what))
}

fn read_g2(chunk: &[u8], what: &'static str) -> Result<G2Affine, VerifyError> {
    let mut buf = [0u8; G2_BYTES];
    buf.copy_from_slice(chunk);
    g2_affine(&G2Point::from_bytes(&buf)).ok_or(VerifyError::InvalidVk(what))
}

pub fn deserialize_vk_from_bytes(bytes: &[u8]) -> Result<VerificationKey, VerifyError> {
    if bytes.len() < VK_FIXED_LEN + G1_BYTES || (bytes.len() - VK_FIXED_LEN) % G1_BYTES != 0 {
        return Err(VerifyError::InvalidVk("blob length"));
    }

    let alpha_g1 = read_g1(&bytes[..G1_BYTES], "alpha")?;
    let beta_g2 = read_g2(&bytes[G1_BYTES..G1_BYTES + G2_BYTES], "beta")?;
    let gamma_g2 = read_g2(&bytes[G1_BYTES + G2_BYTES..G1_BYTES + 2 * G2_BYTES], "gamma")?;
    let delta_g2 = read_g2(&bytes[G1_BYTES + 2 * G2_BYTES..VK_FIXED_LEN], "delta")?;

    let ic = bytes[VK_FIXED_LEN..]
        .chunks_exact(G1_BYTES)
        .map(|chunk| read_g1(chunk, "IC"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VerificationKey {
        alpha_g1,
        beta_g2,
        gamma_g2,
        delta_g2,
        ic,
    })
}

#[cfg(feature = "serde_json")]
mod snarkjs {
    use super::*;
    use crate::utils::parse_word;
    use alloc::string::String;
    use serde::Deserialize;

    /// `verification_key.json` as written by `snarkjs zkey export verificationkey`.
    /// Points are projective, decimal, G2 coordinates `[c0, c1]`.
    #[derive(Deserialize)]
    struct SnarkjsVk {
        protocol: String,
        curve: String,
        #[serde(rename = "nPublic")]
        n_public: usize,
        vk_alpha_1: Vec<String>,
        vk_beta_2: Vec<Vec<String>>,
        vk_gamma_2: Vec<Vec<String>>,
        vk_delta_2: Vec<Vec<String>>,
        #[serde(rename = "IC")]
        ic: Vec<Vec<String>>,
    }

    fn word(s: &str, what: &'static str) -> Result<[u8; 32], VerifyError> {
        parse_word(s).ok_or(VerifyError::InvalidVk(what))
    }

    fn is_small(w: &[u8; 32], v: u8) -> bool {
        w[..31].iter().all(|b| *b == 0) && w[31] == v
    }

    fn g1_from_json(coords: &[String], what: &'static str) -> Result<G1Affine, VerifyError> {
        let [x, y, z] = coords else {
            return Err(VerifyError::InvalidVk(what));
        };
        let z = word(z, what)?;
        if is_small(&z, 0) {
            return Ok(G1Affine::identity());
        }
        if !is_small(&z, 1) {
            return Err(VerifyError::InvalidVk(what));
        }
        let pt = G1Point {
            x: word(x, what)?,
            y: word(y, what)?,
        };
        g1_affine(&pt).ok_or(VerifyError::InvalidVk(what))
    }

    fn g2_from_json(coords: &[Vec<String>], what: &'static str) -> Result<G2Affine, VerifyError> {
        let [x, y, z] = coords else {
            return Err(VerifyError::InvalidVk(what));
        };
        let ([x0, x1], [y0, y1], [z0, z1]) = (x.as_slice(), y.as_slice(), z.as_slice()) else {
            return Err(VerifyError::InvalidVk(what));
        };
        let (z0, z1) = (word(z0, what)?, word(z1, what)?);
        if is_small(&z0, 0) && is_small(&z1, 0) {
            return Ok(G2Affine::identity());
        }
        if !(is_small(&z0, 1) && is_small(&z1, 0)) {
            return Err(VerifyError::InvalidVk(what));
        }
        // JSON is [c0, c1]; the EVM encoding wants [c1, c0]
        let pt = G2Point {
            x: [word(x1, what)?, word(x0, what)?],
            y: [word(y1, what)?, word(y0, what)?],
        };
        g2_affine(&pt).ok_or(VerifyError::InvalidVk(what))
    }

    pub fn load_vk_from_json(json: &str) -> Result<VerificationKey, VerifyError> {
        let raw: SnarkjsVk =
            serde_json::from_str(json).map_err(|_| VerifyError::InvalidVk("json"))?;
        if raw.protocol != "groth16" {
            return Err(VerifyError::InvalidVk("protocol"));
        }
        if raw.curve != "bn128" && raw.curve != "bn254" {
            return Err(VerifyError::InvalidVk("curve"));
        }
        if raw.ic.len() != raw.n_public + 1 {
            return Err(VerifyError::InvalidVk("IC length does not match nPublic"));
        }

        let ic = raw
            .ic
            .iter()
            .map(|p| g1_from_json(p, "IC"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VerificationKey {
            alpha_g1: g1_from_json(&raw.vk_alpha_1, "vk_alpha_1")?,
            beta_g2: g2_from_json(&raw.vk_beta_2, "vk_beta_2")?,
            gamma_g2: g2_from_json(&raw.vk_gamma_2, "vk_gamma_2")?,
            delta_g2: g2_from_json(&raw.vk_delta_2, "vk_delta_2")?,
            ic,
        })
    }

    /// snarkjs JSON → compact blob, in one step.
    pub fn preprocess_vk_json(json: &str) -> Result<Vec<u8>, VerifyError> {
        load_vk_from_json(json).map(|vk| serialize_vk_to_bytes(&vk))
    }
}

#[cfg(feature = "serde_json")]
pub use snarkjs::{load_vk_from_json, preprocess_vk_json};
