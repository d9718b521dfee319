//! Real Groth16 proofs over BN254 for a handful of small circuits, written
//! out in the directory layout a circom/snarkjs build produces:
//!
//! ```text
//! inputs/<variant>.json               witness inputs
//! proofs/<variant>/public.json        public signals, decimal strings
//! proofs/<variant>/solidity-args.json [a, b, c, inputs] as 0x words
//! contracts/<variant>.json            snarkjs verification_key.json
//! ```
//!
//! Setup and proving are seeded, so every run produces the same bytes. The
//! `iszerowrong` and `iszeroevil` variants share one constraint system and
//! one setup seed, which makes their verification keys identical.

pub mod circuits;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_relations::r1cs::ConstraintSynthesizer;
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use ark_std::rand::SeedableRng;
use num_bigint::BigUint;
use once_cell::sync::OnceCell;
use rand_chacha::ChaCha20Rng;
use serde_json::{json, Value};
use tempfile::TempDir;

use circuits::{Advent2, IsZero, IsZeroConstraints, IsZeroWitness, Multiplier2, MultiplierSq};

const PROVE_SEED: u64 = 0x5eed_0000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Multiplier2,
    MultiplierSq,
    Advent2,
    IsZeroRight,
    IsZeroWrong,
    IsZeroEvil,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Multiplier2,
        Variant::MultiplierSq,
        Variant::Advent2,
        Variant::IsZeroRight,
        Variant::IsZeroWrong,
        Variant::IsZeroEvil,
    ];

    /// Directory/file stem used for every artifact of this variant.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Multiplier2 => "multiplier2",
            Variant::MultiplierSq => "multipliersq",
            Variant::Advent2 => "advent2",
            Variant::IsZeroRight => "iszeroright",
            Variant::IsZeroWrong => "iszerowrong",
            Variant::IsZeroEvil => "iszeroevil",
        }
    }

    fn setup_seed(self) -> u64 {
        match self {
            Variant::Multiplier2 => 1,
            Variant::MultiplierSq => 2,
            Variant::Advent2 => 3,
            Variant::IsZeroRight => 4,
            // same circuit, same ceremony
            Variant::IsZeroWrong | Variant::IsZeroEvil => 5,
        }
    }
}

/// Artifacts of one variant, kept as JSON values.
#[derive(Clone, Debug)]
pub struct VariantArtifacts {
    pub variant: Variant,
    pub inputs: Value,
    pub public_signals: Value,
    pub solidity_args: Value,
    pub verification_key: Value,
}

impl VariantArtifacts {
    pub fn solidity_args(&self) -> &[Value] {
        self.solidity_args.as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn verification_key_json(&self) -> String {
        self.verification_key.to_string()
    }

    fn files(&self) -> [(String, &Value); 4] {
        let name = self.variant.name();
        [
            (format!("inputs/{name}.json"), &self.inputs),
            (format!("proofs/{name}/public.json"), &self.public_signals),
            (format!("proofs/{name}/solidity-args.json"), &self.solidity_args),
            (format!("contracts/{name}.json"), &self.verification_key),
        ]
    }
}

static ARTIFACTS: OnceCell<Vec<VariantArtifacts>> = OnceCell::new();

/// Lazily generated artifacts, shared by every test in the process.
pub fn artifacts(variant: Variant) -> &'static VariantArtifacts {
    let all = ARTIFACTS.get_or_init(|| {
        Variant::ALL
            .iter()
            .map(|v| build_artifacts(*v).expect("failed to build Groth16 fixtures"))
            .collect()
    });
    all.iter()
        .find(|a| a.variant == variant)
        .expect("every variant is generated")
}

/// Build artifacts for `variant` without touching the shared cache.
pub fn build_artifacts(variant: Variant) -> Result<VariantArtifacts> {
    let f = |v: u64| Fr::from(v);
    match variant {
        Variant::Multiplier2 => prove(
            variant,
            Multiplier2::default(),
            Multiplier2 {
                a: Some(f(3)),
                b: Some(f(11)),
            },
            json!({ "a": "3", "b": "11" }),
            vec![f(33)],
        ),
        Variant::MultiplierSq => prove(
            variant,
            MultiplierSq::default(),
            MultiplierSq {
                a: Some(f(3)),
                b: Some(f(11)),
            },
            json!({ "a": "3", "b": "11" }),
            vec![f(1089)],
        ),
        Variant::Advent2 => {
            let rounds = [(0, 1), (1, 0), (2, 2)];
            prove(
                variant,
                Advent2::default(),
                Advent2 {
                    rounds: Some(rounds),
                },
                json!({ "xs": ["0", "1", "2"], "ys": ["1", "0", "2"] }),
                vec![f(Advent2::score(&rounds))],
            )
        }
        Variant::IsZeroRight => is_zero(
            variant,
            IsZeroConstraints::Complete,
            IsZeroWitness::honest(f(0)),
            "0",
        ),
        Variant::IsZeroWrong => is_zero(
            variant,
            IsZeroConstraints::MissingOutputCheck,
            IsZeroWitness::honest(f(0)),
            "0",
        ),
        Variant::IsZeroEvil => is_zero(
            variant,
            IsZeroConstraints::MissingOutputCheck,
            IsZeroWitness::forged(f(5)),
            "5",
        ),
    }
}

fn is_zero(
    variant: Variant,
    constraints: IsZeroConstraints,
    witness: IsZeroWitness,
    input: &str,
) -> Result<VariantArtifacts> {
    prove(
        variant,
        IsZero {
            constraints,
            witness: None,
        },
        IsZero {
            constraints,
            witness: Some(witness),
        },
        json!({ "in": input }),
        vec![witness.out],
    )
}

fn prove<C: ConstraintSynthesizer<Fr>>(
    variant: Variant,
    shape: C,
    assignment: C,
    inputs: Value,
    public: Vec<Fr>,
) -> Result<VariantArtifacts> {
    let mut setup_rng = ChaCha20Rng::seed_from_u64(variant.setup_seed());
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(shape, &mut setup_rng)
        .with_context(|| format!("setup for {}", variant.name()))?;

    let mut prove_rng = ChaCha20Rng::seed_from_u64(PROVE_SEED + variant as u64);
    let proof = Groth16::<Bn254>::prove(&pk, assignment, &mut prove_rng)
        .with_context(|| format!("proving {}", variant.name()))?;
    ensure!(
        Groth16::<Bn254>::verify(&vk, &public, &proof)?,
        "{} proof does not verify against its own key",
        variant.name()
    );

    Ok(VariantArtifacts {
        variant,
        inputs,
        public_signals: Value::Array(public.iter().map(|x| json!(decimal(x))).collect()),
        solidity_args: solidity_args(&proof, &public),
        verification_key: verification_key_json(&vk),
    })
}

fn decimal<F: PrimeField>(x: &F) -> String {
    BigUint::from_bytes_be(&x.into_bigint().to_bytes_be()).to_string()
}

fn word<F: PrimeField>(x: &F) -> String {
    format!("0x{}", hex::encode(x.into_bigint().to_bytes_be()))
}

fn g1_json(p: &G1Affine) -> Value {
    if p.is_zero() {
        return json!(["0", "1", "0"]);
    }
    json!([decimal(&p.x), decimal(&p.y), "1"])
}

fn g2_json(p: &G2Affine) -> Value {
    if p.is_zero() {
        return json!([["0", "0"], ["1", "0"], ["0", "0"]]);
    }
    json!([
        [decimal(&p.x.c0), decimal(&p.x.c1)],
        [decimal(&p.y.c0), decimal(&p.y.c1)],
        ["1", "0"]
    ])
}

fn verification_key_json(vk: &VerifyingKey<Bn254>) -> Value {
    json!({
        "protocol": "groth16",
        "curve": "bn128",
        "nPublic": vk.gamma_abc_g1.len() - 1,
        "vk_alpha_1": g1_json(&vk.alpha_g1),
        "vk_beta_2": g2_json(&vk.beta_g2),
        "vk_gamma_2": g2_json(&vk.gamma_g2),
        "vk_delta_2": g2_json(&vk.delta_g2),
        "IC": vk.gamma_abc_g1.iter().map(g1_json).collect::<Vec<_>>(),
    })
}

/// `[a, b, c, inputs]` with G2 words imaginary part first.
fn solidity_args(proof: &Proof<Bn254>, public: &[Fr]) -> Value {
    let (a, b, c) = (&proof.a, &proof.b, &proof.c);
    json!([
        [word(&a.x), word(&a.y)],
        [[word(&b.x.c1), word(&b.x.c0)], [word(&b.y.c1), word(&b.y.c0)]],
        [word(&c.x), word(&c.y)],
        public.iter().map(word).collect::<Vec<_>>(),
    ])
}

/// A throwaway artifact root on disk, removed on drop.
pub struct FixtureStore {
    dir: TempDir,
}

impl FixtureStore {
    /// Every variant.
    pub fn new() -> Result<Self> {
        Self::with_variants(&Variant::ALL)
    }

    pub fn with_variants(variants: &[Variant]) -> Result<Self> {
        let store = FixtureStore {
            dir: tempfile::tempdir().context("create fixture dir")?,
        };
        for variant in variants {
            for (relative, value) in artifacts(*variant).files() {
                store.write_json(&relative, value)?;
            }
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write_json(&self, relative: &str, value: &Value) -> Result<()> {
        self.write_raw(relative, value.to_string().as_bytes())
    }

    pub fn write_raw(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))
    }

    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.path(relative);
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_and_evil_share_a_verification_key() {
        assert_eq!(
            artifacts(Variant::IsZeroWrong).verification_key,
            artifacts(Variant::IsZeroEvil).verification_key
        );
        assert_ne!(
            artifacts(Variant::IsZeroRight).verification_key,
            artifacts(Variant::IsZeroEvil).verification_key
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let again = build_artifacts(Variant::Multiplier2).unwrap();
        assert_eq!(again.solidity_args, artifacts(Variant::Multiplier2).solidity_args);
    }

    #[test]
    fn public_signals_match_expected_outputs() {
        assert_eq!(artifacts(Variant::Multiplier2).public_signals, json!(["33"]));
        assert_eq!(artifacts(Variant::MultiplierSq).public_signals, json!(["1089"]));
        assert_eq!(artifacts(Variant::Advent2).public_signals, json!(["15"]));
        assert_eq!(artifacts(Variant::IsZeroEvil).public_signals, json!(["1"]));
    }

    #[test]
    fn store_writes_the_build_layout() {
        let store = FixtureStore::with_variants(&[Variant::Advent2]).unwrap();
        for relative in [
            "inputs/advent2.json",
            "proofs/advent2/public.json",
            "proofs/advent2/solidity-args.json",
            "contracts/advent2.json",
        ] {
            assert!(store.path(relative).is_file(), "{relative} missing");
        }
        assert!(!store.path("contracts/multiplier2.json").exists());
    }
}
