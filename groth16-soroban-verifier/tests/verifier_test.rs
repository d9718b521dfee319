use groth16_rust_verifier::{vk::preprocess_vk_json, ProofCalldata};
use groth16_soroban_verifier::{Error, Groth16VerifierContract, Groth16VerifierContractClient};
use groth16_test_fixtures::{artifacts, Variant};
use soroban_env_host::DiagnosticLevel;
use soroban_sdk::{Bytes, BytesN, Env, Vec as SorobanVec};

struct Args {
    a: BytesN<64>,
    b: BytesN<128>,
    c: BytesN<64>,
    inputs: SorobanVec<BytesN<32>>,
}

// r, the BN254 scalar field modulus
const SCALAR_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

fn fresh_env() -> Env {
    let env = Env::default();
    env.cost_estimate().budget().reset_unlimited();
    let _ = env.host().set_diagnostic_level(DiagnosticLevel::None);
    env
}

fn deploy<'a>(env: &'a Env, verifier: Variant) -> Groth16VerifierContractClient<'a> {
    let blob = preprocess_vk_json(&artifacts(verifier).verification_key_json())
        .expect("fixture key decodes");
    let id = env.register(Groth16VerifierContract, (Bytes::from_slice(env, &blob),));
    Groth16VerifierContractClient::new(env, &id)
}

fn args_from(env: &Env, calldata: &ProofCalldata) -> Args {
    let mut inputs = SorobanVec::new(env);
    for word in &calldata.public_inputs {
        inputs.push_back(BytesN::from_array(env, word));
    }
    Args {
        a: BytesN::from_array(env, &calldata.proof.a.to_bytes()),
        b: BytesN::from_array(env, &calldata.proof.b.to_bytes()),
        c: BytesN::from_array(env, &calldata.proof.c.to_bytes()),
        inputs,
    }
}

fn calldata(proof: Variant) -> ProofCalldata {
    ProofCalldata::from_solidity_args(artifacts(proof).solidity_args()).expect("fixture args decode")
}

fn verify(proof: Variant, verifier: Variant) -> bool {
    let env = fresh_env();
    let client = deploy(&env, verifier);
    let args = args_from(&env, &calldata(proof));
    client.verify_proof(&args.a, &args.b, &args.c, &args.inputs)
}

#[test]
fn honest_proofs_verify() {
    for variant in [
        Variant::Multiplier2,
        Variant::MultiplierSq,
        Variant::Advent2,
        Variant::IsZeroRight,
        Variant::IsZeroWrong,
    ] {
        assert!(verify(variant, variant), "{} rejected", variant.name());
    }
}

#[test]
fn forged_is_zero_proof_passes_only_the_weak_verifier() {
    assert!(verify(Variant::IsZeroEvil, Variant::IsZeroEvil));
    assert!(verify(Variant::IsZeroEvil, Variant::IsZeroWrong));
    assert!(!verify(Variant::IsZeroEvil, Variant::IsZeroRight));
}

#[test]
fn proof_for_another_circuit_is_rejected() {
    assert!(!verify(Variant::Multiplier2, Variant::IsZeroRight));
}

#[test]
fn tampered_public_input_is_rejected() {
    let env = fresh_env();
    let client = deploy(&env, Variant::Multiplier2);
    let mut calldata = calldata(Variant::Multiplier2);
    calldata.public_inputs[0][31] ^= 1;
    let args = args_from(&env, &calldata);
    assert!(!client.verify_proof(&args.a, &args.b, &args.c, &args.inputs));
}

#[test]
fn public_input_at_or_above_the_scalar_modulus_reverts() {
    let env = fresh_env();
    let client = deploy(&env, Variant::Multiplier2);
    let mut calldata = calldata(Variant::Multiplier2);
    for word in [SCALAR_MODULUS, [0xff; 32]] {
        calldata.public_inputs[0] = word;
        let args = args_from(&env, &calldata);
        let res = client.try_verify_proof(&args.a, &args.b, &args.c, &args.inputs);
        assert!(matches!(res, Err(Ok(Error::InputNotInField))));
    }
}

#[test]
fn off_curve_proof_point_reverts() {
    let env = fresh_env();
    let client = deploy(&env, Variant::Advent2);
    let mut calldata = calldata(Variant::Advent2);
    calldata.proof.c.y[31] ^= 1;
    let args = args_from(&env, &calldata);
    let res = client.try_verify_proof(&args.a, &args.b, &args.c, &args.inputs);
    assert!(matches!(res, Err(Ok(Error::InvalidProofPoint))));
}

#[test]
fn wrong_input_count_reverts() {
    let env = fresh_env();
    let client = deploy(&env, Variant::Multiplier2);
    let mut calldata = calldata(Variant::Multiplier2);
    calldata.public_inputs.push([0u8; 32]);
    let args = args_from(&env, &calldata);
    let res = client.try_verify_proof(&args.a, &args.b, &args.c, &args.inputs);
    assert!(matches!(res, Err(Ok(Error::PublicInputsMismatch))));
}

#[test]
fn verification_is_repeatable() {
    let env = fresh_env();
    let client = deploy(&env, Variant::MultiplierSq);
    let args = args_from(&env, &calldata(Variant::MultiplierSq));
    let first = client.verify_proof(&args.a, &args.b, &args.c, &args.inputs);
    let second = client.verify_proof(&args.a, &args.b, &args.c, &args.inputs);
    assert!(first && second);
    assert_eq!(client.public_input_count(), 1);
}

#[test]
#[should_panic]
fn garbage_key_fails_deployment() {
    let env = fresh_env();
    env.register(Groth16VerifierContract, (Bytes::from_slice(&env, &[0u8; 10]),));
}
