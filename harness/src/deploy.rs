//! The deploy/verify seam and its Soroban implementation.

use std::sync::Arc;

use groth16_rust_verifier::{vk::deserialize_vk_from_bytes, ProofCalldata};
use groth16_soroban_verifier::{Groth16VerifierContract, Groth16VerifierContractClient};
use soroban_env_host::DiagnosticLevel;
use soroban_sdk::{testutils::EnvTestConfig, Address, Bytes, BytesN, Env, Vec as SorobanVec};
use tracing::debug;

use crate::artifacts::CallArgs;
use crate::error::{HarnessError, Result};

/// Produces fresh, independent verifier instances.
pub trait VerifierFactory: Send + Sync {
    fn deploy(&self) -> Result<Box<dyn VerifierHandle>>;
}

/// A deployed verifier. `verify_proof` is a read-only query: calling it
/// twice with the same arguments gives the same answer.
pub trait VerifierHandle {
    fn verify_proof(&self, args: &CallArgs) -> Result<bool>;
}

/// Deploys `Groth16VerifierContract` into a new Soroban host per call.
pub struct SorobanVerifierFactory {
    vk_blob: Arc<[u8]>,
}

impl SorobanVerifierFactory {
    pub fn new(vk_blob: impl Into<Arc<[u8]>>) -> Self {
        SorobanVerifierFactory {
            vk_blob: vk_blob.into(),
        }
    }
}

impl VerifierFactory for SorobanVerifierFactory {
    fn deploy(&self) -> Result<Box<dyn VerifierHandle>> {
        // the constructor would panic inside the host on a bad key
        deserialize_vk_from_bytes(&self.vk_blob)
            .map_err(|err| HarnessError::Deployment(err.to_string()))?;

        let env = Env::new_with_config(EnvTestConfig {
            capture_snapshot_at_drop: false,
            ..Default::default()
        });
        env.cost_estimate().budget().reset_unlimited();
        let _ = env.host().set_diagnostic_level(DiagnosticLevel::None);

        let vk = Bytes::from_slice(&env, &self.vk_blob);
        let contract_id = env.register(Groth16VerifierContract, (vk,));
        debug!(vk_len = self.vk_blob.len(), "verifier deployed");
        Ok(Box::new(SorobanVerifierHandle { env, contract_id }))
    }
}

pub struct SorobanVerifierHandle {
    env: Env,
    contract_id: Address,
}

impl VerifierHandle for SorobanVerifierHandle {
    fn verify_proof(&self, args: &CallArgs) -> Result<bool> {
        let calldata = ProofCalldata::from_solidity_args(args.as_slice())
            .map_err(|err| HarnessError::Malformed(err.to_string()))?;

        let env = &self.env;
        let a = BytesN::from_array(env, &calldata.proof.a.to_bytes());
        let b = BytesN::from_array(env, &calldata.proof.b.to_bytes());
        let c = BytesN::from_array(env, &calldata.proof.c.to_bytes());
        let mut inputs = SorobanVec::new(env);
        for word in &calldata.public_inputs {
            inputs.push_back(BytesN::from_array(env, word));
        }

        let client = Groth16VerifierContractClient::new(env, &self.contract_id);
        match client.try_verify_proof(&a, &b, &c, &inputs) {
            Ok(Ok(accepted)) => Ok(accepted),
            Ok(Err(err)) => Err(HarnessError::Malformed(format!(
                "unexpected return value: {err:?}"
            ))),
            Err(Ok(err)) => Err(HarnessError::Malformed(format!("verifier reverted: {err:?}"))),
            Err(Err(err)) => Err(HarnessError::Malformed(format!(
                "verifier invocation failed: {err:?}"
            ))),
        }
    }
}

/// Deploy a fresh verifier and run one proof check on the blocking pool.
/// The handle is created and dropped inside the task.
pub async fn deploy_and_verify(factory: Arc<dyn VerifierFactory>, args: CallArgs) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let handle = factory.deploy()?;
        handle.verify_proof(&args)
    })
    .await
    .map_err(|err| HarnessError::Aborted(err.to_string()))?
}
