//! Soundness harness for circom/snarkjs Groth16 builds.
//!
//! Each scenario pairs one variant's proof artifacts with one variant's
//! verifier, deploys that verifier into a fresh Soroban host, and checks the
//! boolean it returns against the expectation. Cross-checks pair a proof with
//! another variant's verifier to expose under-constrained circuits.

pub mod artifacts;
pub mod config;
pub mod deploy;
pub mod error;
pub mod resolver;
pub mod suite;

pub use artifacts::{ArtifactKind, ArtifactStore, CallArgs, VariantKey};
pub use config::HarnessConfig;
pub use deploy::{deploy_and_verify, SorobanVerifierFactory, VerifierFactory, VerifierHandle};
pub use error::{HarnessError, Result};
pub use resolver::{ContractResolver, ResolutionMode, VerifierBuild, VerifierRef};
pub use suite::{default_scenarios, Expectation, Scenario, ScenarioState, Suite, SuiteReport};
