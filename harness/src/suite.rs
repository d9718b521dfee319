//! Scenario model, the fixed scenario list, and the runner that drives it.

use std::{fmt, process::ExitCode, sync::Arc, time::Duration};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::artifacts::{ArtifactStore, PublicIo, VariantKey};
use crate::config::HarnessConfig;
use crate::deploy::deploy_and_verify;
use crate::error::{HarnessError, Result};
use crate::resolver::{ContractResolver, VerifierBuild, VerifierRef};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expectation {
    Accept,
    Reject,
}

impl Expectation {
    pub fn matches(self, accepted: bool) -> bool {
        accepted == (self == Expectation::Accept)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expectation::Accept => "accept",
            Expectation::Reject => "reject",
        })
    }
}

/// One proof artifact checked against one verifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub label: String,
    pub artifact: VariantKey,
    pub verifier: VariantKey,
    pub expected: Expectation,
}

impl Scenario {
    pub fn self_check(label: impl Into<String>, variant: &str, expected: Expectation) -> Self {
        Self::cross_check(label, variant, variant, expected)
    }

    pub fn cross_check(
        label: impl Into<String>,
        artifact: &str,
        verifier: &str,
        expected: Expectation,
    ) -> Self {
        Scenario {
            label: label.into(),
            artifact: VariantKey::new(artifact),
            verifier: VariantKey::new(verifier),
            expected,
        }
    }

    pub fn is_self_check(&self) -> bool {
        self.artifact == self.verifier
    }
}

/// The enumerated suite. `iszerowrong` accepting the `iszeroevil` proof is
/// the soundness gap this suite exists to demonstrate.
pub fn default_scenarios() -> Vec<Scenario> {
    use Expectation::Accept;
    vec![
        Scenario::self_check("verifies multiplier2", "multiplier2", Accept),
        Scenario::self_check("verifies multipliersq", "multipliersq", Accept),
        Scenario::self_check("verifies advent2", "advent2", Accept),
        Scenario::self_check("verifies iszero-right", "iszeroright", Accept),
        Scenario::self_check("verifies iszero-wrong", "iszerowrong", Accept),
        Scenario::self_check("verifies iszero-evil", "iszeroevil", Accept),
        Scenario::cross_check(
            "verifies iszero-evil using iszero-wrong verifier",
            "iszeroevil",
            "iszerowrong",
            Accept,
        ),
    ]
}

#[derive(Debug)]
pub enum ScenarioState {
    Pending,
    Loaded,
    Verified(bool),
    Passed,
    Failed(HarnessError),
}

impl ScenarioState {
    fn name(&self) -> &'static str {
        match self {
            ScenarioState::Pending => "pending",
            ScenarioState::Loaded => "loaded",
            ScenarioState::Verified(_) => "verified",
            ScenarioState::Passed => "passed",
            ScenarioState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub label: String,
    pub reference: VerifierRef,
    /// Set for self-checks once their public IO has been read.
    pub diagnostic: Option<PublicIo>,
    pub state: ScenarioState,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.state, ScenarioState::Passed)
    }

    pub fn error(&self) -> Option<&HarnessError> {
        match &self.state {
            ScenarioState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn outcome(&self, label: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  verify")?;
        for outcome in &self.outcomes {
            if let Some(io) = &outcome.diagnostic {
                writeln!(f, "      {io}")?;
            }
            match outcome.error() {
                None => writeln!(f, "    ✓ {}", outcome.label)?,
                Some(err) => writeln!(f, "    ✗ {}: {err}", outcome.label)?,
            }
        }
        let failing = self.failures().count();
        write!(
            f,
            "\n  {} passing, {} failing",
            self.outcomes.len() - failing,
            failing
        )
    }
}

pub struct Suite {
    config: HarnessConfig,
    store: ArtifactStore,
    resolver: Arc<dyn ContractResolver>,
    plan: Vec<(Scenario, VerifierRef)>,
}

impl Suite {
    /// Scan the build for verifiers and fix every scenario's verifier
    /// reference up front.
    pub async fn setup(config: HarnessConfig, scenarios: Vec<Scenario>) -> Result<Self> {
        let store = ArtifactStore::new(&config.artifact_root);
        let build = VerifierBuild::load(&store, &config.contract_name).await?;
        info!(
            root = %store.root().display(),
            verifiers = build.len(),
            "verifier build loaded"
        );
        Ok(Self::with_resolver(config, scenarios, Arc::new(build)))
    }

    pub fn with_resolver(
        config: HarnessConfig,
        scenarios: Vec<Scenario>,
        resolver: Arc<dyn ContractResolver>,
    ) -> Self {
        let count = resolver.verifier_count();
        let plan = scenarios
            .into_iter()
            .map(|s| {
                let r = config
                    .resolution
                    .reference(count, &s.verifier, &config.contract_name);
                (s, r)
            })
            .collect();
        Suite {
            store: ArtifactStore::new(&config.artifact_root),
            config,
            resolver,
            plan,
        }
    }

    pub fn plan(&self) -> &[(Scenario, VerifierRef)] {
        &self.plan
    }

    pub async fn run(&self) -> SuiteReport {
        let runs = self.plan.iter().map(|(s, r)| self.run_scenario(s, r));
        let outcomes = if self.config.parallel {
            join_all(runs).await
        } else {
            let mut outcomes = Vec::with_capacity(self.plan.len());
            for run in runs {
                outcomes.push(run.await);
            }
            outcomes
        };
        SuiteReport { outcomes }
    }

    async fn run_scenario(&self, scenario: &Scenario, reference: &VerifierRef) -> ScenarioOutcome {
        let seconds = self.config.scenario_timeout_secs;
        let mut diagnostic = None;
        let state = match tokio::time::timeout(
            Duration::from_secs(seconds),
            self.execute(scenario, reference, &mut diagnostic),
        )
        .await
        {
            Ok(Ok(())) => ScenarioState::Passed,
            Ok(Err(err)) => ScenarioState::Failed(err),
            Err(_) => ScenarioState::Failed(HarnessError::Timeout { seconds }),
        };
        match &state {
            ScenarioState::Failed(err) => {
                warn!(scenario = %scenario.label, kind = err.kind(), error = %err, "scenario failed")
            }
            _ => info!(scenario = %scenario.label, "scenario passed"),
        }
        ScenarioOutcome {
            label: scenario.label.clone(),
            reference: reference.clone(),
            diagnostic,
            state,
        }
    }

    async fn execute(
        &self,
        scenario: &Scenario,
        reference: &VerifierRef,
        diagnostic: &mut Option<PublicIo>,
    ) -> Result<()> {
        let step = |state: &ScenarioState| {
            debug!(scenario = %scenario.label, verifier = %reference, state = state.name())
        };
        step(&ScenarioState::Pending);

        let artifact = self
            .store
            .load(&scenario.artifact, scenario.is_self_check())
            .await?;
        *diagnostic = artifact.public_io;
        let factory = self.resolver.resolve(reference)?;
        step(&ScenarioState::Loaded);

        let accepted = deploy_and_verify(factory, artifact.call_args).await?;
        step(&ScenarioState::Verified(accepted));

        if scenario.expected.matches(accepted) {
            Ok(())
        } else {
            Err(HarnessError::AssertionMismatch {
                expected: scenario.expected,
                actual: accepted,
            })
        }
    }
}
