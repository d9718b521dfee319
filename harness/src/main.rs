//! soundness-harness
//!
//! Runs the default scenario suite against a circom/snarkjs build directory.

use std::{env, path::PathBuf, process::ExitCode};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundness_harness::{default_scenarios, HarnessConfig, Suite};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundness_harness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = HarnessConfig::load(&root)
        .await
        .with_context(|| format!("loading configuration from {}", root.display()))?;
    let suite = Suite::setup(config, default_scenarios())
        .await
        .context("preparing the verifier build")?;

    let report = suite.run().await;
    println!("{report}");
    Ok(report.exit_code())
}
