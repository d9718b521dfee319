//! Maps verifier references to deployable factories.

use std::{collections::BTreeMap, fmt, io::ErrorKind, sync::Arc};

use groth16_rust_verifier::vk::preprocess_vk_json;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::artifacts::{relative_path, ArtifactKind, ArtifactStore, VariantKey, CONTRACTS_DIR};
use crate::deploy::{SorobanVerifierFactory, VerifierFactory};
use crate::error::{HarnessError, Result};

pub const DEFAULT_CONTRACT_NAME: &str = "Verifier";

/// How a scenario names its verifier. Decided once, at suite setup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VerifierRef {
    /// `<path>:<name>`, unique across the build.
    Namespaced { path: String, name: String },
    /// Contract name alone; only valid when exactly one artifact carries it.
    Bare { name: String },
}

impl VerifierRef {
    pub fn namespaced(variant: &VariantKey, contract_name: &str) -> Self {
        VerifierRef::Namespaced {
            path: relative_path(variant, ArtifactKind::VerificationKey),
            name: contract_name.to_string(),
        }
    }
}

impl fmt::Display for VerifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifierRef::Namespaced { path, name } => write!(f, "{path}:{name}"),
            VerifierRef::Bare { name } => f.write_str(name),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Bare when the build holds a single verifier, namespaced otherwise.
    #[default]
    Auto,
    Namespaced,
    Global,
}

impl ResolutionMode {
    pub fn reference(
        self,
        verifier_count: usize,
        variant: &VariantKey,
        contract_name: &str,
    ) -> VerifierRef {
        let bare = match self {
            ResolutionMode::Auto => verifier_count == 1,
            ResolutionMode::Namespaced => false,
            ResolutionMode::Global => true,
        };
        if bare {
            VerifierRef::Bare {
                name: contract_name.to_string(),
            }
        } else {
            VerifierRef::namespaced(variant, contract_name)
        }
    }
}

pub trait ContractResolver: Send + Sync {
    fn resolve(&self, reference: &VerifierRef) -> Result<Arc<dyn VerifierFactory>>;

    /// Number of verifier artifacts in the build.
    fn verifier_count(&self) -> usize;
}

struct BuildEntry {
    name: String,
    factory: Arc<dyn VerifierFactory>,
}

/// Verifier artifacts found under `contracts/`, keyed by fully qualified name.
#[derive(Default)]
pub struct VerifierBuild {
    entries: BTreeMap<String, BuildEntry>,
}

impl VerifierBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, name: &str, factory: Arc<dyn VerifierFactory>) {
        self.entries.insert(
            format!("{path}:{name}"),
            BuildEntry {
                name: name.to_string(),
                factory,
            },
        );
    }

    /// Scan `<root>/contracts/*.json`, converting each snarkjs key into a
    /// Soroban verifier factory. A key that cannot be read or decoded is
    /// skipped; scenarios that need it fail at resolution.
    pub async fn load(store: &ArtifactStore, contract_name: &str) -> Result<Self> {
        let dir = store.root().join(CONTRACTS_DIR);
        let mut build = VerifierBuild::new();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(dir = %dir.display(), "no verifier artifacts");
                return Ok(build);
            }
            Err(source) => return Err(HarnessError::Io { path: dir, source }),
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "verifier scan stopped early");
                    break;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let json = match tokio::fs::read_to_string(&path).await {
                Ok(json) => json,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable verifier artifact");
                    continue;
                }
            };
            match preprocess_vk_json(&json) {
                Ok(blob) => {
                    let source = relative_path(&VariantKey::new(stem), ArtifactKind::VerificationKey);
                    debug!(%source, blob_len = blob.len(), "verifier artifact loaded");
                    build.insert(&source, contract_name, Arc::new(SorobanVerifierFactory::new(blob)));
                }
                Err(err) => warn!(path = %path.display(), error = %err, "skipping verifier artifact"),
            }
        }
        Ok(build)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContractResolver for VerifierBuild {
    fn resolve(&self, reference: &VerifierRef) -> Result<Arc<dyn VerifierFactory>> {
        let not_found = |reason: String| HarnessError::ImplementationNotFound {
            reference: reference.to_string(),
            reason,
        };
        match reference {
            VerifierRef::Namespaced { .. } => self
                .entries
                .get(&reference.to_string())
                .map(|e| Arc::clone(&e.factory))
                .ok_or_else(|| not_found("no artifact with that fully qualified name".into())),
            VerifierRef::Bare { name } => {
                let matches: Vec<_> = self.entries.values().filter(|e| &e.name == name).collect();
                match matches.as_slice() {
                    [entry] => Ok(Arc::clone(&entry.factory)),
                    [] => Err(not_found(format!("no artifact named `{name}`"))),
                    _ => Err(not_found(format!(
                        "`{name}` is ambiguous across {} artifacts; use a namespaced reference",
                        matches.len()
                    ))),
                }
            }
        }
    }

    fn verifier_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::CallArgs;
    use crate::deploy::VerifierHandle;

    struct Fixed(bool);

    impl VerifierHandle for Fixed {
        fn verify_proof(&self, _args: &CallArgs) -> Result<bool> {
            Ok(self.0)
        }
    }

    impl VerifierFactory for Fixed {
        fn deploy(&self) -> Result<Box<dyn VerifierHandle>> {
            Ok(Box::new(Fixed(self.0)))
        }
    }

    fn build(variants: &[&str]) -> VerifierBuild {
        let mut build = VerifierBuild::new();
        for v in variants {
            let path = relative_path(&VariantKey::new(*v), ArtifactKind::VerificationKey);
            build.insert(&path, DEFAULT_CONTRACT_NAME, Arc::new(Fixed(true)));
        }
        build
    }

    #[test]
    fn namespaced_reference_formats_as_qualified_name() {
        let r = VerifierRef::namespaced(&VariantKey::new("advent2"), DEFAULT_CONTRACT_NAME);
        assert_eq!(r.to_string(), "contracts/advent2.json:Verifier");
    }

    #[test]
    fn auto_mode_goes_bare_only_for_single_verifier_builds() {
        let key = VariantKey::new("iszerowrong");
        assert_eq!(
            ResolutionMode::Auto.reference(1, &key, DEFAULT_CONTRACT_NAME),
            VerifierRef::Bare {
                name: DEFAULT_CONTRACT_NAME.into()
            }
        );
        assert_eq!(
            ResolutionMode::Auto.reference(6, &key, DEFAULT_CONTRACT_NAME),
            VerifierRef::namespaced(&key, DEFAULT_CONTRACT_NAME)
        );
        assert_eq!(
            ResolutionMode::Namespaced.reference(1, &key, DEFAULT_CONTRACT_NAME),
            VerifierRef::namespaced(&key, DEFAULT_CONTRACT_NAME)
        );
    }

    #[test]
    fn bare_name_resolves_only_when_unique() {
        let bare = VerifierRef::Bare {
            name: DEFAULT_CONTRACT_NAME.into(),
        };
        assert!(build(&["iszerowrong"]).resolve(&bare).is_ok());
        assert!(matches!(
            build(&["iszerowrong", "iszeroright"]).resolve(&bare),
            Err(HarnessError::ImplementationNotFound { .. })
        ));
        assert!(matches!(
            build(&[]).resolve(&bare),
            Err(HarnessError::ImplementationNotFound { .. })
        ));
    }

    #[test]
    fn ambiguity_reason_counts_only_matching_artifacts() {
        let mut b = build(&["iszerowrong", "iszeroright"]);
        let other = relative_path(&VariantKey::new("advent2"), ArtifactKind::VerificationKey);
        b.insert(&other, "Other", Arc::new(Fixed(true)));
        let bare = VerifierRef::Bare {
            name: DEFAULT_CONTRACT_NAME.into(),
        };
        match b.resolve(&bare) {
            Err(HarnessError::ImplementationNotFound { reason, .. }) => {
                assert!(reason.contains("across 2 artifacts"), "{reason}")
            }
            other => panic!("expected ambiguity, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unknown_namespaced_reference_is_not_found() {
        let r = VerifierRef::namespaced(&VariantKey::new("advent2"), DEFAULT_CONTRACT_NAME);
        let err = build(&["multiplier2"]).resolve(&r).err().unwrap();
        assert_eq!(err.kind(), "IMPLEMENTATION_NOT_FOUND");
    }
}
