//! Read-only access to the per-variant proof material of a circom/snarkjs
//! build. Every path is derived by [`relative_path`].

use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::error::{HarnessError, Result};

pub const INPUTS_DIR: &str = "inputs";
pub const PROOFS_DIR: &str = "proofs";
pub const CONTRACTS_DIR: &str = "contracts";

/// Circuit variant name, e.g. `multiplier2`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantKey(String);

impl VariantKey {
    pub fn new(name: impl Into<String>) -> Self {
        VariantKey(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantKey {
    fn from(name: &str) -> Self {
        VariantKey::new(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Witness inputs. Logged, never asserted.
    Inputs,
    /// Public outputs/inputs as decimal strings. Logged, never asserted.
    PublicSignals,
    /// Positional verifier-call tuple. Authoritative.
    CallArgs,
    /// snarkjs verification key the verifier contract is built from.
    VerificationKey,
}

/// `/`-separated path of one artifact, relative to the store root.
pub fn relative_path(key: &VariantKey, kind: ArtifactKind) -> String {
    let v = key.as_str();
    match kind {
        ArtifactKind::Inputs => format!("{INPUTS_DIR}/{v}.json"),
        ArtifactKind::PublicSignals => format!("{PROOFS_DIR}/{v}/public.json"),
        ArtifactKind::CallArgs => format!("{PROOFS_DIR}/{v}/solidity-args.json"),
        ArtifactKind::VerificationKey => format!("{CONTRACTS_DIR}/{v}.json"),
    }
}

/// Verifier-call arguments in on-disk order and encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct CallArgs(Vec<Value>);

impl CallArgs {
    pub fn new(values: Vec<Value>) -> Self {
        CallArgs(values)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inputs and public signals of one proof, for the diagnostic line only.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicIo {
    pub inputs: Value,
    pub outputs: Value,
}

impl fmt::Display for PublicIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inputs: {} Output: {}", self.inputs, self.outputs)
    }
}

#[derive(Clone, Debug)]
pub struct LoadedArtifact {
    pub call_args: CallArgs,
    pub public_io: Option<PublicIo>,
}

#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, key: &VariantKey, kind: ArtifactKind) -> PathBuf {
        self.root.join(relative_path(key, kind))
    }

    pub async fn call_args(&self, key: &VariantKey) -> Result<CallArgs> {
        self.read_json(key, ArtifactKind::CallArgs).await.map(CallArgs)
    }

    pub async fn public_io(&self, key: &VariantKey) -> Result<PublicIo> {
        Ok(PublicIo {
            inputs: self.read_json(key, ArtifactKind::Inputs).await?,
            outputs: self.read_json(key, ArtifactKind::PublicSignals).await?,
        })
    }

    /// Call arguments, plus the logged public-IO record when `diagnostics`
    /// is set.
    pub async fn load(&self, key: &VariantKey, diagnostics: bool) -> Result<LoadedArtifact> {
        let public_io = if diagnostics {
            let io = self.public_io(key).await?;
            info!(variant = %key, "{io}");
            Some(io)
        } else {
            None
        };
        Ok(LoadedArtifact {
            call_args: self.call_args(key).await?,
            public_io,
        })
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &VariantKey, kind: ArtifactKind) -> Result<T> {
        let path = self.path(key, kind);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(HarnessError::ArtifactNotFound {
                    variant: key.to_string(),
                    path,
                })
            }
            Err(source) => return Err(HarnessError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| HarnessError::ArtifactDecode { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn layout_follows_the_build_tree() {
        let key = VariantKey::new("iszeroevil");
        assert_eq!(relative_path(&key, ArtifactKind::Inputs), "inputs/iszeroevil.json");
        assert_eq!(
            relative_path(&key, ArtifactKind::PublicSignals),
            "proofs/iszeroevil/public.json"
        );
        assert_eq!(
            relative_path(&key, ArtifactKind::CallArgs),
            "proofs/iszeroevil/solidity-args.json"
        );
        assert_eq!(
            relative_path(&key, ArtifactKind::VerificationKey),
            "contracts/iszeroevil.json"
        );
    }

    #[test]
    fn diagnostic_line_shape() {
        let io = PublicIo {
            inputs: json!({ "a": "3", "b": "11" }),
            outputs: json!(["33"]),
        };
        assert_eq!(io.to_string(), r#"Inputs: {"a":"3","b":"11"} Output: ["33"]"#);
    }
}
