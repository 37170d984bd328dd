//! Loading of compiled contract artifacts
//!
//! Both the Truffle layout (`"bytecode": "0x..."`) and the Foundry layout
//! (`"bytecode": { "object": "0x..." }`) are accepted.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::{
    constants::{ARTIFACT_EXTENSION, LIBRARY_PLACEHOLDER_PREFIX},
    errors::ScriptError,
    types::GameContract,
};

/// The bytecode field of an artifact
#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// Truffle / Hardhat: a bare hex string
    Hex(String),
    /// Foundry: an object wrapping the hex string
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

impl BytecodeField {
    /// The hex string regardless of layout
    fn into_hex(self) -> String {
        match self {
            BytecodeField::Hex(s) | BytecodeField::Object { object: s } => s,
        }
    }
}

/// The fields of an artifact the scripts read
#[derive(Deserialize)]
struct RawArtifact {
    /// The creation bytecode
    bytecode: BytecodeField,
}

/// A compiled contract
#[derive(Clone, Debug)]
pub struct Artifact {
    /// The artifact name
    pub name: String,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact from its JSON contents
    pub fn from_json(name: &str, json: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;
        let hex_code = raw.bytecode.into_hex();

        if hex_code.contains(LIBRARY_PLACEHOLDER_PREFIX) {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: bytecode contains unlinked libraries"
            )));
        }

        let bytecode: Bytes = hex_code
            .parse()
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: empty bytecode, is this an interface or abstract contract?"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            bytecode,
        })
    }

    /// The creation code with ABI-encoded constructor arguments appended
    pub fn creation_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

/// A directory of compiled artifacts
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    /// The directory holding one JSON file per contract
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store reading from the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path of a named artifact
    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name).with_extension(ARTIFACT_EXTENSION)
    }

    /// Load the artifact of one of the game contracts
    pub fn load(&self, contract: GameContract) -> Result<Artifact, ScriptError> {
        self.load_named(contract.artifact_name())
    }

    /// Load an artifact by name
    pub fn load_named(&self, name: &str) -> Result<Artifact, ScriptError> {
        let path = self.path_of(name);
        let json = read_artifact(&path)?;
        Artifact::from_json(name, &json)
    }
}

/// Read an artifact file
fn read_artifact(path: &Path) -> Result<String, ScriptError> {
    fs::read_to_string(path).map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{Artifact, ArtifactStore};
    use crate::{errors::ScriptError, types::GameContract};

    #[test]
    fn test_truffle_layout() {
        let artifact =
            Artifact::from_json("Mint", r#"{ "abi": [], "bytecode": "0x6080604052" }"#).unwrap();
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_foundry_layout() {
        let artifact = Artifact::from_json(
            "Mint",
            r#"{ "abi": [], "bytecode": { "object": "0x6080", "linkReferences": {} } }"#,
        )
        .unwrap();
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80]);
    }

    #[test]
    fn test_rejects_empty_bytecode() {
        assert!(matches!(
            Artifact::from_json("IKitchen", r#"{ "bytecode": "0x" }"#),
            Err(ScriptError::ArtifactParsing(_))
        ));
    }

    #[test]
    fn test_rejects_unlinked_libraries() {
        let json = r#"{ "bytecode": "0x6080__$3f2a1b$__6040" }"#;
        let err = Artifact::from_json("Character", json).unwrap_err();
        assert!(err.to_string().contains("unlinked"));
    }

    #[test]
    fn test_creation_code_appends_args() {
        let artifact = Artifact::from_json("Gym", r#"{ "bytecode": "0x60" }"#).unwrap();
        assert_eq!(artifact.creation_code(&[1, 2]).to_vec(), vec![0x60, 1, 2]);
    }

    #[test]
    fn test_store_reads_by_artifact_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("VRFCoordinatorMock.json"),
            r#"{ "bytecode": "0x6001" }"#,
        )
        .unwrap();

        let store = ArtifactStore::new(dir.path());
        let artifact = store.load(GameContract::VrfCoordinatorMock).unwrap();
        assert_eq!(artifact.name, "VRFCoordinatorMock");
        assert!(matches!(
            store.load(GameContract::Gym),
            Err(ScriptError::ReadFile(_))
        ));
    }
}
