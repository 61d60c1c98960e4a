use serde::Serialize;
use sha2::{Digest, Sha256};

/// Contract id rendered into the copy of a source that gets fingerprinted.
pub const CANONICAL_CONTRACT_ID: &str = "contract";

/// A rendered contract source ready to be written to a scratch directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub contract_id: String,
    pub source: String,
    /// Lowercase hex SHA-256 of the source as rendered under [`CANONICAL_CONTRACT_ID`].
    /// Equal selections share it whatever their contract id.
    pub fingerprint: String,
}

impl GeneratedArtifact {
    /// Fingerprints `source` itself, for sources that do not embed their contract id.
    #[must_use]
    pub fn new(contract_id: impl Into<String>, source: String) -> Self {
        let fingerprint = fingerprint(&source);
        Self { contract_id: contract_id.into(), source, fingerprint }
    }

    /// `canonical` is the same document rendered with [`CANONICAL_CONTRACT_ID`].
    #[must_use]
    pub fn with_canonical(contract_id: impl Into<String>, source: String, canonical: &str) -> Self {
        Self { contract_id: contract_id.into(), source, fingerprint: fingerprint(canonical) }
    }

    /// `contract_<id>.py`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("contract_{}.py", self.contract_id)
    }
}

fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
