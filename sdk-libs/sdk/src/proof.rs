use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{DelegationSdkError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

impl Default for CompressedProof {
    fn default() -> Self {
        Self {
            a: [0; 32],
            b: [0; 64],
            c: [0; 32],
        }
    }
}

impl CompressedProof {
    /// Builds a proof from the variable length byte vectors returned by the
    /// indexer.
    pub fn try_from_slices(a: &[u8], b: &[u8], c: &[u8]) -> Result<Self> {
        Ok(Self {
            a: a.try_into()
                .map_err(|_| DelegationSdkError::InvalidProofLength("a", a.len()))?,
            b: b.try_into()
                .map_err(|_| DelegationSdkError::InvalidProofLength("b", b.len()))?,
            c: c.try_into()
                .map_err(|_| DelegationSdkError::InvalidProofLength("c", c.len()))?,
        })
    }
}

/// Zero-knowledge proof attached to an instruction.
///
/// `None` is used when every input account is proven by index, in that
/// case the receiving program does not verify a proof.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct ValidityProof(pub Option<CompressedProof>);

impl ValidityProof {
    pub fn new(proof: Option<CompressedProof>) -> Self {
        Self(proof)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.try_to_vec().map_err(|_| DelegationSdkError::Borsh)
    }
}

impl From<CompressedProof> for ValidityProof {
    fn from(proof: CompressedProof) -> Self {
        Self(Some(proof))
    }
}

impl From<Option<CompressedProof>> for ValidityProof {
    fn from(proof: Option<CompressedProof>) -> Self {
        Self(proof)
    }
}
