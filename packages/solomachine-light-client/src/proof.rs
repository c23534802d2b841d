//! Membership proofs: signature data together with the time it was produced

use prost::Message;

use crate::{error::SoloMachineError, proto::TimestampedSignatureData, signature::SignatureData};

/// A decoded membership or non-membership proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedSignature {
    /// Signature over the sign bytes of the claim
    pub signature_data: SignatureData,
    /// Timestamp the solo machine signed at
    pub timestamp: u64,
}

impl TimestampedSignature {
    /// Decodes protobuf `TimestampedSignatureData` proof bytes.
    /// # Errors
    /// Returns [`SoloMachineError::ProofDecodeFailure`] for malformed bytes and
    /// [`SoloMachineError::MissingSignature`] if the proof carries no signature data.
    pub fn decode(proof: &[u8]) -> Result<Self, SoloMachineError> {
        let raw = TimestampedSignatureData::decode(proof).map_err(|e| {
            SoloMachineError::ProofDecodeFailure {
                reason: e.to_string(),
            }
        })?;

        if raw.signature_data.is_empty() {
            return Err(SoloMachineError::MissingSignature);
        }

        Ok(Self {
            signature_data: SignatureData::decode(&raw.signature_data)?,
            timestamp: raw.timestamp,
        })
    }
}
