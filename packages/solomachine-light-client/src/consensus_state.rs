//! The trusted key material of a solo machine

use ibc_proto::google::protobuf::Any;
use prost::Message;

use crate::{
    error::SoloMachineError,
    proto::{self, CONSENSUS_STATE_TYPE_URL},
    public_key::PublicKey,
};

/// Current key, diversifier and the last timestamp the client has accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusState {
    public_key: PublicKey,
    diversifier: String,
    timestamp: u64,
}

impl ConsensusState {
    /// Creates a validated consensus state.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidTimestamp`] for a zero timestamp,
    /// [`SoloMachineError::InvalidDiversifier`] for an empty or blank diversifier and
    /// [`SoloMachineError::InvalidPublicKey`] for an unusable multisig descriptor.
    pub fn new(
        public_key: PublicKey,
        diversifier: impl Into<String>,
        timestamp: u64,
    ) -> Result<Self, SoloMachineError> {
        let diversifier = diversifier.into();

        if timestamp == 0 {
            return Err(SoloMachineError::InvalidTimestamp);
        }
        if diversifier.trim().is_empty() {
            return Err(SoloMachineError::InvalidDiversifier);
        }
        public_key.validate()?;

        Ok(Self {
            public_key,
            diversifier,
            timestamp,
        })
    }

    /// The key proofs must be signed with
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Domain separator mixed into every signed message
    #[must_use]
    pub fn diversifier(&self) -> &str {
        &self.diversifier
    }

    /// Proofs older than this timestamp are rejected
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Decodes a consensus state from its `Any` encoding.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidConsensusState`] if the `Any` is of another type or
    /// malformed, otherwise the validation errors of [`ConsensusState::new`].
    pub fn from_any(any: &Any) -> Result<Self, SoloMachineError> {
        if any.type_url != CONSENSUS_STATE_TYPE_URL {
            return Err(SoloMachineError::InvalidConsensusState {
                reason: format!("unexpected consensus state type {}", any.type_url),
            });
        }

        proto::ConsensusState::decode(any.value.as_slice())
            .map_err(|e| SoloMachineError::InvalidConsensusState {
                reason: e.to_string(),
            })?
            .try_into()
    }

    /// Encodes the consensus state as an `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        Any {
            type_url: CONSENSUS_STATE_TYPE_URL.to_string(),
            value: proto::ConsensusState::from(self).encode_to_vec(),
        }
    }
}

impl TryFrom<proto::ConsensusState> for ConsensusState {
    type Error = SoloMachineError;

    fn try_from(raw: proto::ConsensusState) -> Result<Self, Self::Error> {
        let public_key = raw
            .public_key
            .as_ref()
            .ok_or_else(|| SoloMachineError::InvalidPublicKey {
                reason: "public key cannot be empty".to_string(),
            })
            .and_then(PublicKey::from_any)?;

        Self::new(public_key, raw.diversifier, raw.timestamp)
    }
}

impl From<&ConsensusState> for proto::ConsensusState {
    fn from(consensus_state: &ConsensusState) -> Self {
        Self {
            public_key: Some(consensus_state.public_key.to_any()),
            diversifier: consensus_state.diversifier.clone(),
            timestamp: consensus_state.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{ed25519_public_key, secp256k1_public_key};

    #[test]
    fn any_encoding_preserves_state() {
        let public_key =
            PublicKey::multisig(1, vec![ed25519_public_key(1), secp256k1_public_key(2)]).unwrap();
        let consensus_state = ConsensusState::new(public_key, "testing", 10).unwrap();

        let decoded = ConsensusState::from_any(&consensus_state.to_any()).unwrap();
        assert_eq!(decoded, consensus_state);
    }

    #[test]
    fn rejects_zero_timestamp() {
        let res = ConsensusState::new(secp256k1_public_key(1).into(), "testing", 0);
        assert_eq!(res, Err(SoloMachineError::InvalidTimestamp));
    }

    #[rstest]
    #[case::empty("")]
    #[case::spaces("   ")]
    #[case::tabs("\t\n")]
    fn rejects_blank_diversifier(#[case] diversifier: &str) {
        let res = ConsensusState::new(secp256k1_public_key(1).into(), diversifier, 10);
        assert_eq!(res, Err(SoloMachineError::InvalidDiversifier));
    }

    #[test]
    fn rejects_missing_public_key() {
        let raw = proto::ConsensusState {
            public_key: None,
            diversifier: "testing".to_string(),
            timestamp: 10,
        };
        assert!(matches!(
            ConsensusState::try_from(raw),
            Err(SoloMachineError::InvalidPublicKey { .. })
        ));
    }

    #[test]
    fn rejects_foreign_type_url() {
        let mut any = ConsensusState::new(secp256k1_public_key(1).into(), "testing", 10)
            .unwrap()
            .to_any();
        any.type_url = "/ibc.lightclients.tendermint.v1.ConsensusState".to_string();

        assert!(matches!(
            ConsensusState::from_any(&any),
            Err(SoloMachineError::InvalidConsensusState { .. })
        ));
    }
}
