//! Client state of a solo machine client

use std::fmt;

use ibc_proto::{google::protobuf::Any, ibc::core::client::v1::Height};
use prost::Message;

use crate::{
    consensus_state::ConsensusState,
    error::SoloMachineError,
    proto::{self, CLIENT_STATE_TYPE_URL},
};

/// The solo machine client: the sequence the next proof must be signed at, whether the
/// client has been frozen and the trusted consensus state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    sequence: u64,
    is_frozen: bool,
    consensus_state: ConsensusState,
}

/// Status of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Proofs are accepted
    Active,
    /// Misbehaviour was proven, nothing is accepted anymore
    Frozen,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Frozen => f.write_str("Frozen"),
        }
    }
}

impl ClientState {
    /// Creates an active client at `sequence`.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidSequence`] if the sequence is zero.
    pub fn new(sequence: u64, consensus_state: ConsensusState) -> Result<Self, SoloMachineError> {
        if sequence == 0 {
            return Err(SoloMachineError::InvalidSequence);
        }

        Ok(Self {
            sequence,
            is_frozen: false,
            consensus_state,
        })
    }

    /// Sequence the next proof has to be signed at
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether misbehaviour has been proven against the client
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.is_frozen
    }

    /// The trusted consensus state
    #[must_use]
    pub const fn consensus_state(&self) -> &ConsensusState {
        &self.consensus_state
    }

    /// Solo machines have no revisions, the sequence is the height.
    #[must_use]
    pub const fn latest_height(&self) -> Height {
        Height {
            revision_number: 0,
            revision_height: self.sequence,
        }
    }

    /// Current status of the client.
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.is_frozen {
            Status::Frozen
        } else {
            Status::Active
        }
    }

    /// Timestamp of the consensus state at `height`.
    /// # Errors
    /// Returns [`SoloMachineError::ConsensusStateNotFound`] for any height other than the
    /// latest one.
    pub fn timestamp_at_height(&self, height: &Height) -> Result<u64, SoloMachineError> {
        if height.revision_number != 0 || height.revision_height != self.sequence {
            return Err(SoloMachineError::ConsensusStateNotFound {
                revision_number: height.revision_number,
                revision_height: height.revision_height,
            });
        }

        Ok(self.consensus_state.timestamp())
    }

    pub(crate) fn advance_sequence(&mut self) -> Result<(), SoloMachineError> {
        self.sequence = self
            .sequence
            .checked_add(1)
            .ok_or(SoloMachineError::SequenceOverflow)?;
        Ok(())
    }

    pub(crate) fn freeze(&mut self) {
        self.is_frozen = true;
    }

    /// Decodes a client state from its `Any` encoding.
    /// # Errors
    /// Returns [`SoloMachineError::ClientStateDecodeFailure`] if the `Any` is of another
    /// type or malformed, otherwise the validation errors of the contained states.
    pub fn from_any(any: &Any) -> Result<Self, SoloMachineError> {
        if any.type_url != CLIENT_STATE_TYPE_URL {
            return Err(SoloMachineError::ClientStateDecodeFailure {
                reason: format!("unexpected client state type {}", any.type_url),
            });
        }

        proto::ClientState::decode(any.value.as_slice())
            .map_err(|e| SoloMachineError::ClientStateDecodeFailure {
                reason: e.to_string(),
            })?
            .try_into()
    }

    /// Encodes the client state as an `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        Any {
            type_url: CLIENT_STATE_TYPE_URL.to_string(),
            value: proto::ClientState::from(self).encode_to_vec(),
        }
    }
}

impl TryFrom<proto::ClientState> for ClientState {
    type Error = SoloMachineError;

    fn try_from(raw: proto::ClientState) -> Result<Self, Self::Error> {
        let consensus_state: ConsensusState = raw
            .consensus_state
            .ok_or_else(|| SoloMachineError::InvalidConsensusState {
                reason: "consensus state cannot be empty".to_string(),
            })?
            .try_into()?;

        let mut client_state = Self::new(raw.sequence, consensus_state)?;
        client_state.is_frozen = raw.is_frozen;
        Ok(client_state)
    }
}

impl From<&ClientState> for proto::ClientState {
    fn from(client_state: &ClientState) -> Self {
        Self {
            sequence: client_state.sequence,
            is_frozen: client_state.is_frozen,
            consensus_state: Some((&client_state.consensus_state).into()),
        }
    }
}
