//! Canonical paths of the on-chain facts a solo machine can attest to

use std::fmt;

use prost::Message;

use crate::{error::SoloMachineError, proto::MerklePath};

/// The commitment prefix under which IBC stores its state
pub const DEFAULT_COMMITMENT_PREFIX: &str = "ibc";

/// A fact kind together with its identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IbcPath {
    /// Client state of a client tracked by the counterparty
    ClientState {
        /// Counterparty's client identifier
        client_id: String,
    },
    /// Consensus state of a client tracked by the counterparty
    ConsensusState {
        /// Counterparty's client identifier
        client_id: String,
        /// Revision number of the consensus height
        revision_number: u64,
        /// Revision height of the consensus height
        revision_height: u64,
    },
    /// Connection end
    Connection {
        /// Connection identifier
        connection_id: String,
    },
    /// Channel end
    ChannelEnd {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
    },
    /// Next sequence to receive on a channel
    NextSequenceRecv {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
    },
    /// Packet commitment
    PacketCommitment {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
        /// Packet sequence
        sequence: u64,
    },
    /// Packet acknowledgement
    PacketAcknowledgement {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
        /// Packet sequence
        sequence: u64,
    },
    /// Packet receipt
    PacketReceipt {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
        /// Packet sequence
        sequence: u64,
    },
}

impl fmt::Display for IbcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientState { client_id } => write!(f, "clients/{client_id}/clientState"),
            Self::ConsensusState {
                client_id,
                revision_number,
                revision_height,
            } => write!(
                f,
                "clients/{client_id}/consensusStates/{revision_number}-{revision_height}"
            ),
            Self::Connection { connection_id } => write!(f, "connections/{connection_id}"),
            Self::ChannelEnd {
                port_id,
                channel_id,
            } => write!(f, "channelEnds/ports/{port_id}/channels/{channel_id}"),
            Self::NextSequenceRecv {
                port_id,
                channel_id,
            } => write!(f, "nextSequenceRecv/ports/{port_id}/channels/{channel_id}"),
            Self::PacketCommitment {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "commitments/ports/{port_id}/channels/{channel_id}/sequences/{sequence}"
            ),
            Self::PacketAcknowledgement {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "acks/ports/{port_id}/channels/{channel_id}/sequences/{sequence}"
            ),
            Self::PacketReceipt {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "receipts/ports/{port_id}/channels/{channel_id}/sequences/{sequence}"
            ),
        }
    }
}

impl IbcPath {
    /// Applies the commitment `prefix` to the path.
    #[must_use]
    pub fn merkle_path(&self, prefix: &str) -> MerklePath {
        MerklePath {
            key_path: vec![prefix.to_string(), self.to_string()],
        }
    }

    /// The protobuf encoded merkle path, as passed to membership verification.
    #[must_use]
    pub fn to_bytes(&self, prefix: &str) -> Vec<u8> {
        self.merkle_path(prefix).encode_to_vec()
    }
}

/// Decodes protobuf merkle path bytes.
/// # Errors
/// Returns [`SoloMachineError::PathDecodeFailure`] if the bytes are malformed or the path
/// has no segments.
pub fn decode_merkle_path(bz: &[u8]) -> Result<MerklePath, SoloMachineError> {
    let merkle_path = MerklePath::decode(bz).map_err(|e| SoloMachineError::PathDecodeFailure {
        reason: e.to_string(),
    })?;

    if merkle_path.key_path.is_empty() {
        return Err(SoloMachineError::PathDecodeFailure {
            reason: "merkle path has no segments".to_string(),
        });
    }

    Ok(merkle_path)
}

/// The string form of a merkle path, the path bytes a solo machine signs over.
#[must_use]
pub fn merkle_path_string(merkle_path: &MerklePath) -> String {
    merkle_path
        .key_path
        .iter()
        .fold(String::new(), |acc, segment| acc + "/" + segment)
}
