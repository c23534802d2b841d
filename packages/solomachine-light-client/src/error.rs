//! Error types for the solo machine light client

use thiserror::Error;

/// Main error type for solo machine client operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SoloMachineError {
    /// The client sequence must be at least one
    #[error("sequence cannot be 0")]
    InvalidSequence,

    /// The sequence cannot be advanced any further
    #[error("sequence overflow")]
    SequenceOverflow,

    /// Consensus state timestamp must be strictly positive
    #[error("timestamp cannot be 0")]
    InvalidTimestamp,

    /// Diversifier is empty or only whitespace
    #[error("diversifier cannot contain only spaces")]
    InvalidDiversifier,

    /// Public key is missing or cannot be decoded
    #[error("invalid public key: {reason}")]
    InvalidPublicKey {
        /// Reason for error
        reason: String,
    },

    /// Consensus state is absent, of a foreign type, or not the expected one
    #[error("invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Reason for error
        reason: String,
    },

    /// Membership proof bytes cannot be decoded
    #[error("failed to decode proof: {reason}")]
    ProofDecodeFailure {
        /// Reason for error
        reason: String,
    },

    /// Merkle path bytes cannot be decoded
    #[error("failed to decode merkle path: {reason}")]
    PathDecodeFailure {
        /// Reason for error
        reason: String,
    },

    /// Proof carries no signature data
    #[error("signature data cannot be empty")]
    MissingSignature,

    /// Signature check over the reconstructed sign bytes failed
    #[error("failed to verify proof: {0}")]
    ProofVerificationFailed(#[source] SignatureError),

    /// Proof is older than the trusted consensus timestamp
    #[error(
        "consensus state timestamp is greater than signature timestamp ({consensus_timestamp} > {proof_timestamp})"
    )]
    TimestampTooOld {
        /// Trusted consensus state timestamp
        consensus_timestamp: u64,
        /// Timestamp carried by the proof
        proof_timestamp: u64,
    },

    /// Solo machine heights always have revision number zero
    #[error("revision must be 0 for solomachine, got revision-number: {revision_number}")]
    InvalidHeight {
        /// Offending revision number
        revision_number: u64,
    },

    /// Only the latest height has a consensus state
    #[error("consensus state not found for height {revision_number}-{revision_height}")]
    ConsensusStateNotFound {
        /// Requested revision number
        revision_number: u64,
        /// Requested revision height
        revision_height: u64,
    },

    /// Misbehaviour evidence is malformed
    #[error("invalid misbehaviour: {reason}")]
    InvalidMisbehaviour {
        /// Reason for error
        reason: String,
    },

    /// Client is frozen
    #[error("client is frozen")]
    ClientFrozen,

    /// A client state is already stored
    #[error("client is already initialized")]
    ClientAlreadyInitialized,

    /// No client state in the store
    #[error("client state not found")]
    ClientStateNotFound,

    /// Stored client state cannot be decoded
    #[error("failed to decode client state: {reason}")]
    ClientStateDecodeFailure {
        /// Reason for error
        reason: String,
    },
}

/// Errors raised by the signature verification capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SignatureError {
    /// The signature does not verify under the public key
    #[error("signature verification failed")]
    InvalidSignature,

    /// Fewer valid signatures than the multisig threshold
    #[error("insufficient signatures: {valid} valid, threshold is {threshold}")]
    InsufficientSignatures {
        /// Distinct key indices with a valid signature
        valid: usize,
        /// Required number of signatures
        threshold: u32,
    },

    /// Single signature supplied for a multisig key, or the other way round
    #[error("signature data does not match public key type: expected {expected}")]
    SignatureShapeMismatch {
        /// Signature shape the public key requires
        expected: &'static str,
    },
}
