//! Protobuf wire messages of the solo machine client.
//!
//! Field numbering follows `ibc.lightclients.solomachine.v3`, `ibc.core.commitment.v1`
//! and the cosmos-sdk crypto and signing packages so that encoded states, proofs and
//! sign bytes interoperate with deployed counterparties.
#![allow(clippy::doc_markdown)]

use ibc_proto::google::protobuf::Any;

/// Type URL of [`ClientState`]
pub const CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.solomachine.v3.ClientState";
/// Type URL of [`ConsensusState`]
pub const CONSENSUS_STATE_TYPE_URL: &str = "/ibc.lightclients.solomachine.v3.ConsensusState";
/// Type URL of [`Misbehaviour`]
pub const MISBEHAVIOUR_TYPE_URL: &str = "/ibc.lightclients.solomachine.v3.Misbehaviour";
/// Type URL of a secp256k1 [`PubKey`]
pub const SECP256K1_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
/// Type URL of an ed25519 [`PubKey`]
pub const ED25519_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";
/// Type URL of a [`LegacyAminoPubKey`]
pub const MULTISIG_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.multisig.LegacyAminoPubKey";

/// `SIGN_MODE_DIRECT` of `cosmos.tx.signing.v1beta1.SignMode`
pub const SIGN_MODE_DIRECT: i32 = 1;

/// ClientState defines a solo machine client that tracks the current consensus
/// state and if the client is frozen.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientState {
    /// latest sequence of the client state
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    /// frozen sequence of the solo machine
    #[prost(bool, tag = "2")]
    pub is_frozen: bool,
    /// current consensus state
    #[prost(message, optional, tag = "3")]
    pub consensus_state: ::core::option::Option<ConsensusState>,
}

/// ConsensusState defines a solo machine consensus state.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusState {
    /// public key of the solo machine
    #[prost(message, optional, tag = "1")]
    pub public_key: ::core::option::Option<Any>,
    /// diversifier allows the same public key to be re-used across different solo
    /// machine clients (potentially on different chains) without being considered
    /// misbehaviour.
    #[prost(string, tag = "2")]
    pub diversifier: ::prost::alloc::string::String,
    /// timestamp of the consensus state
    #[prost(uint64, tag = "3")]
    pub timestamp: u64,
}

/// Misbehaviour defines misbehaviour for a solo machine which consists
/// of a sequence and two signatures over different messages at that sequence.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Misbehaviour {
    /// sequence both signatures were produced at
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    /// first signature
    #[prost(message, optional, tag = "2")]
    pub signature_one: ::core::option::Option<SignatureAndData>,
    /// second signature
    #[prost(message, optional, tag = "3")]
    pub signature_two: ::core::option::Option<SignatureAndData>,
}

/// SignatureAndData contains a signature and the data signed over to create that
/// signature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureAndData {
    /// encoded signature data
    #[prost(bytes = "vec", tag = "1")]
    pub signature: ::prost::alloc::vec::Vec<u8>,
    /// signed path
    #[prost(bytes = "vec", tag = "2")]
    pub path: ::prost::alloc::vec::Vec<u8>,
    /// signed data
    #[prost(bytes = "vec", tag = "3")]
    pub data: ::prost::alloc::vec::Vec<u8>,
    /// signed timestamp
    #[prost(uint64, tag = "4")]
    pub timestamp: u64,
}

/// TimestampedSignatureData contains the signature data and the timestamp of the
/// signature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TimestampedSignatureData {
    /// encoded signature data
    #[prost(bytes = "vec", tag = "1")]
    pub signature_data: ::prost::alloc::vec::Vec<u8>,
    /// signed timestamp
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
}

/// SignBytes defines the signed bytes used for signature verification.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignBytes {
    /// the sequence number
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    /// the proof timestamp
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
    /// the public key diversifier
    #[prost(string, tag = "3")]
    pub diversifier: ::prost::alloc::string::String,
    /// the standardised path bytes
    #[prost(bytes = "vec", tag = "4")]
    pub path: ::prost::alloc::vec::Vec<u8>,
    /// the marshaled data bytes
    #[prost(bytes = "vec", tag = "5")]
    pub data: ::prost::alloc::vec::Vec<u8>,
}

/// MerklePath is the path used to verify commitment proofs, which can be an
/// arbitrary structured object (defined by a commitment type).
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MerklePath {
    /// path segments, starting with the commitment prefix
    #[prost(string, repeated, tag = "1")]
    pub key_path: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// PubKey is the wire form of a single secp256k1 or ed25519 public key.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct PubKey {
    /// compressed SEC1 (secp256k1) or raw 32 byte (ed25519) key
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
}

/// LegacyAminoPubKey specifies a public key type which nests multiple public keys
/// and a threshold.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LegacyAminoPubKey {
    /// number of signatures required
    #[prost(uint32, tag = "1")]
    pub threshold: u32,
    /// member keys, ordered
    #[prost(message, repeated, tag = "2")]
    pub public_keys: ::prost::alloc::vec::Vec<Any>,
}

/// CompactBitArray is an implementation of a space efficient bit array.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CompactBitArray {
    /// number of bits used in the last byte, zero when the last byte is full
    #[prost(uint32, tag = "1")]
    pub extra_bits_stored: u32,
    /// packed bits, most significant bit first
    #[prost(bytes = "vec", tag = "2")]
    pub elems: ::prost::alloc::vec::Vec<u8>,
}

/// Data represents signature data (`cosmos.tx.signing.v1beta1.SignatureDescriptor.Data`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureDescriptorData {
    /// sum is the oneof that specifies whether this represents single or multi-signature data
    #[prost(oneof = "signature_descriptor_data::Sum", tags = "1, 2")]
    pub sum: ::core::option::Option<signature_descriptor_data::Sum>,
}

/// Nested message and enum types in `SignatureDescriptorData`.
pub mod signature_descriptor_data {
    /// sum is the oneof that specifies whether this represents single or multi-signature data
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Sum {
        /// single represents a single signer
        #[prost(message, tag = "1")]
        Single(super::SingleSignature),
        /// multi represents a multisig signer
        #[prost(message, tag = "2")]
        Multi(super::MultiSignature),
    }
}

/// Single is the signature data for a single signer.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SingleSignature {
    /// sign mode of the signature
    #[prost(int32, tag = "1")]
    pub mode: i32,
    /// raw signature bytes
    #[prost(bytes = "vec", tag = "2")]
    pub signature: ::prost::alloc::vec::Vec<u8>,
}

/// Multi is the signature data for a multisig public key.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiSignature {
    /// bitarray specifies which keys within the multisig are signing
    #[prost(message, optional, tag = "1")]
    pub bitarray: ::core::option::Option<CompactBitArray>,
    /// signatures is the signatures of the multi-signature
    #[prost(message, repeated, tag = "2")]
    pub signatures: ::prost::alloc::vec::Vec<SignatureDescriptorData>,
}
