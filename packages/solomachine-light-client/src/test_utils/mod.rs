//! Test utilities for the solo machine light client

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(
    missing_docs,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use ed25519_dalek::Signer as _;
    use prost::Message;

    use crate::{
        client_state::ClientState,
        consensus_state::ConsensusState,
        misbehaviour::{Misbehaviour, SignatureAndData},
        path::{merkle_path_string, IbcPath, DEFAULT_COMMITMENT_PREFIX},
        proto::{
            signature_descriptor_data::Sum, MultiSignature, SignatureDescriptorData,
            SingleSignature, TimestampedSignatureData, SIGN_MODE_DIRECT,
        },
        public_key::{PublicKey, SinglePublicKey},
        sign_bytes,
        signature::new_bit_array,
    };

    pub const MESSAGE: &[u8] = b"solo machine test message";

    /// A signing key derived from a fixed seed, the seed must not be zero
    #[derive(Debug, Clone)]
    pub enum TestSigner {
        Secp256k1(k256::ecdsa::SigningKey),
        Ed25519(ed25519_dalek::SigningKey),
    }

    impl TestSigner {
        pub fn secp256k1(seed: u8) -> Self {
            Self::Secp256k1(
                k256::ecdsa::SigningKey::from_bytes(&[seed; 32].into())
                    .expect("valid secp256k1 seed"),
            )
        }

        pub fn ed25519(seed: u8) -> Self {
            Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[seed; 32]))
        }

        pub fn public_key(&self) -> SinglePublicKey {
            match self {
                Self::Secp256k1(key) => SinglePublicKey::Secp256k1(*key.verifying_key()),
                Self::Ed25519(key) => SinglePublicKey::Ed25519(key.verifying_key()),
            }
        }

        /// Raw signature bytes over `message`
        pub fn sign(&self, message: &[u8]) -> Vec<u8> {
            match self {
                Self::Secp256k1(key) => {
                    let signature: k256::ecdsa::Signature = key.sign(message);
                    signature.to_bytes().to_vec()
                }
                Self::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
            }
        }

        /// Encoded single signer `SignatureDescriptor.Data` over `message`
        pub fn signature_data(&self, message: &[u8]) -> Vec<u8> {
            single_signature(self.sign(message)).encode_to_vec()
        }
    }

    pub fn secp256k1_public_key(seed: u8) -> SinglePublicKey {
        TestSigner::secp256k1(seed).public_key()
    }

    pub fn ed25519_public_key(seed: u8) -> SinglePublicKey {
        TestSigner::ed25519(seed).public_key()
    }

    /// The counterparty side of a solo machine client: holds the keys and signs claims at
    /// its current sequence and time.
    #[derive(Debug, Clone)]
    pub struct SoloMachine {
        pub signers: Vec<TestSigner>,
        /// `Some` for a multisig solo machine
        pub threshold: Option<u32>,
        /// Indices of the multisig members that sign
        pub active_signers: Vec<usize>,
        pub diversifier: String,
        pub time: u64,
        pub sequence: u64,
    }

    impl SoloMachine {
        pub fn new(seed: u8) -> Self {
            Self::with_single_signer(TestSigner::secp256k1(seed))
        }

        pub fn new_ed25519(seed: u8) -> Self {
            Self::with_single_signer(TestSigner::ed25519(seed))
        }

        /// A `threshold`-of-`num_keys` secp256k1 multisig, the first `threshold` members sign.
        pub fn new_multisig(threshold: u32, num_keys: u8) -> Self {
            Self {
                signers: (1..=num_keys).map(TestSigner::secp256k1).collect(),
                threshold: Some(threshold),
                active_signers: (0..usize::try_from(threshold).expect("threshold fits usize"))
                    .collect(),
                ..Self::new(1)
            }
        }

        fn with_single_signer(signer: TestSigner) -> Self {
            Self {
                signers: vec![signer],
                threshold: None,
                active_signers: vec![0],
                diversifier: "testing".to_string(),
                time: 10,
                sequence: 1,
            }
        }

        pub fn with_sequence(mut self, sequence: u64) -> Self {
            self.sequence = sequence;
            self
        }

        pub fn with_time(mut self, time: u64) -> Self {
            self.time = time;
            self
        }

        pub fn with_diversifier(mut self, diversifier: impl Into<String>) -> Self {
            self.diversifier = diversifier.into();
            self
        }

        pub fn with_signers(mut self, active_signers: Vec<usize>) -> Self {
            self.active_signers = active_signers;
            self
        }

        pub fn public_key(&self) -> PublicKey {
            match self.threshold {
                None => self.signers[0].public_key().into(),
                Some(threshold) => PublicKey::Multisig {
                    threshold,
                    public_keys: self.signers.iter().map(TestSigner::public_key).collect(),
                },
            }
        }

        pub fn consensus_state(&self) -> ConsensusState {
            ConsensusState::new(self.public_key(), self.diversifier.clone(), self.time)
                .expect("valid consensus state")
        }

        pub fn client_state(&self) -> ClientState {
            ClientState::new(self.sequence, self.consensus_state()).expect("valid client state")
        }

        /// Encoded `SignatureDescriptor.Data` over `message` by the active signers
        pub fn sign(&self, message: &[u8]) -> Vec<u8> {
            if self.threshold.is_none() {
                return self.signers[0].signature_data(message);
            }

            let mut indices = self.active_signers.clone();
            indices.sort_unstable();
            indices.dedup();

            SignatureDescriptorData {
                sum: Some(Sum::Multi(MultiSignature {
                    bitarray: Some(new_bit_array(self.signers.len(), &indices)),
                    signatures: indices
                        .iter()
                        .map(|&index| single_signature(self.signers[index].sign(message)))
                        .collect(),
                })),
            }
            .encode_to_vec()
        }

        /// Encoded `TimestampedSignatureData` over an arbitrary claim
        pub fn proof(&self, sequence: u64, timestamp: u64, path: &[u8], data: &[u8]) -> Vec<u8> {
            let sign_bytes = sign_bytes::encode(sequence, timestamp, &self.diversifier, path, data);

            TimestampedSignatureData {
                signature_data: self.sign(&sign_bytes),
                timestamp,
            }
            .encode_to_vec()
        }

        /// Proof that `data` is stored at `path`, signed at the current sequence and time
        pub fn membership_proof(&self, path: &IbcPath, data: &[u8]) -> Vec<u8> {
            let path = merkle_path_string(&path.merkle_path(DEFAULT_COMMITMENT_PREFIX));
            self.proof(self.sequence, self.time, path.as_bytes(), data)
        }

        pub fn signature_and_data(&self, path: &[u8], data: &[u8]) -> SignatureAndData {
            let sign_bytes =
                sign_bytes::encode(self.sequence, self.time, &self.diversifier, path, data);

            SignatureAndData {
                signature: self.sign(&sign_bytes),
                path: path.to_vec(),
                data: data.to_vec(),
                timestamp: self.time,
            }
        }

        /// Two `(path, data)` claims signed at the current sequence
        pub fn misbehaviour(&self, one: (&[u8], &[u8]), two: (&[u8], &[u8])) -> Misbehaviour {
            Misbehaviour {
                sequence: self.sequence,
                signature_one: self.signature_and_data(one.0, one.1),
                signature_two: self.signature_and_data(two.0, two.1),
            }
        }
    }

    fn single_signature(signature: Vec<u8>) -> SignatureDescriptorData {
        SignatureDescriptorData {
            sum: Some(Sum::Single(SingleSignature {
                mode: SIGN_MODE_DIRECT,
                signature,
            })),
        }
    }
}
