//! Public key descriptors a solo machine signs with

use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use ibc_proto::google::protobuf::Any;
use k256::ecdsa::VerifyingKey as Secp256k1VerifyingKey;
use prost::Message;

use crate::{
    error::{SignatureError, SoloMachineError},
    proto::{
        LegacyAminoPubKey, PubKey, ED25519_PUB_KEY_TYPE_URL, MULTISIG_PUB_KEY_TYPE_URL,
        SECP256K1_PUB_KEY_TYPE_URL,
    },
};

/// A single verification key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinglePublicKey {
    /// secp256k1 ECDSA key, signatures are 64 byte `r || s` over the SHA-256 of the message
    Secp256k1(Secp256k1VerifyingKey),
    /// ed25519 key
    Ed25519(Ed25519VerifyingKey),
}

/// The key material of a solo machine: one key or an m-of-n multisig
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// A single signer
    Single(SinglePublicKey),
    /// A threshold multisig over an ordered set of keys
    Multisig {
        /// Number of distinct valid signatures required
        threshold: u32,
        /// Member keys, signatures refer to them by index
        public_keys: Vec<SinglePublicKey>,
    },
}

impl SinglePublicKey {
    /// Verifies `signature` over `message`.
    /// # Errors
    /// Returns [`SignatureError::InvalidSignature`] if the signature is malformed or does not verify.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
        match self {
            Self::Secp256k1(key) => {
                use k256::ecdsa::signature::Verifier;

                let signature = k256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| SignatureError::InvalidSignature)?;
                key.verify(message, &signature)
                    .map_err(|_| SignatureError::InvalidSignature)
            }
            Self::Ed25519(key) => {
                use ed25519_dalek::Verifier;

                let signature = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|_| SignatureError::InvalidSignature)?;
                key.verify(message, &signature)
                    .map_err(|_| SignatureError::InvalidSignature)
            }
        }
    }

    /// Decodes a single key from its cosmos-sdk `Any` encoding.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidPublicKey`] for unknown type URLs or invalid key bytes.
    pub fn from_any(any: &Any) -> Result<Self, SoloMachineError> {
        match any.type_url.as_str() {
            SECP256K1_PUB_KEY_TYPE_URL => {
                let raw = decode_pub_key(&any.value)?;
                Secp256k1VerifyingKey::from_sec1_bytes(&raw.key)
                    .map(Self::Secp256k1)
                    .map_err(|_| invalid_public_key("invalid secp256k1 key bytes"))
            }
            ED25519_PUB_KEY_TYPE_URL => {
                let raw = decode_pub_key(&any.value)?;
                let key_bytes: [u8; 32] = raw
                    .key
                    .as_slice()
                    .try_into()
                    .map_err(|_| invalid_public_key("ed25519 key must be 32 bytes"))?;
                Ed25519VerifyingKey::from_bytes(&key_bytes)
                    .map(Self::Ed25519)
                    .map_err(|_| invalid_public_key("invalid ed25519 key bytes"))
            }
            MULTISIG_PUB_KEY_TYPE_URL => Err(invalid_public_key(
                "nested multisig public keys are not supported",
            )),
            other => Err(invalid_public_key(&format!(
                "unsupported public key type {other}"
            ))),
        }
    }

    /// Encodes the key as a cosmos-sdk `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        let (type_url, key) = match self {
            Self::Secp256k1(key) => (
                SECP256K1_PUB_KEY_TYPE_URL,
                key.to_encoded_point(true).as_bytes().to_vec(),
            ),
            Self::Ed25519(key) => (ED25519_PUB_KEY_TYPE_URL, key.to_bytes().to_vec()),
        };

        Any {
            type_url: type_url.to_string(),
            value: PubKey { key }.encode_to_vec(),
        }
    }
}

impl PublicKey {
    /// Builds a multisig descriptor.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidPublicKey`] if there are no keys or the threshold is
    /// zero or larger than the number of keys.
    pub fn multisig(
        threshold: u32,
        public_keys: Vec<SinglePublicKey>,
    ) -> Result<Self, SoloMachineError> {
        let public_key = Self::Multisig {
            threshold,
            public_keys,
        };
        public_key.validate()?;
        Ok(public_key)
    }

    /// Checks the multisig threshold against its key set. Single keys are always valid.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidPublicKey`] for an unusable multisig descriptor.
    pub fn validate(&self) -> Result<(), SoloMachineError> {
        let Self::Multisig {
            threshold,
            public_keys,
        } = self
        else {
            return Ok(());
        };

        if public_keys.is_empty() {
            return Err(invalid_public_key("multisig must contain at least one key"));
        }
        let threshold_in_range = usize::try_from(*threshold).is_ok_and(|t| t <= public_keys.len());
        if *threshold == 0 || !threshold_in_range {
            return Err(invalid_public_key(&format!(
                "multisig threshold {threshold} out of range for {} keys",
                public_keys.len()
            )));
        }

        Ok(())
    }

    /// Decodes a key descriptor from its cosmos-sdk `Any` encoding.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidPublicKey`] if the key cannot be decoded or is invalid.
    pub fn from_any(any: &Any) -> Result<Self, SoloMachineError> {
        if any.type_url != MULTISIG_PUB_KEY_TYPE_URL {
            return SinglePublicKey::from_any(any).map(Self::Single);
        }

        let raw = LegacyAminoPubKey::decode(any.value.as_slice())
            .map_err(|e| invalid_public_key(&e.to_string()))?;
        let public_keys = raw
            .public_keys
            .iter()
            .map(SinglePublicKey::from_any)
            .collect::<Result<Vec<_>, _>>()?;

        Self::multisig(raw.threshold, public_keys)
    }

    /// Encodes the descriptor as a cosmos-sdk `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        match self {
            Self::Single(key) => key.to_any(),
            Self::Multisig {
                threshold,
                public_keys,
            } => Any {
                type_url: MULTISIG_PUB_KEY_TYPE_URL.to_string(),
                value: LegacyAminoPubKey {
                    threshold: *threshold,
                    public_keys: public_keys.iter().map(SinglePublicKey::to_any).collect(),
                }
                .encode_to_vec(),
            },
        }
    }
}

impl From<SinglePublicKey> for PublicKey {
    fn from(key: SinglePublicKey) -> Self {
        Self::Single(key)
    }
}

fn decode_pub_key(bz: &[u8]) -> Result<PubKey, SoloMachineError> {
    PubKey::decode(bz).map_err(|e| invalid_public_key(&e.to_string()))
}

fn invalid_public_key(reason: &str) -> SoloMachineError {
    SoloMachineError::InvalidPublicKey {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{ed25519_public_key, secp256k1_public_key};

    #[rstest]
    #[case::secp256k1(PublicKey::Single(secp256k1_public_key(1)))]
    #[case::ed25519(PublicKey::Single(ed25519_public_key(1)))]
    #[case::mixed_multisig(PublicKey::Multisig {
        threshold: 2,
        public_keys: vec![secp256k1_public_key(1), ed25519_public_key(2), secp256k1_public_key(3)],
    })]
    fn any_encoding_preserves_key(#[case] public_key: PublicKey) {
        let decoded = PublicKey::from_any(&public_key.to_any()).unwrap();
        assert_eq!(decoded, public_key);
    }

    #[test]
    fn secp256k1_key_is_compressed_on_the_wire() {
        let any = secp256k1_public_key(1).to_any();
        let raw = PubKey::decode(any.value.as_slice()).unwrap();
        assert_eq!(raw.key.len(), 33);
    }

    #[rstest]
    #[case::zero_threshold(0, 2)]
    #[case::threshold_above_key_count(3, 2)]
    #[case::no_keys(1, 0)]
    fn rejects_bad_multisig(#[case] threshold: u32, #[case] num_keys: u8) {
        let keys = (1..=num_keys).map(secp256k1_public_key).collect();
        let res = PublicKey::multisig(threshold, keys);
        assert!(matches!(res, Err(SoloMachineError::InvalidPublicKey { .. })));
    }

    #[test]
    fn unchecked_threshold_is_encoded_verbatim() {
        let public_key = PublicKey::Multisig {
            threshold: u32::MAX,
            public_keys: vec![secp256k1_public_key(1)],
        };
        let any = public_key.to_any();

        let raw = LegacyAminoPubKey::decode(any.value.as_slice()).unwrap();
        assert_eq!(raw.threshold, u32::MAX);
        assert!(matches!(
            PublicKey::from_any(&any),
            Err(SoloMachineError::InvalidPublicKey { .. })
        ));
    }

    #[test]
    fn rejects_nested_multisig() {
        let inner = PublicKey::multisig(1, vec![secp256k1_public_key(1)]).unwrap();
        let outer = Any {
            type_url: MULTISIG_PUB_KEY_TYPE_URL.to_string(),
            value: LegacyAminoPubKey {
                threshold: 1,
                public_keys: vec![inner.to_any()],
            }
            .encode_to_vec(),
        };

        let res = PublicKey::from_any(&outer);
        assert!(
            matches!(res, Err(SoloMachineError::InvalidPublicKey { reason }) if reason.contains("nested"))
        );
    }

    #[test]
    fn rejects_unknown_type_url() {
        let any = Any {
            type_url: "/cosmos.crypto.secp256r1.PubKey".to_string(),
            value: PubKey { key: vec![2; 33] }.encode_to_vec(),
        };
        let res = PublicKey::from_any(&any);
        assert!(
            matches!(res, Err(SoloMachineError::InvalidPublicKey { reason }) if reason.contains("unsupported"))
        );
    }

    #[rstest]
    #[case::secp256k1_wrong_length(SECP256K1_PUB_KEY_TYPE_URL, vec![2; 20])]
    #[case::secp256k1_not_on_curve(SECP256K1_PUB_KEY_TYPE_URL, vec![0xff; 33])]
    #[case::ed25519_wrong_length(ED25519_PUB_KEY_TYPE_URL, vec![1; 31])]
    #[case::empty_key(SECP256K1_PUB_KEY_TYPE_URL, vec![])]
    fn rejects_bad_key_bytes(#[case] type_url: &str, #[case] key: Vec<u8>) {
        let any = Any {
            type_url: type_url.to_string(),
            value: PubKey { key }.encode_to_vec(),
        };
        assert!(matches!(
            PublicKey::from_any(&any),
            Err(SoloMachineError::InvalidPublicKey { .. })
        ));
    }
}
