//! Signature data and the verification capability shared by single and multisig keys

use std::collections::BTreeSet;

use prost::Message;

use crate::{
    error::{SignatureError, SoloMachineError},
    proto::{signature_descriptor_data::Sum, CompactBitArray, SignatureDescriptorData},
    public_key::PublicKey,
};

/// Decoded signature data of a proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureData {
    /// One signature for a single key
    Single {
        /// Raw signature bytes
        signature: Vec<u8>,
    },
    /// Sparse `(key index, signature)` pairs for a multisig key
    Multi {
        /// Signatures keyed by the index of the signing key
        signatures: Vec<(usize, Vec<u8>)>,
    },
}

impl SignatureData {
    /// Decodes protobuf `SignatureDescriptor.Data` bytes.
    /// # Errors
    /// Returns [`SoloMachineError::ProofDecodeFailure`] if the bytes are malformed, empty, or
    /// the multisig bit array does not match the number of signatures.
    pub fn decode(bz: &[u8]) -> Result<Self, SoloMachineError> {
        let raw = SignatureDescriptorData::decode(bz).map_err(|e| decode_failure(&e.to_string()))?;
        Self::try_from(raw)
    }
}

impl TryFrom<SignatureDescriptorData> for SignatureData {
    type Error = SoloMachineError;

    fn try_from(raw: SignatureDescriptorData) -> Result<Self, Self::Error> {
        match raw.sum {
            None => Err(decode_failure("signature data has no signature")),
            Some(Sum::Single(single)) => Ok(Self::Single {
                signature: single.signature,
            }),
            Some(Sum::Multi(multi)) => {
                let bit_array = multi
                    .bitarray
                    .ok_or_else(|| decode_failure("multisig signature data has no bit array"))?;
                let indices = set_bit_indices(&bit_array)?;
                if indices.len() != multi.signatures.len() {
                    return Err(decode_failure(&format!(
                        "bit array marks {} signers but {} signatures were provided",
                        indices.len(),
                        multi.signatures.len()
                    )));
                }

                let signatures = indices
                    .into_iter()
                    .zip(multi.signatures)
                    .map(|(index, data)| match data.sum {
                        Some(Sum::Single(single)) => Ok((index, single.signature)),
                        _ => Err(decode_failure(
                            "nested multisig signatures are not supported",
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Self::Multi { signatures })
            }
        }
    }
}

/// Verifies `signature_data` over `message` under `public_key`.
///
/// A single key requires exactly one valid signature. A multisig key requires signatures
/// from at least `threshold` distinct key indices; repeated indices count once and indices
/// outside the key set never count.
/// # Errors
/// Returns a [`SignatureError`] describing why the signature data is not acceptable.
pub fn verify_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature_data: &SignatureData,
) -> Result<(), SignatureError> {
    match (public_key, signature_data) {
        (PublicKey::Single(key), SignatureData::Single { signature }) => {
            key.verify(message, signature)
        }
        (
            PublicKey::Multisig {
                threshold,
                public_keys,
            },
            SignatureData::Multi { signatures },
        ) => {
            let valid: BTreeSet<usize> = signatures
                .iter()
                .filter(|(index, signature)| {
                    public_keys
                        .get(*index)
                        .is_some_and(|key| key.verify(message, signature).is_ok())
                })
                .map(|(index, _)| *index)
                .collect();

            if valid.len() < usize::try_from(*threshold).unwrap_or(usize::MAX) {
                return Err(SignatureError::InsufficientSignatures {
                    valid: valid.len(),
                    threshold: *threshold,
                });
            }

            Ok(())
        }
        (PublicKey::Single(_), SignatureData::Multi { .. }) => {
            Err(SignatureError::SignatureShapeMismatch { expected: "single" })
        }
        (PublicKey::Multisig { .. }, SignatureData::Single { .. }) => {
            Err(SignatureError::SignatureShapeMismatch { expected: "multi" })
        }
    }
}

/// Builds a bit array of `size` bits with the given indices set.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn new_bit_array(size: usize, indices: &[usize]) -> CompactBitArray {
    let mut elems = vec![0u8; size.div_ceil(8)];
    for &index in indices.iter().filter(|&&index| index < size) {
        elems[index / 8] |= 1 << (7 - index % 8);
    }

    CompactBitArray {
        extra_bits_stored: (size % 8) as u32,
        elems,
    }
}

fn bit_array_size(bit_array: &CompactBitArray) -> Result<usize, SoloMachineError> {
    let extra_bits = bit_array.extra_bits_stored as usize;
    if extra_bits >= 8 {
        return Err(decode_failure("bit array stores more than 7 extra bits"));
    }

    Ok(match (bit_array.elems.len(), extra_bits) {
        (0, _) => 0,
        (len, 0) => len * 8,
        (len, extra) => (len - 1) * 8 + extra,
    })
}

fn set_bit_indices(bit_array: &CompactBitArray) -> Result<Vec<usize>, SoloMachineError> {
    let size = bit_array_size(bit_array)?;
    Ok((0..size)
        .filter(|index| bit_array.elems[index / 8] & (1 << (7 - index % 8)) != 0)
        .collect())
}

fn decode_failure(reason: &str) -> SoloMachineError {
    SoloMachineError::ProofDecodeFailure {
        reason: reason.to_string(),
    }
}
