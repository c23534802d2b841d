//! Verification of signed membership and non-membership claims

use ibc_proto::ibc::core::client::v1::Height;

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    error::SoloMachineError,
    path::{decode_merkle_path, merkle_path_string},
    proof::TimestampedSignature,
    sign_bytes,
    signature::{verify_signature, SignatureData},
};

/// Verifies that `value` is stored at `path` on the solo machine and advances the client
/// sequence.
///
/// `proof` is a protobuf `TimestampedSignatureData`, `path` a protobuf merkle path. The
/// solo machine must have signed the claim at the current client sequence under the
/// current diversifier. The client state is left untouched on failure.
/// # Errors
/// Returns an error if the client is frozen, the height has a revision, the proof or path
/// cannot be decoded, the proof is older than the consensus state or the signature does
/// not verify.
pub fn verify_membership(
    client_state: &mut ClientState,
    height: &Height,
    proof: &[u8],
    path: &[u8],
    value: &[u8],
) -> Result<(), SoloMachineError> {
    verify_signed_claim(client_state, height, proof, path, value)
}

/// Verifies that nothing is stored at `path` on the solo machine and advances the client
/// sequence. The solo machine signs absence as an empty value.
/// # Errors
/// Same as [`verify_membership`].
pub fn verify_non_membership(
    client_state: &mut ClientState,
    height: &Height,
    proof: &[u8],
    path: &[u8],
) -> Result<(), SoloMachineError> {
    verify_signed_claim(client_state, height, proof, path, &[])
}

fn verify_signed_claim(
    client_state: &mut ClientState,
    height: &Height,
    proof: &[u8],
    path: &[u8],
    value: &[u8],
) -> Result<(), SoloMachineError> {
    if client_state.is_frozen() {
        return Err(SoloMachineError::ClientFrozen);
    }
    if height.revision_number != 0 {
        return Err(SoloMachineError::InvalidHeight {
            revision_number: height.revision_number,
        });
    }

    let proof = TimestampedSignature::decode(proof)?;
    let path = merkle_path_string(&decode_merkle_path(path)?);

    let sequence = client_state.sequence();
    let sign_bytes = verify_signed_bytes(
        client_state.consensus_state(),
        sequence,
        proof.timestamp,
        &proof.signature_data,
        path.as_bytes(),
        value,
    )?;

    client_state.advance_sequence()?;

    tracing::debug!(
        sequence,
        timestamp = proof.timestamp,
        %path,
        sign_bytes = %hex::encode(&sign_bytes),
        "verified solo machine signature"
    );

    Ok(())
}

/// Checks the signature of a claim signed at `sequence` and `timestamp` against the
/// consensus state, returning the verified sign bytes.
pub(crate) fn verify_signed_bytes(
    consensus_state: &ConsensusState,
    sequence: u64,
    timestamp: u64,
    signature_data: &SignatureData,
    path: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, SoloMachineError> {
    if consensus_state.timestamp() > timestamp {
        return Err(SoloMachineError::TimestampTooOld {
            consensus_timestamp: consensus_state.timestamp(),
            proof_timestamp: timestamp,
        });
    }

    let sign_bytes = sign_bytes::encode(
        sequence,
        timestamp,
        consensus_state.diversifier(),
        path,
        data,
    );

    verify_signature(consensus_state.public_key(), &sign_bytes, signature_data)
        .map_err(SoloMachineError::ProofVerificationFailed)?;

    Ok(sign_bytes)
}
