//! Entry points for the host: every operation loads the client state from the host's
//! store, runs against an in-memory copy and stores it back only when it succeeded.

use cosmwasm_std::Storage;
use ibc_proto::{google::protobuf::Any, ibc::core::client::v1::Height};

use crate::{
    client_state::{ClientState, Status},
    consensus_state::ConsensusState,
    error::SoloMachineError,
    membership,
    misbehaviour::{self, Misbehaviour},
    store::{get_client_state, store_client_state},
};

/// Membership verification request
#[derive(Debug, Clone)]
pub struct VerifyMembershipMsg {
    /// Height the proof is claimed for, its revision must be 0
    pub height: Height,
    /// Unused, solo machines have no block delay
    pub delay_time_period: u64,
    /// Unused, solo machines have no block delay
    pub delay_block_period: u64,
    /// Protobuf `TimestampedSignatureData`
    pub proof: Vec<u8>,
    /// Protobuf merkle path
    pub merkle_path: Vec<u8>,
    /// The value claimed to be stored at the path
    pub value: Vec<u8>,
}

/// Non-membership verification request
#[derive(Debug, Clone)]
pub struct VerifyNonMembershipMsg {
    /// Height the proof is claimed for, its revision must be 0
    pub height: Height,
    /// Unused, solo machines have no block delay
    pub delay_time_period: u64,
    /// Unused, solo machines have no block delay
    pub delay_block_period: u64,
    /// Protobuf `TimestampedSignatureData`
    pub proof: Vec<u8>,
    /// Protobuf merkle path
    pub merkle_path: Vec<u8>,
}

/// Creates the client from its genesis state. A store that already holds a client state
/// is never overwritten.
///
/// `consensus_state` must be the `Any` encoding of the consensus state the client state
/// was created with.
/// # Errors
/// Returns [`SoloMachineError::ClientFrozen`] for a frozen client state, stored or given,
/// [`SoloMachineError::ClientAlreadyInitialized`] if an active client state is stored,
/// [`SoloMachineError::InvalidConsensusState`] if the consensus state is missing, of
/// another client type or not the genesis one, and the decode errors of the consensus
/// state otherwise.
pub fn initialize(
    storage: &mut dyn Storage,
    client_state: ClientState,
    consensus_state: Option<&Any>,
) -> Result<ClientState, SoloMachineError> {
    match get_client_state(storage) {
        Ok(stored) if stored.is_frozen() => return Err(SoloMachineError::ClientFrozen),
        Ok(_) => return Err(SoloMachineError::ClientAlreadyInitialized),
        Err(SoloMachineError::ClientStateNotFound) => {}
        Err(e) => return Err(e),
    }

    if client_state.is_frozen() {
        return Err(SoloMachineError::ClientFrozen);
    }

    let consensus_state = consensus_state.ok_or_else(|| {
        SoloMachineError::InvalidConsensusState {
            reason: "consensus state cannot be empty".to_string(),
        }
    })?;
    let consensus_state = ConsensusState::from_any(consensus_state)?;
    if &consensus_state != client_state.consensus_state() {
        return Err(SoloMachineError::InvalidConsensusState {
            reason: "consensus state does not match the client state".to_string(),
        });
    }

    store_client_state(storage, &client_state);

    tracing::debug!(
        sequence = client_state.sequence(),
        diversifier = client_state.consensus_state().diversifier(),
        "initialized solo machine client"
    );

    Ok(client_state)
}

/// Status of the stored client.
/// # Errors
/// Returns an error if the client state cannot be loaded.
pub fn status(storage: &dyn Storage) -> Result<Status, SoloMachineError> {
    Ok(get_client_state(storage)?.status())
}

/// Verifies a membership proof and stores the advanced client state.
/// # Errors
/// Returns an error if the client state cannot be loaded or the proof does not verify.
#[allow(clippy::needless_pass_by_value)]
pub fn verify_membership(
    storage: &mut dyn Storage,
    verify_membership_msg: VerifyMembershipMsg,
) -> Result<(), SoloMachineError> {
    let mut client_state = get_client_state(storage)?;

    membership::verify_membership(
        &mut client_state,
        &verify_membership_msg.height,
        &verify_membership_msg.proof,
        &verify_membership_msg.merkle_path,
        &verify_membership_msg.value,
    )?;

    store_client_state(storage, &client_state);
    Ok(())
}

/// Verifies a non-membership proof and stores the advanced client state.
/// # Errors
/// Returns an error if the client state cannot be loaded or the proof does not verify.
#[allow(clippy::needless_pass_by_value)]
pub fn verify_non_membership(
    storage: &mut dyn Storage,
    verify_non_membership_msg: VerifyNonMembershipMsg,
) -> Result<(), SoloMachineError> {
    let mut client_state = get_client_state(storage)?;

    membership::verify_non_membership(
        &mut client_state,
        &verify_non_membership_msg.height,
        &verify_non_membership_msg.proof,
        &verify_non_membership_msg.merkle_path,
    )?;

    store_client_state(storage, &client_state);
    Ok(())
}

/// Verifies protobuf encoded misbehaviour evidence and stores the frozen client state.
/// # Errors
/// Returns [`SoloMachineError::ClientFrozen`] if the client is already frozen, otherwise
/// the decode and verification errors of the evidence.
pub fn check_misbehaviour_and_update_state(
    storage: &mut dyn Storage,
    misbehaviour: &[u8],
) -> Result<ClientState, SoloMachineError> {
    let mut client_state = get_client_state(storage)?;
    if client_state.is_frozen() {
        return Err(SoloMachineError::ClientFrozen);
    }

    let misbehaviour = Misbehaviour::decode(misbehaviour)?;
    misbehaviour::check_misbehaviour_and_update_state(&mut client_state, &misbehaviour)?;

    store_client_state(storage, &client_state);
    Ok(client_state)
}

/// Timestamp of the stored consensus state at `height`.
/// # Errors
/// Returns an error if the client state cannot be loaded or `height` is not the latest
/// height.
pub fn timestamp_at_height(
    storage: &dyn Storage,
    height: &Height,
) -> Result<u64, SoloMachineError> {
    get_client_state(storage)?.timestamp_at_height(height)
}
