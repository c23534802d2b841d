//! Persistence of the client state in the host's per-client store

use cosmwasm_std::Storage;
use ibc_proto::google::protobuf::Any;
use prost::Message;

use crate::{client_state::ClientState, error::SoloMachineError};

/// The store key used by `ibc-go` to store the client state
pub const HOST_CLIENT_STATE_KEY: &str = "clientState";

/// Loads the client state.
/// # Errors
/// Returns [`SoloMachineError::ClientStateNotFound`] if nothing is stored and
/// [`SoloMachineError::ClientStateDecodeFailure`] if the stored bytes are not a solo
/// machine client state.
#[allow(clippy::module_name_repetitions)]
pub fn get_client_state(storage: &dyn Storage) -> Result<ClientState, SoloMachineError> {
    let client_state_any_bz = storage
        .get(HOST_CLIENT_STATE_KEY.as_bytes())
        .ok_or(SoloMachineError::ClientStateNotFound)?;
    let client_state_any = Any::decode(client_state_any_bz.as_slice()).map_err(|e| {
        SoloMachineError::ClientStateDecodeFailure {
            reason: e.to_string(),
        }
    })?;

    ClientState::from_any(&client_state_any)
}

/// Stores the client state, replacing the previous one.
#[allow(clippy::module_name_repetitions)]
pub fn store_client_state(storage: &mut dyn Storage, client_state: &ClientState) {
    storage.set(
        HOST_CLIENT_STATE_KEY.as_bytes(),
        &client_state.to_any().encode_to_vec(),
    );
}
