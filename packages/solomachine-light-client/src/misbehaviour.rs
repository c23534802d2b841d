//! Detection of a solo machine signing conflicting claims at one sequence

use ibc_proto::google::protobuf::Any;
use prost::Message;

use crate::{
    client_state::ClientState,
    error::SoloMachineError,
    membership::verify_signed_bytes,
    proto::{self, MISBEHAVIOUR_TYPE_URL},
    signature::SignatureData,
};

/// One signed claim of a misbehaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAndData {
    /// Encoded signature data
    pub signature: Vec<u8>,
    /// Path bytes exactly as signed
    pub path: Vec<u8>,
    /// Signed value
    pub data: Vec<u8>,
    /// Timestamp the claim was signed at
    pub timestamp: u64,
}

/// Two signatures by the solo machine over different claims at the same sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misbehaviour {
    /// Sequence both claims were signed at
    pub sequence: u64,
    /// First claim
    pub signature_one: SignatureAndData,
    /// Second claim
    pub signature_two: SignatureAndData,
}

impl SignatureAndData {
    fn validate_basic(&self) -> Result<(), SoloMachineError> {
        if self.signature.is_empty() {
            return Err(invalid_misbehaviour("signature cannot be empty"));
        }
        if self.path.is_empty() {
            return Err(invalid_misbehaviour("path cannot be empty"));
        }
        if self.data.is_empty() {
            return Err(invalid_misbehaviour("data for signature cannot be empty"));
        }
        if self.timestamp == 0 {
            return Err(invalid_misbehaviour("timestamp cannot be 0"));
        }

        Ok(())
    }
}

impl Misbehaviour {
    /// Decodes protobuf `Misbehaviour` bytes.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidMisbehaviour`] if the bytes are malformed or a
    /// signature is missing.
    pub fn decode(bz: &[u8]) -> Result<Self, SoloMachineError> {
        proto::Misbehaviour::decode(bz)
            .map_err(|e| invalid_misbehaviour(&e.to_string()))?
            .try_into()
    }

    /// Decodes a misbehaviour from its `Any` encoding.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidMisbehaviour`] if the `Any` is of another type or
    /// malformed.
    pub fn from_any(any: &Any) -> Result<Self, SoloMachineError> {
        if any.type_url != MISBEHAVIOUR_TYPE_URL {
            return Err(invalid_misbehaviour(&format!(
                "unexpected misbehaviour type {}",
                any.type_url
            )));
        }

        Self::decode(&any.value)
    }

    /// Checks the evidence is well formed and the two claims actually conflict.
    /// # Errors
    /// Returns [`SoloMachineError::InvalidMisbehaviour`] describing the first violation.
    pub fn validate_basic(&self) -> Result<(), SoloMachineError> {
        if self.sequence == 0 {
            return Err(invalid_misbehaviour("sequence cannot be 0"));
        }
        self.signature_one.validate_basic()?;
        self.signature_two.validate_basic()?;

        if self.signature_one.signature == self.signature_two.signature {
            return Err(invalid_misbehaviour(
                "misbehaviour signatures cannot be equal",
            ));
        }
        if self.signature_one.path == self.signature_two.path
            && self.signature_one.data == self.signature_two.data
        {
            return Err(invalid_misbehaviour(
                "misbehaviour signatures must be over different messages",
            ));
        }

        Ok(())
    }
}

impl From<proto::SignatureAndData> for SignatureAndData {
    fn from(raw: proto::SignatureAndData) -> Self {
        Self {
            signature: raw.signature,
            path: raw.path,
            data: raw.data,
            timestamp: raw.timestamp,
        }
    }
}

impl From<&SignatureAndData> for proto::SignatureAndData {
    fn from(signature_and_data: &SignatureAndData) -> Self {
        Self {
            signature: signature_and_data.signature.clone(),
            path: signature_and_data.path.clone(),
            data: signature_and_data.data.clone(),
            timestamp: signature_and_data.timestamp,
        }
    }
}

impl TryFrom<proto::Misbehaviour> for Misbehaviour {
    type Error = SoloMachineError;

    fn try_from(raw: proto::Misbehaviour) -> Result<Self, Self::Error> {
        Ok(Self {
            sequence: raw.sequence,
            signature_one: raw
                .signature_one
                .ok_or_else(|| invalid_misbehaviour("signature one cannot be empty"))?
                .into(),
            signature_two: raw
                .signature_two
                .ok_or_else(|| invalid_misbehaviour("signature two cannot be empty"))?
                .into(),
        })
    }
}

impl From<&Misbehaviour> for proto::Misbehaviour {
    fn from(misbehaviour: &Misbehaviour) -> Self {
        Self {
            sequence: misbehaviour.sequence,
            signature_one: Some((&misbehaviour.signature_one).into()),
            signature_two: Some((&misbehaviour.signature_two).into()),
        }
    }
}

/// Verifies both claims of the misbehaviour against the client.
///
/// Each claim is checked as a membership proof signed at the misbehaviour sequence, over
/// the path bytes carried in the evidence.
/// # Errors
/// Returns [`SoloMachineError::ClientFrozen`] for a frozen client,
/// [`SoloMachineError::InvalidMisbehaviour`] for malformed evidence and the proof errors of
/// the first claim that does not verify.
pub fn verify_misbehaviour(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<(), SoloMachineError> {
    if client_state.is_frozen() {
        return Err(SoloMachineError::ClientFrozen);
    }
    misbehaviour.validate_basic()?;

    for signature_and_data in [&misbehaviour.signature_one, &misbehaviour.signature_two] {
        let signature_data = SignatureData::decode(&signature_and_data.signature)?;
        verify_signed_bytes(
            client_state.consensus_state(),
            misbehaviour.sequence,
            signature_and_data.timestamp,
            &signature_data,
            &signature_and_data.path,
            &signature_and_data.data,
        )?;
    }

    Ok(())
}

/// Verifies the misbehaviour and freezes the client.
/// # Errors
/// Same as [`verify_misbehaviour`], the client is left untouched on failure.
pub fn check_misbehaviour_and_update_state(
    client_state: &mut ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<(), SoloMachineError> {
    verify_misbehaviour(client_state, misbehaviour)?;
    client_state.freeze();

    tracing::warn!(
        sequence = misbehaviour.sequence,
        "solo machine misbehaviour detected, client frozen"
    );

    Ok(())
}

fn invalid_misbehaviour(reason: &str) -> SoloMachineError {
    SoloMachineError::InvalidMisbehaviour {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use ibc_proto::ibc::core::client::v1::Height;
    use rstest::rstest;

    use super::*;
    use crate::{
        client_state::Status,
        error::SignatureError,
        membership::verify_membership,
        path::{IbcPath, DEFAULT_COMMITMENT_PREFIX},
        test_utils::SoloMachine,
    };

    fn conflicting_misbehaviour(solo_machine: &SoloMachine) -> Misbehaviour {
        solo_machine.misbehaviour(
            (b"/ibc/connections/connection-0", b"first"),
            (b"/ibc/connections/connection-0", b"second"),
        )
    }

    #[test]
    fn conflicting_signatures_freeze_client() {
        let solo_machine = SoloMachine::new(1).with_sequence(4);
        let mut client_state = solo_machine.client_state();
        let misbehaviour = conflicting_misbehaviour(&solo_machine);

        check_misbehaviour_and_update_state(&mut client_state, &misbehaviour).unwrap();
        assert_eq!(client_state.status(), Status::Frozen);
        assert_eq!(client_state.sequence(), 4);
    }

    #[test]
    fn frozen_client_stays_frozen() {
        let solo_machine = SoloMachine::new(1);
        let mut client_state = solo_machine.client_state();
        let misbehaviour = conflicting_misbehaviour(&solo_machine);
        check_misbehaviour_and_update_state(&mut client_state, &misbehaviour).unwrap();

        assert_eq!(
            check_misbehaviour_and_update_state(&mut client_state, &misbehaviour),
            Err(SoloMachineError::ClientFrozen)
        );

        let path = IbcPath::Connection {
            connection_id: "connection-0".to_string(),
        };
        let proof = solo_machine.membership_proof(&path, b"first");
        let res = verify_membership(
            &mut client_state,
            &Height {
                revision_number: 0,
                revision_height: 1,
            },
            &proof,
            &path.to_bytes(DEFAULT_COMMITMENT_PREFIX),
            b"first",
        );
        assert_eq!(res, Err(SoloMachineError::ClientFrozen));
    }

    #[test]
    fn misbehaviour_at_past_sequence() {
        let solo_machine = SoloMachine::new(1).with_sequence(2);
        let misbehaviour = conflicting_misbehaviour(&solo_machine);
        let mut client_state = solo_machine.with_sequence(10).client_state();

        check_misbehaviour_and_update_state(&mut client_state, &misbehaviour).unwrap();
        assert!(client_state.is_frozen());
    }

    #[test]
    fn different_paths_conflict() {
        let solo_machine = SoloMachine::new(1);
        let mut client_state = solo_machine.client_state();
        let misbehaviour = solo_machine.misbehaviour(
            (b"/ibc/connections/connection-0", b"same"),
            (b"/ibc/connections/connection-1", b"same"),
        );

        check_misbehaviour_and_update_state(&mut client_state, &misbehaviour).unwrap();
        assert!(client_state.is_frozen());
    }

    #[test]
    fn multisig_misbehaviour() {
        let solo_machine = SoloMachine::new_multisig(2, 3).with_signers(vec![0, 2]);
        let mut client_state = solo_machine.client_state();
        let misbehaviour = conflicting_misbehaviour(&solo_machine);

        check_misbehaviour_and_update_state(&mut client_state, &misbehaviour).unwrap();
        assert!(client_state.is_frozen());
    }

    #[test]
    fn signature_by_other_key() {
        let solo_machine = SoloMachine::new(1);
        let mut client_state = solo_machine.client_state();
        let mut misbehaviour = conflicting_misbehaviour(&solo_machine);
        misbehaviour.signature_two = conflicting_misbehaviour(&SoloMachine::new(2)).signature_two;

        let res = check_misbehaviour_and_update_state(&mut client_state, &misbehaviour);
        assert_eq!(
            res,
            Err(SoloMachineError::ProofVerificationFailed(
                SignatureError::InvalidSignature
            ))
        );
        assert!(!client_state.is_frozen());
    }

    #[test]
    fn signature_at_other_sequence() {
        let solo_machine = SoloMachine::new(1);
        let mut client_state = solo_machine.client_state();
        let mut misbehaviour = conflicting_misbehaviour(&solo_machine);
        misbehaviour.sequence = 2;

        let res = check_misbehaviour_and_update_state(&mut client_state, &misbehaviour);
        assert!(matches!(
            res,
            Err(SoloMachineError::ProofVerificationFailed(_))
        ));
        assert!(!client_state.is_frozen());
    }

    #[test]
    fn signature_older_than_consensus_state() {
        let solo_machine = SoloMachine::new(1).with_time(10);
        let misbehaviour = conflicting_misbehaviour(&solo_machine);
        let mut client_state = solo_machine.with_time(20).client_state();

        let res = check_misbehaviour_and_update_state(&mut client_state, &misbehaviour);
        assert_eq!(
            res,
            Err(SoloMachineError::TimestampTooOld {
                consensus_timestamp: 20,
                proof_timestamp: 10
            })
        );
    }

    #[test]
    fn undecodable_signature() {
        let solo_machine = SoloMachine::new(1);
        let mut client_state = solo_machine.client_state();
        let mut misbehaviour = conflicting_misbehaviour(&solo_machine);
        misbehaviour.signature_one.signature = vec![0xff, 0xff];

        let res = check_misbehaviour_and_update_state(&mut client_state, &misbehaviour);
        assert!(matches!(
            res,
            Err(SoloMachineError::ProofDecodeFailure { .. })
        ));
    }

    #[rstest]
    #[case::zero_sequence(|m: &mut Misbehaviour| m.sequence = 0, "sequence")]
    #[case::empty_signature(|m: &mut Misbehaviour| m.signature_one.signature.clear(), "signature cannot be empty")]
    #[case::empty_path(|m: &mut Misbehaviour| m.signature_two.path.clear(), "path")]
    #[case::empty_data(|m: &mut Misbehaviour| m.signature_one.data.clear(), "data")]
    #[case::zero_timestamp(|m: &mut Misbehaviour| m.signature_two.timestamp = 0, "timestamp")]
    #[case::same_signature(
        |m: &mut Misbehaviour| m.signature_two.signature = m.signature_one.signature.clone(),
        "signatures cannot be equal"
    )]
    #[case::same_message(
        |m: &mut Misbehaviour| m.signature_two.data = m.signature_one.data.clone(),
        "different messages"
    )]
    fn malformed_misbehaviour(#[case] malform: fn(&mut Misbehaviour), #[case] reason: &str) {
        let solo_machine = SoloMachine::new(1);
        let mut client_state = solo_machine.client_state();
        let mut misbehaviour = conflicting_misbehaviour(&solo_machine);
        malform(&mut misbehaviour);

        let res = check_misbehaviour_and_update_state(&mut client_state, &misbehaviour);
        assert!(
            matches!(&res, Err(SoloMachineError::InvalidMisbehaviour { reason: r }) if r.contains(reason)),
            "unexpected result {res:?}"
        );
        assert!(!client_state.is_frozen());
    }

    #[test]
    fn decodes_any_encoded_misbehaviour() {
        let solo_machine = SoloMachine::new(1);
        let misbehaviour = conflicting_misbehaviour(&solo_machine);
        let any = Any {
            type_url: MISBEHAVIOUR_TYPE_URL.to_string(),
            value: proto::Misbehaviour::from(&misbehaviour).encode_to_vec(),
        };

        assert_eq!(Misbehaviour::from_any(&any), Ok(misbehaviour));
    }

    #[test]
    fn missing_signature_in_evidence() {
        let raw = proto::Misbehaviour {
            sequence: 1,
            signature_one: None,
            signature_two: None,
        };
        assert!(matches!(
            Misbehaviour::decode(&raw.encode_to_vec()),
            Err(SoloMachineError::InvalidMisbehaviour { .. })
        ));
    }
}
