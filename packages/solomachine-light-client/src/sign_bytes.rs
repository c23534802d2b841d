//! Canonical encoding of the bytes a solo machine signs

use prost::Message;

use crate::proto::SignBytes;

/// Encodes the `(sequence, timestamp, diversifier, path, data)` tuple the counterparty
/// signs for a single claim.
///
/// The encoding is the protobuf `SignBytes` message: every field carries its own tag and
/// `diversifier`, `path` and `data` are length-delimited, so two distinct tuples never
/// encode to the same bytes.
#[must_use]
pub fn encode(sequence: u64, timestamp: u64, diversifier: &str, path: &[u8], data: &[u8]) -> Vec<u8> {
    SignBytes {
        sequence,
        timestamp,
        diversifier: diversifier.to_owned(),
        path: path.to_vec(),
        data: data.to_vec(),
    }
    .encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_protobuf_layout() {
        let bz = encode(1, 150, "d1", b"/p", b"X");
        assert_eq!(hex::encode(bz), "0801109601 1a026431 22022f70 2a0158".replace(' ', ""));
    }

    #[test]
    fn is_deterministic() {
        let a = encode(7, 1_000, "div", b"/ibc/connections/connection-0", b"data");
        let b = encode(7, 1_000, "div", b"/ibc/connections/connection-0", b"data");
        assert_eq!(a, b);
    }

    #[test]
    fn path_and_data_boundary_is_unambiguous() {
        let a = encode(1, 1, "d", b"ab", b"c");
        let b = encode(1, 1, "d", b"a", b"bc");
        assert_ne!(a, b);
    }

    #[test]
    fn every_field_separates_claims() {
        let base = encode(1, 100, "d1", b"/path", b"data");
        assert_ne!(base, encode(2, 100, "d1", b"/path", b"data"));
        assert_ne!(base, encode(1, 101, "d1", b"/path", b"data"));
        assert_ne!(base, encode(1, 100, "d2", b"/path", b"data"));
        assert_ne!(base, encode(1, 100, "d1", b"/other", b"data"));
        assert_ne!(base, encode(1, 100, "d1", b"/path", b"other"));
    }

    #[test]
    fn empty_data_differs_from_absent_path() {
        assert_ne!(encode(1, 1, "d", b"", b"x"), encode(1, 1, "d", b"x", b""));
    }
}
