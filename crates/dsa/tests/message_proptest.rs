//! Property-based tests for the DSA message codec.

use dsa::{Message, Response};

proptest::proptest! {
    /// Packing then splitting a message gives back both bytes.
    #[test]
    fn pack_splits_back(opcode in 0u8..=255u8, data in 0u8..=255u8) {
        let m = Message::pack(opcode, data);
        assert_eq!(m.opcode(), opcode);
        assert_eq!(m.data(), data);
    }

    /// Only the all-zero message is invalid.
    #[test]
    fn validity_is_nonzero(raw in 0u16..=u16::MAX) {
        assert_eq!(Message::from_raw(raw).is_valid(), raw != 0);
    }

    /// Every decodable response code re-encodes to the same high byte.
    #[test]
    fn response_decode_is_faithful(raw in 0u16..=u16::MAX) {
        let m = Message::from_raw(raw);
        if let Ok(response) = Response::of(m) {
            assert_eq!(response.message(m.data()), m);
        }
    }
}
