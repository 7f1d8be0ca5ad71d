//! Property tests for the frame codec

use eurobraille_protocol::frame::{needs_escape, ACK, DLE, EOT, NACK, SOH};
use eurobraille_protocol::{DecodeEvent, ErrorCode, Frame, FrameDecoder, Reply};
use proptest::prelude::*;

fn feed_all(decoder: &mut FrameDecoder, wire: &[u8]) -> Vec<Frame> {
    wire.iter().filter_map(|&byte| decoder.feed(byte)).collect()
}

fn control_heavy_byte() -> impl Strategy<Value = u8> {
    prop_oneof![
        Just(SOH),
        Just(EOT),
        Just(DLE),
        Just(ACK),
        Just(NACK),
        any::<u8>(),
    ]
}

proptest! {
    #[test]
    fn roundtrip_any_payload(
        payload in proptest::collection::vec(any::<u8>(), 0..=256),
        sequence in 127u8..=255,
    ) {
        let frame = Frame::new(&payload, sequence).unwrap();
        let wire = frame.encode_to_vec().unwrap();

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &wire);

        prop_assert_eq!(frames.len(), 1);
        prop_assert_eq!(&frames[0].payload[..], &payload[..]);
        prop_assert_eq!(frames[0].sequence, sequence);
        prop_assert_eq!(decoder.take_reply(), Some(Reply::Ack));
    }

    #[test]
    fn controls_are_always_escaped(
        payload in proptest::collection::vec(control_heavy_byte(), 0..64),
        sequence in 127u8..=255,
    ) {
        let frame = Frame::new(&payload, sequence).unwrap();
        let wire = frame.encode_to_vec().unwrap();

        prop_assert_eq!(wire[0], SOH);
        prop_assert_eq!(wire[wire.len() - 1], EOT);

        // Walk the body: every control value must sit right after a DLE
        let body = &wire[1..wire.len() - 1];
        let mut i = 0;
        while i < body.len() {
            if body[i] == DLE {
                prop_assert!(i + 1 < body.len());
                prop_assert!(needs_escape(body[i + 1]));
                i += 2;
            } else {
                prop_assert!(!needs_escape(body[i]));
                i += 1;
            }
        }

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &wire);
        prop_assert_eq!(frames.len(), 1);
        prop_assert_eq!(&frames[0].payload[..], &payload[..]);
    }

    #[test]
    fn duplicates_are_acked_not_delivered(
        payload in proptest::collection::vec(any::<u8>(), 1..32),
        sequence in 128u8..=255,
    ) {
        let wire = Frame::new(&payload, sequence).unwrap().encode_to_vec().unwrap();

        let mut decoder = FrameDecoder::new();
        prop_assert_eq!(feed_all(&mut decoder, &wire).len(), 1);
        prop_assert_eq!(decoder.take_reply(), Some(Reply::Ack));

        prop_assert!(feed_all(&mut decoder, &wire).is_empty());
        prop_assert_eq!(decoder.take_reply(), Some(Reply::Ack));
        prop_assert_eq!(decoder.take_event(), Some(DecodeEvent::Duplicate { sequence }));
    }

    #[test]
    fn single_bit_flip_is_rejected(
        payload in proptest::collection::vec(0x20u8..0x7F, 1..48),
        sequence in 128u8..=255,
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        // Establish an accepted sequence the corrupted frame must not disturb
        let mut decoder = FrameDecoder::new();
        let previous = if sequence == 128 { 129 } else { 128 };
        let first = Frame::new(&[0x41], previous).unwrap().encode_to_vec().unwrap();
        prop_assert_eq!(feed_all(&mut decoder, &first).len(), 1);
        decoder.take_reply();

        let mut wire = Frame::new(&payload, sequence).unwrap().encode_to_vec().unwrap();
        // Payload and sequence carry no escapes here, so wire index = 1 + body index
        let index = 1 + position.index(payload.len() + 1);
        let flipped = wire[index] ^ (1 << bit);
        prop_assume!(!needs_escape(flipped));
        wire[index] = flipped;

        prop_assert!(feed_all(&mut decoder, &wire).is_empty());
        prop_assert_eq!(decoder.take_reply(), Some(Reply::Nack(ErrorCode::Parity)));
        prop_assert_eq!(decoder.last_accepted(), Some(previous));
    }
}
