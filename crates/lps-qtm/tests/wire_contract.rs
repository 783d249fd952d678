use approx::assert_relative_eq;
use lps_qtm::{decode_packet, split_packets, ByteBuffer, DecodeError, Packet, PacketType};

/// Hand-assembled data packet, independent of `FrameBuilder`.
fn raw_frame(frame_number: i32, markers_mm: &[[f32; 3]]) -> Vec<u8> {
    let mut buf = ByteBuffer::new();
    buf.append_i32(40 + 16 * markers_mm.len() as i32);
    buf.append_i32(3);
    buf.append_i64(123_456_789);
    buf.append_i32(frame_number);
    buf.append_i32(1);
    buf.append_i32(16 + 16 * markers_mm.len() as i32);
    buf.append_i32(2);
    buf.append_i32(markers_mm.len() as i32);
    buf.append_i16(1000);
    buf.append_i16(0);
    for (id, m) in markers_mm.iter().enumerate() {
        buf.append_f32(m[0]);
        buf.append_f32(m[1]);
        buf.append_f32(m[2]);
        buf.append_i32(1000 + id as i32);
    }
    buf.as_slice().to_vec()
}

#[test]
fn n_markers_decode_to_n_markers_in_meters() {
    let markers_mm: Vec<[f32; 3]> = (0..25)
        .map(|i| {
            let f = i as f32;
            [f * 100.0, -f * 50.0, 2000.0 + f]
        })
        .collect();
    let bytes = raw_frame(9001, &markers_mm);

    let Ok(Packet::Data(frame)) = decode_packet(&bytes) else {
        panic!("expected a decoded frame");
    };
    assert_eq!(frame.number, 9001);
    assert_eq!(frame.timestamp_us, 123_456_789);
    assert_relative_eq!(frame.quality, 0.5);
    assert_eq!(frame.markers.len(), markers_mm.len());
    for (m, mm) in frame.markers.iter().zip(&markers_mm) {
        assert_relative_eq!(m.position.x, mm[0] / 1000.0);
        assert_relative_eq!(m.position.y, mm[1] / 1000.0);
        assert_relative_eq!(m.position.z, mm[2] / 1000.0);
    }
}

#[test]
fn every_truncation_of_a_frame_fails_cleanly() {
    let bytes = raw_frame(1, &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    for cut in 0..bytes.len() {
        match decode_packet(&bytes[..cut]) {
            Err(DecodeError::BufferUnderrun(_)) => {}
            other => panic!("cut at {cut}: unexpected {other:?}"),
        }
    }
    assert!(decode_packet(&bytes).is_ok());
}

#[test]
fn mixed_stream_decodes_data_and_skips_the_rest() {
    let mut event = ByteBuffer::new();
    event.append_i32(8);
    event.append_i32(6);
    let stream = [
        raw_frame(1, &[[0.0, 0.0, 0.0]]),
        event.as_slice().to_vec(),
        raw_frame(2, &[]),
    ]
    .concat();

    let outcomes: Vec<Packet> = split_packets(&stream)
        .map(|p| decode_packet(p.expect("split")).expect("decode"))
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(&outcomes[0], Packet::Data(f) if f.number == 1));
    assert_eq!(
        outcomes[1],
        Packet::Ignored {
            packet_type: PacketType::Event
        }
    );
    assert!(matches!(&outcomes[2], Packet::Data(f) if f.markers.is_empty()));
}
