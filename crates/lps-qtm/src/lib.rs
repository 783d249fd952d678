//! Wire layer for the motion-capture real-time protocol.
//!
//! - [`ByteBuffer`] / [`ByteReader`]: little-endian cursor with strict bounds checks.
//! - [`decode_packet`]: one transport payload -> [`Packet`] (data frame or ignorable).
//! - [`ControlCommand`] / [`encode_command`]: framing of the textual control commands.
//! - [`split_packets`]: walk a recorded stream of back-to-back packets.
//!
//! ```
//! use lps_qtm::{decode_packet, FrameBuilder, Packet};
//!
//! let bytes = FrameBuilder::new(7).marker(1000.0, 0.0, 0.0).build();
//! match decode_packet(&bytes) {
//!     Ok(Packet::Data(frame)) => assert_eq!(frame.markers.len(), 1),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

mod command;
mod cursor;
mod packet;
mod stream;

pub use command::{encode_command, start_stream_commands, ControlCommand, COMMAND_MESSAGE_TYPE};
pub use cursor::{ByteBuffer, ByteReader, CursorError};
pub use packet::{
    decode_packet, describe_packet, ComponentType, DecodeError, FrameBuilder, Packet,
    PacketHeader, PacketType, MM_PER_METER,
};
pub use stream::{split_packets, PacketSplitter};
