//! Textual control commands sent to the tracking server over TCP.
//!
//! Frame layout: `int32 length | int32 type = 1 | text | 0x00`, where
//! `length` counts the whole frame (8 header bytes, the text, the terminator).

use std::fmt;

use crate::cursor::ByteBuffer;

/// Message type used for command frames.
pub const COMMAND_MESSAGE_TYPE: i32 = 1;

/// Protocol version requested during the handshake.
const PROTOCOL_VERSION: &str = "1.12";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    Version,
    ByteOrder,
    GetState,
    /// Start streaming unlabeled 3D markers to a UDP port.
    StreamFrames { frequency: u32, udp_port: u16 },
    StreamFramesStop,
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version => write!(f, "Version {PROTOCOL_VERSION}"),
            Self::ByteOrder => f.write_str("ByteOrder"),
            Self::GetState => f.write_str("GetState"),
            Self::StreamFrames {
                frequency,
                udp_port,
            } => write!(
                f,
                "StreamFrames Frequency:{frequency} UDP:{udp_port} 3DNoLabels"
            ),
            Self::StreamFramesStop => f.write_str("StreamFrames Stop"),
        }
    }
}

/// Encode a command into a ready-to-send TCP frame.
pub fn encode_command(command: &ControlCommand) -> Vec<u8> {
    let text = command.to_string();
    let length = 9 + text.len();

    let mut buf = ByteBuffer::with_capacity(length);
    buf.append_i32(length as i32);
    buf.append_i32(COMMAND_MESSAGE_TYPE);
    buf.append_str_raw(&text);
    buf.append_u8(0);
    log::debug!("encoded command {text:?} ({length} bytes)");
    buf.freeze().to_vec()
}

/// The command sequence that opens a marker stream.
pub fn start_stream_commands(frequency: u32, udp_port: u16) -> [ControlCommand; 4] {
    [
        ControlCommand::Version,
        ControlCommand::ByteOrder,
        ControlCommand::GetState,
        ControlCommand::StreamFrames {
            frequency,
            udp_port,
        },
    ]
}
