//! Splitting a recorded byte stream into individual packets.

use crate::cursor::{ByteReader, CursorError};

/// Smallest well-formed packet: length and type fields.
const HEADER_LEN: usize = 8;

/// Iterator over back-to-back packets, delimited by their leading length field.
///
/// A declared length shorter than the header or longer than the remaining
/// bytes ends the iteration with a `BufferUnderrun`.
#[derive(Clone, Debug)]
pub struct PacketSplitter<'a> {
    data: &'a [u8],
    failed: bool,
}

/// Split `data` into packets.
pub fn split_packets(data: &[u8]) -> PacketSplitter<'_> {
    PacketSplitter {
        data,
        failed: false,
    }
}

impl<'a> Iterator for PacketSplitter<'a> {
    type Item = Result<&'a [u8], CursorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.data.is_empty() {
            return None;
        }

        let declared = match ByteReader::new(self.data).read_i32() {
            Ok(len) => len,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        let length = usize::try_from(declared).unwrap_or(0).max(HEADER_LEN);
        if length > self.data.len() {
            self.failed = true;
            return Some(Err(CursorError::BufferUnderrun {
                requested: length,
                remaining: self.data.len(),
            }));
        }

        let (packet, rest) = self.data.split_at(length);
        self.data = rest;
        Some(Ok(packet))
    }
}
