//! Decoding of real-time data packets into marker frames.
//!
//! Data packet layout (all little-endian):
//!
//! ```text
//! int32 packet length | int32 packet type (3 = data) | int64 timestamp [us]
//! int32 frame number  | int32 component count (1)    | int32 component size
//! int32 component type (2 = unlabeled 3D markers)    | int32 marker count
//! int16 drop rate     | int16 sync quality
//! marker count x (f32 x, f32 y, f32 z [mm], int32 id)
//! ```

use lps_core::{Frame, Marker};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::cursor::{ByteBuffer, ByteReader, CursorError};

/// Marker coordinates arrive in millimeters.
pub const MM_PER_METER: f32 = 1000.0;

/// Packet kinds emitted by the tracking server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketType {
    Error,
    Command,
    Xml,
    Data,
    NoMoreData,
    C3d,
    Event,
    Discover,
    QtmFile,
    Unknown(i32),
}

impl PacketType {
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => Self::Error,
            1 => Self::Command,
            2 => Self::Xml,
            3 => Self::Data,
            4 => Self::NoMoreData,
            5 => Self::C3d,
            6 => Self::Event,
            7 => Self::Discover,
            8 => Self::QtmFile,
            other => Self::Unknown(other),
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            Self::Error => 0,
            Self::Command => 1,
            Self::Xml => 2,
            Self::Data => 3,
            Self::NoMoreData => 4,
            Self::C3d => 5,
            Self::Event => 6,
            Self::Discover => 7,
            Self::QtmFile => 8,
            Self::Unknown(other) => other,
        }
    }
}

/// Data component kinds. Only unlabeled 3D markers are understood here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    Markers3d,
    Markers3dNoLabels,
    Other(i32),
}

impl ComponentType {
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => Self::Markers3d,
            2 => Self::Markers3dNoLabels,
            other => Self::Other(other),
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            Self::Markers3d => 1,
            Self::Markers3dNoLabels => 2,
            Self::Other(other) => other,
        }
    }
}

/// Reasons a packet could not be turned into a frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    BufferUnderrun(#[from] CursorError),
    #[error("unsupported component count {count} (expected 1)")]
    UnsupportedComponentCount { count: i32 },
    #[error("unsupported component type {component_type} (expected 2, unlabeled 3D markers)")]
    UnsupportedComponentType { component_type: i32 },
    #[error("invalid marker count {count}")]
    InvalidMarkerCount { count: i32 },
}

/// Outcome of decoding one transport payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    /// A marker frame.
    Data(Frame),
    /// A well-formed packet of another kind; safe to drop.
    Ignored { packet_type: PacketType },
}

/// The two leading fields common to every packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    pub length: i32,
    pub packet_type: PacketType,
}

fn read_header(reader: &mut ByteReader<'_>) -> Result<PacketHeader, CursorError> {
    let length = reader.read_i32()?;
    let packet_type = PacketType::from_wire(reader.read_i32()?);
    Ok(PacketHeader {
        length,
        packet_type,
    })
}

/// Read the packet header for diagnostics, then rewind the cursor.
pub fn describe_packet(reader: &mut ByteReader<'_>) -> Result<PacketHeader, CursorError> {
    let header = read_header(reader);
    reader.reset();
    header
}

/// Decode one packet.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(bytes), fields(len = bytes.len()))
)]
pub fn decode_packet(bytes: &[u8]) -> Result<Packet, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    if log::log_enabled!(log::Level::Trace) {
        if let Ok(header) = describe_packet(&mut reader) {
            log::trace!(
                "packet: declared length {} ({} received), type {:?}",
                header.length,
                bytes.len(),
                header.packet_type
            );
        }
    }

    let header = read_header(&mut reader)?;
    if header.packet_type != PacketType::Data {
        log::debug!("ignoring packet of type {:?}", header.packet_type);
        return Ok(Packet::Ignored {
            packet_type: header.packet_type,
        });
    }

    let timestamp_us = reader.read_i64()?;
    let number = reader.read_i32()?;

    let count = reader.read_i32()?;
    if count != 1 {
        return Err(DecodeError::UnsupportedComponentCount { count });
    }

    let _component_size = reader.read_i32()?;
    let component_type = reader.read_i32()?;
    if ComponentType::from_wire(component_type) != ComponentType::Markers3dNoLabels {
        return Err(DecodeError::UnsupportedComponentType { component_type });
    }

    let marker_count = reader.read_i32()?;
    let marker_count = usize::try_from(marker_count)
        .map_err(|_| DecodeError::InvalidMarkerCount {
            count: marker_count,
        })?;
    let drop_rate = reader.read_i16()?;
    let sync_quality = reader.read_i16()?;

    // Cap the reservation by what the payload can actually hold.
    let mut markers = Vec::with_capacity(marker_count.min(reader.remaining() / 16));
    for index in 0..marker_count {
        let x = reader.read_f32()? / MM_PER_METER;
        let y = reader.read_f32()? / MM_PER_METER;
        let z = reader.read_f32()? / MM_PER_METER;
        let _id = reader.read_i32()?;
        markers.push(Marker::new(x, y, z).with_source_index(index));
    }

    if reader.remaining() > 0 {
        log::debug!(
            "frame {number}: {} trailing bytes after {marker_count} markers",
            reader.remaining()
        );
    }

    Ok(Packet::Data(Frame {
        number,
        timestamp_us,
        quality: Frame::quality_from_metrics(drop_rate, sync_quality),
        markers,
    }))
}

/// Builder for synthetic data packets, used by tests, demos and replay tooling.
#[derive(Clone, Debug)]
pub struct FrameBuilder {
    packet_type: i32,
    frame_number: i32,
    timestamp_us: i64,
    component_count: i32,
    component_type: i32,
    drop_rate: i16,
    sync_quality: i16,
    markers_mm: Vec<[f32; 3]>,
}

impl FrameBuilder {
    pub fn new(frame_number: i32) -> Self {
        Self {
            packet_type: PacketType::Data.to_wire(),
            frame_number,
            timestamp_us: 0,
            component_count: 1,
            component_type: ComponentType::Markers3dNoLabels.to_wire(),
            drop_rate: 1000,
            sync_quality: 1000,
            markers_mm: Vec::new(),
        }
    }

    pub fn packet_type(mut self, packet_type: PacketType) -> Self {
        self.packet_type = packet_type.to_wire();
        self
    }

    pub fn timestamp_us(mut self, timestamp_us: i64) -> Self {
        self.timestamp_us = timestamp_us;
        self
    }

    pub fn component_count(mut self, count: i32) -> Self {
        self.component_count = count;
        self
    }

    pub fn component_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = component_type.to_wire();
        self
    }

    pub fn quality(mut self, drop_rate: i16, sync_quality: i16) -> Self {
        self.drop_rate = drop_rate;
        self.sync_quality = sync_quality;
        self
    }

    /// Add a marker given in millimeters.
    pub fn marker(mut self, x: f32, y: f32, z: f32) -> Self {
        self.markers_mm.push([x, y, z]);
        self
    }

    /// Add a marker given in meters.
    pub fn marker_m(self, x: f32, y: f32, z: f32) -> Self {
        self.marker(x * MM_PER_METER, y * MM_PER_METER, z * MM_PER_METER)
    }

    pub fn build(&self) -> Vec<u8> {
        if self.packet_type != PacketType::Data.to_wire() {
            let mut buf = ByteBuffer::with_capacity(8);
            buf.append_i32(8);
            buf.append_i32(self.packet_type);
            return buf.freeze().to_vec();
        }

        let component_size = 4 + 4 + 4 + 2 + 2 + 16 * self.markers_mm.len();
        let packet_length = 8 + 8 + 4 + 4 + component_size;

        let mut buf = ByteBuffer::with_capacity(packet_length);
        buf.append_i32(packet_length as i32);
        buf.append_i32(self.packet_type);
        buf.append_i64(self.timestamp_us);
        buf.append_i32(self.frame_number);
        buf.append_i32(self.component_count);
        buf.append_i32(component_size as i32);
        buf.append_i32(self.component_type);
        buf.append_i32(self.markers_mm.len() as i32);
        buf.append_i16(self.drop_rate);
        buf.append_i16(self.sync_quality);
        for (id, [x, y, z]) in self.markers_mm.iter().enumerate() {
            buf.append_f32(*x);
            buf.append_f32(*y);
            buf.append_f32(*z);
            buf.append_i32(id as i32);
        }
        buf.freeze().to_vec()
    }
}
