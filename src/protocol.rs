/// Binary telemetry message decoding
use thiserror::Error;

use crate::models::{SensorKind, SensorSample, TelemetryMessage};

// Emitter wire format constants
const LENGTH_SIZE: usize = 2;
const TIME_SIZE: usize = 8;
const ID_SIZE: usize = 4;
const TAG_SIZE: usize = 1;
const VALUE_SIZE: usize = 8;

/// Fixed header size: declared length + timestamp + emitter id.
pub const HEADER_LEN: usize = LENGTH_SIZE + TIME_SIZE + ID_SIZE;

/// Size of one sensor entry: 1 tag byte + 8-byte float value.
pub const ENTRY_LEN: usize = TAG_SIZE + VALUE_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("message of {0} bytes is shorter than the 14-byte header")]
    ShortHeader(usize),
    #[error("incomplete sensor entry: {0} trailing bytes")]
    PartialEntry(usize),
    #[error("unknown sensor tag {0}")]
    UnknownKind(u8),
}

/// Decode one telemetry message from a raw receive buffer.
///
/// The emitter writes all multi-byte fields in little-endian order:
/// - Bytes 0-1: declared message length (unsigned 16-bit, informational only)
/// - Bytes 2-9: timestamp in 100 ns ticks (signed 64-bit)
/// - Bytes 10-13: emitter identifier (signed 32-bit)
/// - Bytes 14..: repeating sensor entries, 1 tag byte + 8-byte float each
///
/// Parsing is bounded by `received_len`, the byte count returned by the
/// transport read, not by the declared length in the header. Entries are
/// consumed until the received bytes are exhausted; an unrecognized tag byte
/// or a partial trailing entry rejects the whole message.
///
/// # Arguments
/// * `buf` - Raw receive buffer
/// * `received_len` - Number of valid bytes in the buffer
///
/// # Returns
/// The decoded message, or a DecodeError describing the malformation
pub fn decode(buf: &[u8], received_len: usize) -> Result<TelemetryMessage, DecodeError> {
    let data = buf.get(..received_len).unwrap_or(buf);
    if data.len() < HEADER_LEN {
        return Err(DecodeError::ShortHeader(data.len()));
    }

    let declared_len = u16::from_le_bytes([data[0], data[1]]);
    let timestamp_ticks = read_i64(&data[LENGTH_SIZE..]);
    let emitter_id = read_i32(&data[LENGTH_SIZE + TIME_SIZE..]);

    let mut samples = Vec::new();
    let mut offset = HEADER_LEN;
    while offset < data.len() {
        let remaining = data.len() - offset;
        if remaining < ENTRY_LEN {
            return Err(DecodeError::PartialEntry(remaining));
        }

        let tag = data[offset];
        let kind = SensorKind::from_tag(tag).ok_or(DecodeError::UnknownKind(tag))?;
        let value = read_f64(&data[offset + TAG_SIZE..]);

        samples.push(SensorSample { kind, value });
        offset += ENTRY_LEN;
    }

    Ok(TelemetryMessage {
        declared_len,
        timestamp_ticks,
        emitter_id,
        samples,
    })
}

fn read_i64(data: &[u8]) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[..8]);
    i64::from_le_bytes(bytes)
}

fn read_i32(data: &[u8]) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[..4]);
    i32::from_le_bytes(bytes)
}

fn read_f64(data: &[u8]) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[..8]);
    f64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_message(
        declared_len: u16,
        timestamp_ticks: i64,
        emitter_id: i32,
        entries: &[(u8, f64)],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&declared_len.to_le_bytes());
        buf.extend_from_slice(&timestamp_ticks.to_le_bytes());
        buf.extend_from_slice(&emitter_id.to_le_bytes());
        for (tag, value) in entries {
            buf.push(*tag);
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf
    }

    #[test]
    fn decodes_header_only_message() {
        let buf = build_message(14, 123_456_789, -42, &[]);
        let message = decode(&buf, buf.len()).unwrap();
        assert_eq!(message.declared_len, 14);
        assert_eq!(message.timestamp_ticks, 123_456_789);
        assert_eq!(message.emitter_id, -42);
        assert!(message.samples.is_empty());
    }

    #[test]
    fn decodes_samples_in_wire_order() {
        let buf = build_message(41, 7, 3, &[(1, 21.5), (2, 48.0), (3, 1013.25)]);
        let message = decode(&buf, buf.len()).unwrap();
        assert_eq!(
            message.samples,
            vec![
                SensorSample {
                    kind: SensorKind::Temperature,
                    value: 21.5
                },
                SensorSample {
                    kind: SensorKind::Humidity,
                    value: 48.0
                },
                SensorSample {
                    kind: SensorKind::Pressure,
                    value: 1013.25
                },
            ]
        );
    }

    #[test]
    fn decodes_known_byte_scenario() {
        // Header: declared_len=2, ticks=100, emitter=1; one Temperature entry 1.0
        let buf: Vec<u8> = vec![
            0x02, 0x00, // declared length
            0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // timestamp ticks
            0x01, 0x00, 0x00, 0x00, // emitter id
            0x01, // tag: Temperature
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F, // 1.0f64 little-endian
        ];
        let message = decode(&buf, buf.len()).unwrap();
        assert_eq!(message.timestamp_ticks, 100);
        assert_eq!(message.emitter_id, 1);
        assert_eq!(
            message.samples,
            vec![SensorSample {
                kind: SensorKind::Temperature,
                value: 1.0
            }]
        );
    }

    #[test]
    fn rejects_buffer_shorter_than_header() {
        let buf = [0u8; 13];
        assert_eq!(decode(&buf, buf.len()), Err(DecodeError::ShortHeader(13)));
    }

    #[test]
    fn rejects_partial_trailing_entry() {
        let mut buf = build_message(20, 0, 0, &[(2, 55.0)]);
        buf.extend_from_slice(&[3, 0, 0]); // tag plus 2 of 8 value bytes
        assert_eq!(decode(&buf, buf.len()), Err(DecodeError::PartialEntry(3)));
    }

    #[test]
    fn rejects_unknown_sensor_tag() {
        let buf = build_message(23, 0, 0, &[(7, 1.0)]);
        assert_eq!(decode(&buf, buf.len()), Err(DecodeError::UnknownKind(7)));
    }

    #[test]
    fn ignores_bytes_past_received_len() {
        let mut buf = build_message(14, 5, 9, &[]);
        let received = buf.len();
        buf.extend_from_slice(&[0xFF; 32]); // stale bytes from a previous read
        let message = decode(&buf, received).unwrap();
        assert!(message.samples.is_empty());
        assert_eq!(message.emitter_id, 9);
    }
}
