//! Synthetic frame builders shared by the integration tests.
#![allow(dead_code)]

use tidescan_core::{ChecksumAlgorithm, SontekSections, compute_checksum};

/// Calendar fields written into generated frames.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Clock {
    pub fn at_second(second: u8) -> Self {
        Self {
            year: 2024,
            month: 3,
            day: 14,
            hour: 9,
            minute: 26,
            second,
        }
    }
}

/// Compact frame with a 10-byte header.
pub fn ad2cp_frame(series_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 10];
    out[0] = 0xA5;
    out[1] = 10;
    out[2] = series_id;
    out[3] = 0x10;
    out[4..6].copy_from_slice(&(payload.len() as u16).to_le_bytes());
    let data_sum = compute_checksum(ChecksumAlgorithm::NortekWordSum, payload);
    out[6..8].copy_from_slice(&data_sum.to_le_bytes());
    let header_sum = compute_checksum(ChecksumAlgorithm::NortekWordSum, &out[..8]);
    out[8..10].copy_from_slice(&header_sum.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Measurement payload carrying `clock` in its preamble, padded with
/// `body` bytes.
pub fn ad2cp_measurement(clock: Clock, body: &[u8]) -> Vec<u8> {
    let mut payload = vec![0u8; 16];
    payload[8] = (clock.year - 1900) as u8;
    payload[9] = clock.month - 1;
    payload[10] = clock.day;
    payload[11] = clock.hour;
    payload[12] = clock.minute;
    payload[13] = clock.second;
    payload.extend_from_slice(body);
    payload
}

/// Ensemble with a fixed leader stub, a variable leader and `extra` bytes
/// of a third data type.
pub fn rdi_ensemble(number: u32, clock: Clock, extra: &[u8]) -> Vec<u8> {
    let fixed_leader = vec![0u8; 8];
    let mut variable_leader = vec![0u8; 14];
    variable_leader[0..2].copy_from_slice(&0x0080u16.to_le_bytes());
    variable_leader[2..4].copy_from_slice(&((number & 0xffff) as u16).to_le_bytes());
    variable_leader[4] = (clock.year % 100) as u8;
    variable_leader[5] = clock.month;
    variable_leader[6] = clock.day;
    variable_leader[7] = clock.hour;
    variable_leader[8] = clock.minute;
    variable_leader[9] = clock.second;
    variable_leader[11] = (number >> 16) as u8;

    let header_len = 6 + 2 * 3;
    let fixed_at = header_len;
    let variable_at = fixed_at + fixed_leader.len();
    let extra_at = variable_at + variable_leader.len();
    let ensemble_bytes = extra_at + extra.len();

    let mut out = vec![0x7F, 0x7F];
    out.extend_from_slice(&(ensemble_bytes as u16).to_le_bytes());
    out.push(0);
    out.push(3);
    out.extend_from_slice(&(fixed_at as u16).to_le_bytes());
    out.extend_from_slice(&(variable_at as u16).to_le_bytes());
    out.extend_from_slice(&(extra_at as u16).to_le_bytes());
    out.extend_from_slice(&fixed_leader);
    out.extend_from_slice(&variable_leader);
    out.extend_from_slice(extra);
    let sum = compute_checksum(ChecksumAlgorithm::ByteSum16, &out);
    out.extend_from_slice(&sum.to_le_bytes());
    out
}

/// Profile with the given installed-sensor bits and recorded sections.
pub fn sontek_profile(
    profile_number: u32,
    sensors: u8,
    sections: &SontekSections,
    beams: u8,
    cells: u16,
    clock: Clock,
) -> Vec<u8> {
    let mut out = vec![0u8; 80];
    out[..3].copy_from_slice(&[0xA5, 0x10, 0x50]);
    out[3] = sensors;
    out[4] = beams;
    out[5..7].copy_from_slice(&cells.to_le_bytes());
    out[7..9].copy_from_slice(&30u16.to_le_bytes());
    out[9..11].copy_from_slice(&(clock.year as u16).to_le_bytes());
    out[11] = clock.day;
    out[12] = clock.month;
    out[13] = clock.minute;
    out[14] = clock.hour;
    out[16] = clock.second;
    out[17..21].copy_from_slice(&profile_number.to_le_bytes());
    out.extend(std::iter::repeat_n(0x22, sections.size()));
    let data_len = usize::from(beams) * usize::from(cells) * 4;
    out.extend((0..data_len).map(|i| (i * 7 % 251) as u8));
    let sum = compute_checksum(ChecksumAlgorithm::SeededByteSum16 { seed: 0xA596 }, &out);
    out.extend_from_slice(&sum.to_le_bytes());
    out
}

/// Concatenate frames, returning the stream and each frame's offset.
pub fn stream(frames: &[Vec<u8>]) -> (Vec<u8>, Vec<usize>) {
    let mut bytes = Vec::new();
    let mut offsets = Vec::with_capacity(frames.len());
    for frame in frames {
        offsets.push(bytes.len());
        bytes.extend_from_slice(frame);
    }
    (bytes, offsets)
}
