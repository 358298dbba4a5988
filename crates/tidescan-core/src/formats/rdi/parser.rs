use serde::Serialize;

use super::layout;
use crate::formats::FrameMeta;
use crate::formats::common::checksum::{self, ChecksumAlgorithm};
use crate::formats::common::{ByteCursor, Candidate, CursorError, RecordTime, Validity};

/// Fields extracted from a checksum-valid ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RdiMeta {
    pub data_types: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensemble_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<RecordTime>,
}

/// Classify the ensemble whose `0x7F 0x7F` sync starts at `offset`.
///
/// The ensemble header has no checksum of its own: the declared byte count
/// is only checked for consistency with the data-type table, then the
/// trailing byte sum decides validity.
pub fn probe(cursor: ByteCursor<'_>, offset: usize) -> Result<Candidate, CursorError> {
    let remaining = cursor.remaining(offset);
    if remaining < layout::FIXED_HEADER_SIZE {
        return Ok(Candidate::truncated(remaining));
    }

    let ensemble_bytes = cursor.read_u16_le(offset + layout::ENSEMBLE_BYTES_OFFSET)? as usize;
    let data_types = cursor.read_u8(offset + layout::DATA_TYPE_COUNT_OFFSET)? as usize;
    let header_len = layout::DATA_TYPE_OFFSETS_START + 2 * data_types;
    if data_types == 0 || data_types > layout::MAX_DATA_TYPES || ensemble_bytes < header_len {
        let claimed = if ensemble_bytes >= layout::FIXED_HEADER_SIZE {
            ensemble_bytes + layout::CHECKSUM_SIZE
        } else {
            layout::FIXED_HEADER_SIZE
        };
        return Ok(Candidate::invalid(
            claimed.min(remaining),
            Validity::Malformed,
        ));
    }

    let total = ensemble_bytes + layout::CHECKSUM_SIZE;
    if total > remaining {
        return Ok(Candidate::truncated(remaining));
    }

    let span = cursor.read_bytes(offset, ensemble_bytes)?;
    let declared = cursor.read_u16_le(offset + ensemble_bytes)?;
    if !checksum::verify(ChecksumAlgorithm::ByteSum16, span, declared).is_match() {
        return Ok(Candidate::invalid(total, Validity::ChecksumFailed));
    }

    let ensemble = ByteCursor::new(span);
    let meta = match variable_leader(ensemble, data_types)? {
        Some(leader) => RdiMeta {
            data_types: data_types as u8,
            ensemble_number: Some(ensemble_number(ensemble, leader)?),
            time: leader_time(ensemble, leader)?,
        },
        None => RdiMeta {
            data_types: data_types as u8,
            ensemble_number: None,
            time: None,
        },
    };

    Ok(Candidate::valid(
        total,
        header_len,
        ensemble_bytes - header_len,
        FrameMeta::Rdi(meta),
    ))
}

/// Offset of the variable leader within the ensemble, if the data-type
/// table points at one that fits.
fn variable_leader(ensemble: ByteCursor<'_>, data_types: usize) -> Result<Option<usize>, CursorError> {
    for k in 0..data_types {
        let start = ensemble.read_u16_le(layout::DATA_TYPE_OFFSETS_START + 2 * k)? as usize;
        if ensemble.remaining(start) < layout::VL_MIN_LEN {
            continue;
        }
        if ensemble.read_u16_le(start)? == layout::VARIABLE_LEADER_ID {
            return Ok(Some(start));
        }
    }
    Ok(None)
}

fn ensemble_number(ensemble: ByteCursor<'_>, leader: usize) -> Result<u32, CursorError> {
    let low = ensemble.read_u16_le(leader + layout::VL_ENSEMBLE_NUMBER_OFFSET)?;
    let msb = ensemble.read_u8(leader + layout::VL_ENSEMBLE_MSB_OFFSET)?;
    Ok(u32::from(low) | (u32::from(msb) << 16))
}

fn leader_time(ensemble: ByteCursor<'_>, leader: usize) -> Result<Option<RecordTime>, CursorError> {
    let field = |at: usize| ensemble.read_u8(leader + at);
    let two_digit = field(layout::VL_YEAR_OFFSET)?;
    let year = if two_digit < layout::YEAR_PIVOT {
        2000 + i32::from(two_digit)
    } else {
        1900 + i32::from(two_digit)
    };
    Ok(RecordTime::from_fields(
        year,
        field(layout::VL_MONTH_OFFSET)?,
        field(layout::VL_DAY_OFFSET)?,
        field(layout::VL_HOUR_OFFSET)?,
        field(layout::VL_MINUTE_OFFSET)?,
        field(layout::VL_SECOND_OFFSET)?,
        u32::from(field(layout::VL_HUNDREDTHS_OFFSET)?) * 10_000,
    ))
}
