use serde::Serialize;

use super::layout;
use crate::formats::FrameMeta;
use crate::formats::common::checksum::{self, ChecksumAlgorithm};
use crate::formats::common::{ByteCursor, Candidate, CursorError, RecordTime, Validity};

/// Header fields of a compact frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ad2cpMeta {
    pub series_id: u8,
    pub family: u8,
    pub header_size: u8,
    pub data_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<RecordTime>,
}

/// Classify the compact frame whose sync byte sits at `offset`.
///
/// The header carries its own checksum, so a header that fails it yields a
/// `ChecksumFailed` candidate without metadata; its declared length is only
/// used to bound the span of bytes it claims.
pub fn probe(cursor: ByteCursor<'_>, offset: usize) -> Result<Candidate, CursorError> {
    let remaining = cursor.remaining(offset);
    if remaining < layout::SHORT_HEADER_SIZE {
        return Ok(Candidate::truncated(remaining));
    }

    let header_size = cursor.read_u8(offset + layout::HEADER_SIZE_OFFSET)? as usize;
    if header_size != layout::SHORT_HEADER_SIZE && header_size != layout::LONG_HEADER_SIZE {
        return Ok(Candidate::invalid(
            layout::SHORT_HEADER_SIZE,
            Validity::Malformed,
        ));
    }
    if remaining < header_size {
        return Ok(Candidate::truncated(remaining));
    }

    let header = cursor.read_bytes(offset, header_size)?;
    let data_size = if header_size == layout::LONG_HEADER_SIZE {
        cursor.read_u32_le(offset + layout::DATA_SIZE_OFFSET)?
    } else {
        u32::from(cursor.read_u16_le(offset + layout::DATA_SIZE_OFFSET)?)
    };
    let declared_len = header_size.saturating_add(data_size as usize);

    let header_checksum =
        cursor.read_u16_le(offset + header_size - layout::HEADER_CHECKSUM_FROM_END)?;
    let header_span = &header[..header_size - layout::HEADER_CHECKSUM_FROM_END];
    if !checksum::verify(ChecksumAlgorithm::NortekWordSum, header_span, header_checksum).is_match()
    {
        return Ok(Candidate::invalid(
            declared_len.min(remaining),
            Validity::ChecksumFailed,
        ));
    }

    let mut meta = Ad2cpMeta {
        series_id: cursor.read_u8(offset + layout::SERIES_ID_OFFSET)?,
        family: cursor.read_u8(offset + layout::FAMILY_OFFSET)?,
        header_size: header_size as u8,
        data_size,
        time: None,
    };

    if declared_len > remaining {
        return Ok(Candidate {
            length: remaining,
            header_len: header_size,
            payload_len: remaining - header_size,
            meta: Some(FrameMeta::Ad2cp(meta)),
            validity: Validity::Truncated,
        });
    }

    let payload = cursor.read_bytes(offset + header_size, data_size as usize)?;
    meta.time = payload_time(meta.series_id, payload);

    let data_checksum = cursor.read_u16_le(offset + header_size - layout::DATA_CHECKSUM_FROM_END)?;
    let validity =
        if checksum::verify(ChecksumAlgorithm::NortekWordSum, payload, data_checksum).is_match() {
            Validity::Valid
        } else {
            Validity::ChecksumFailed
        };

    Ok(Candidate {
        length: declared_len,
        header_len: header_size,
        payload_len: payload.len(),
        meta: Some(FrameMeta::Ad2cp(meta)),
        validity,
    })
}

fn payload_time(series_id: u8, payload: &[u8]) -> Option<RecordTime> {
    if !layout::MEASUREMENT_SERIES.contains(&series_id) || payload.len() < layout::TIME_MIN_PAYLOAD
    {
        return None;
    }
    let reader = ByteCursor::new(payload);
    let year = layout::YEAR_BASE + i32::from(reader.read_u8(layout::TIME_YEAR_OFFSET).ok()?);
    // Months are stored zero-based.
    let month = reader.read_u8(layout::TIME_MONTH_OFFSET).ok()?.checked_add(1)?;
    let hundred_micros = reader.read_u16_le(layout::TIME_HUNDRED_MICROS_OFFSET).ok()?;
    RecordTime::from_fields(
        year,
        month,
        reader.read_u8(layout::TIME_DAY_OFFSET).ok()?,
        reader.read_u8(layout::TIME_HOUR_OFFSET).ok()?,
        reader.read_u8(layout::TIME_MINUTE_OFFSET).ok()?,
        reader.read_u8(layout::TIME_SECOND_OFFSET).ok()?,
        u32::from(hundred_micros) * 100,
    )
}
