use serde::Serialize;

use super::error::{ConfigError, ScanError};
use super::index::RecordIndexEntry;
use super::{ScanOptions, locate};
use crate::formats::FormatTag;
use crate::formats::common::{ByteCursor, RecordTime};
use crate::formats::echo::{DecodedPing, PingParams, decode_ping};

/// A decoded ping together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingRecord {
    pub logical_index: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<RecordTime>,
    pub ping: DecodedPing,
}

/// Decode the payload of one located record as a ping.
///
/// # Errors
/// `ConfigError::RecordNotValid` for entries that failed validation and
/// `ConfigError::Ping` when the payload disagrees with `params`.
pub fn decode_ping_record(
    bytes: &[u8],
    entry: &RecordIndexEntry,
    params: &PingParams,
) -> Result<DecodedPing, ScanError> {
    if !entry.validity.is_valid() {
        return Err(ConfigError::RecordNotValid {
            offset: entry.offset,
            validity: entry.validity,
        }
        .into());
    }
    let payload = ByteCursor::new(bytes).read_bytes(entry.payload_offset(), entry.payload_len)?;
    Ok(decode_ping(payload, params)?)
}

/// Locate records, apply the selection and decode each selected payload.
///
/// The parameters are checked before scanning, so an impossible
/// configuration fails even on a source without records.
///
/// # Errors
/// As [`locate`], plus any [`decode_ping_record`] failure.
pub fn decode_pings(
    bytes: &[u8],
    format: FormatTag,
    options: &ScanOptions,
    params: &PingParams,
) -> Result<Vec<PingRecord>, ScanError> {
    params.expected_len()?;
    let located = locate(bytes, format, options)?;
    let valid: Vec<&RecordIndexEntry> = located.index.valid_entries().collect();

    let pings = options
        .selection
        .apply(&valid)
        .into_iter()
        .map(|(logical_index, entry)| -> Result<PingRecord, ScanError> {
            Ok(PingRecord {
                logical_index,
                offset: entry.offset,
                time: entry.time(),
                ping: decode_ping_record(bytes, entry, params)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(format = %format, pings = pings.len(), "pings decoded");
    Ok(pings)
}
