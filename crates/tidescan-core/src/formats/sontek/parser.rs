use serde::Serialize;

use super::error::SontekError;
use super::layout;
use crate::formats::FrameMeta;
use crate::formats::common::checksum::{self, ChecksumAlgorithm};
use crate::formats::common::{BitOrder, ByteCursor, Candidate, CursorError, RecordTime, Validity};

/// Optional sections recorded after each profile header.
///
/// The profile header does not say which sections were recorded, so the
/// caller supplies them from the deployment configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SontekSections {
    pub ctd: bool,
    pub gps: bool,
    pub bottom_track: bool,
    pub pulse_coherent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Ctd,
    Gps,
    BottomTrack,
    PulseCoherent,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Ctd,
        Section::Gps,
        Section::BottomTrack,
        Section::PulseCoherent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Ctd => "ctd",
            Section::Gps => "gps",
            Section::BottomTrack => "bottom_track",
            Section::PulseCoherent => "pulse_coherent",
        }
    }

    pub fn size(self) -> usize {
        match self {
            Section::Ctd => layout::CTD_SECTION_SIZE,
            Section::Gps => layout::GPS_SECTION_SIZE,
            Section::BottomTrack => layout::BOTTOM_TRACK_SECTION_SIZE,
            Section::PulseCoherent => layout::PULSE_COHERENT_SECTION_SIZE,
        }
    }

    fn sensor_bit(self) -> u8 {
        match self {
            Section::Ctd => layout::CTD_SENSOR_BIT,
            Section::Gps => layout::GPS_SENSOR_BIT,
            Section::BottomTrack => layout::BOTTOM_TRACK_SENSOR_BIT,
            Section::PulseCoherent => layout::PULSE_COHERENT_SENSOR_BIT,
        }
    }
}

impl SontekSections {
    pub fn contains(&self, section: Section) -> bool {
        match section {
            Section::Ctd => self.ctd,
            Section::Gps => self.gps,
            Section::BottomTrack => self.bottom_track,
            Section::PulseCoherent => self.pulse_coherent,
        }
    }

    pub fn requested(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL.into_iter().filter(|s| self.contains(*s))
    }

    /// Bytes the requested sections add between header and profile data.
    ///
    /// # Examples
    /// ```
    /// use tidescan_core::SontekSections;
    ///
    /// let sections = SontekSections { ctd: true, gps: true, ..Default::default() };
    /// assert_eq!(sections.size(), 56);
    /// ```
    pub fn size(&self) -> usize {
        self.requested().map(Section::size).sum()
    }
}

/// Header fields of a checksum-valid profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SontekMeta {
    pub beams: u8,
    pub cells: u16,
    pub pings: u16,
    pub profile_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<RecordTime>,
}

/// Classify the profile whose three-byte sync starts at `offset`.
///
/// The frame length is the fixed header plus the caller's sections plus the
/// beam-by-cell profile data and a trailing checksum. A checksum-valid
/// profile whose sensor bits contradict a requested section fails the whole
/// scan: every later frame length would be computed from a wrong layout.
pub fn probe(
    cursor: ByteCursor<'_>,
    offset: usize,
    sections: &SontekSections,
) -> Result<Candidate, SontekError> {
    let remaining = cursor.remaining(offset);
    if remaining < layout::HEADER_SIZE {
        return Ok(Candidate::truncated(remaining));
    }

    let beams = cursor.read_u8(offset + layout::BEAMS_OFFSET)?;
    let cells = cursor.read_u16_le(offset + layout::CELLS_OFFSET)?;
    if beams == 0 || beams > layout::MAX_BEAMS || cells == 0 || cells > layout::MAX_CELLS {
        return Ok(Candidate::invalid(layout::HEADER_SIZE, Validity::Malformed));
    }

    let header_len = layout::HEADER_SIZE + sections.size();
    let profile_len = usize::from(beams) * usize::from(cells) * layout::BYTES_PER_BEAM_CELL;
    let total = header_len + profile_len + layout::CHECKSUM_SIZE;
    if total > remaining {
        return Ok(Candidate::truncated(remaining));
    }

    let span = cursor.read_bytes(offset, total - layout::CHECKSUM_SIZE)?;
    let declared = cursor.read_u16_le(offset + total - layout::CHECKSUM_SIZE)?;
    let algorithm = ChecksumAlgorithm::SeededByteSum16 {
        seed: layout::CHECKSUM_SEED,
    };
    if !checksum::verify(algorithm, span, declared).is_match() {
        return Ok(Candidate::invalid(total, Validity::ChecksumFailed));
    }

    for section in sections.requested() {
        let installed =
            cursor.read_bit(offset + layout::SENSORS_OFFSET, section.sensor_bit(), BitOrder::Lsb0)?;
        if !installed {
            return Err(SontekError::SectionNotInstalled {
                section: section.name(),
                offset,
            });
        }
    }

    let meta = SontekMeta {
        beams,
        cells,
        pings: cursor.read_u16_le(offset + layout::PINGS_OFFSET)?,
        profile_number: cursor.read_u32_le(offset + layout::PROFILE_NUMBER_OFFSET)?,
        time: header_time(cursor, offset)?,
    };

    Ok(Candidate::valid(
        total,
        header_len,
        profile_len,
        FrameMeta::Sontek(meta),
    ))
}

fn header_time(cursor: ByteCursor<'_>, offset: usize) -> Result<Option<RecordTime>, CursorError> {
    let field = |at: usize| cursor.read_u8(offset + at);
    let year = cursor.read_u16_le(offset + layout::YEAR_OFFSET)?;
    Ok(RecordTime::from_fields(
        i32::from(year),
        field(layout::MONTH_OFFSET)?,
        field(layout::DAY_OFFSET)?,
        field(layout::HOUR_OFFSET)?,
        field(layout::MINUTE_OFFSET)?,
        field(layout::SECOND_OFFSET)?,
        u32::from(field(layout::HUNDREDTHS_OFFSET)?) * 10_000,
    ))
}
