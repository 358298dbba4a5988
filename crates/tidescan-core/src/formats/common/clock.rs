use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Instrument clock reading embedded in a frame header.
///
/// Instruments record local clock fields without a zone; they are treated
/// as UTC and serialized as RFC3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordTime(PrimitiveDateTime);

impl RecordTime {
    /// Build from calendar fields; `None` when any field is out of range.
    ///
    /// # Examples
    /// ```
    /// use tidescan_core::RecordTime;
    ///
    /// let t = RecordTime::from_fields(2024, 5, 17, 12, 30, 5, 250_000).unwrap();
    /// assert_eq!(t.to_rfc3339(), "2024-05-17T12:30:05.25Z");
    /// assert!(RecordTime::from_fields(2024, 13, 1, 0, 0, 0, 0).is_none());
    /// ```
    pub fn from_fields(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        microsecond: u32,
    ) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        let date = Date::from_calendar_date(year, month, day).ok()?;
        let time = Time::from_hms_micro(hour, minute, second, microsecond).ok()?;
        Some(Self(PrimitiveDateTime::new(date, time)))
    }

    pub fn to_offset(self) -> OffsetDateTime {
        self.0.assume_utc()
    }

    pub fn to_rfc3339(self) -> String {
        self.to_offset()
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.to_string())
    }
}

impl Serialize for RecordTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}
