pub const SYNC: u8 = 0xA5;
pub const SYNC_PATTERN: &[u8] = &[SYNC];

pub const HEADER_SIZE_OFFSET: usize = 1;
pub const SERIES_ID_OFFSET: usize = 2;
pub const FAMILY_OFFSET: usize = 3;
pub const DATA_SIZE_OFFSET: usize = 4;

pub const SHORT_HEADER_SIZE: usize = 10;
pub const LONG_HEADER_SIZE: usize = 12;

/// Both checksums sit at the end of the header, data checksum first.
pub const DATA_CHECKSUM_FROM_END: usize = 4;
pub const HEADER_CHECKSUM_FROM_END: usize = 2;

/// Series ids whose payload starts with the common measurement preamble.
pub const MEASUREMENT_SERIES: std::ops::RangeInclusive<u8> = 0x15..=0x1F;

pub const TIME_YEAR_OFFSET: usize = 8;
pub const TIME_MONTH_OFFSET: usize = 9;
pub const TIME_DAY_OFFSET: usize = 10;
pub const TIME_HOUR_OFFSET: usize = 11;
pub const TIME_MINUTE_OFFSET: usize = 12;
pub const TIME_SECOND_OFFSET: usize = 13;
pub const TIME_HUNDRED_MICROS_OFFSET: usize = 14;
pub const TIME_MIN_PAYLOAD: usize = 16;
pub const YEAR_BASE: i32 = 1900;
