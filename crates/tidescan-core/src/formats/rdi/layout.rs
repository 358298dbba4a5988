pub const SYNC_PATTERN: &[u8] = &[0x7F, 0x7F];

pub const ENSEMBLE_BYTES_OFFSET: usize = 2;
pub const DATA_TYPE_COUNT_OFFSET: usize = 5;
pub const DATA_TYPE_OFFSETS_START: usize = 6;
pub const FIXED_HEADER_SIZE: usize = 6;
pub const CHECKSUM_SIZE: usize = 2;
pub const MAX_DATA_TYPES: usize = 32;

pub const VARIABLE_LEADER_ID: u16 = 0x0080;
pub const VL_ENSEMBLE_NUMBER_OFFSET: usize = 2;
pub const VL_YEAR_OFFSET: usize = 4;
pub const VL_MONTH_OFFSET: usize = 5;
pub const VL_DAY_OFFSET: usize = 6;
pub const VL_HOUR_OFFSET: usize = 7;
pub const VL_MINUTE_OFFSET: usize = 8;
pub const VL_SECOND_OFFSET: usize = 9;
pub const VL_HUNDREDTHS_OFFSET: usize = 10;
pub const VL_ENSEMBLE_MSB_OFFSET: usize = 11;
pub const VL_MIN_LEN: usize = 12;

/// Two-digit years below this pivot belong to the 2000s.
pub const YEAR_PIVOT: u8 = 50;
