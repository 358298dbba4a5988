pub const SYNC_PATTERN: &[u8] = &[0xA5, 0x10, 0x50];
pub const HEADER_SIZE: usize = 80;

pub const SENSORS_OFFSET: usize = 3;
pub const BEAMS_OFFSET: usize = 4;
pub const CELLS_OFFSET: usize = 5;
pub const PINGS_OFFSET: usize = 7;
pub const YEAR_OFFSET: usize = 9;
pub const DAY_OFFSET: usize = 11;
pub const MONTH_OFFSET: usize = 12;
pub const MINUTE_OFFSET: usize = 13;
pub const HOUR_OFFSET: usize = 14;
pub const HUNDREDTHS_OFFSET: usize = 15;
pub const SECOND_OFFSET: usize = 16;
pub const PROFILE_NUMBER_OFFSET: usize = 17;

/// Installed-sensor bits of the byte at `SENSORS_OFFSET`, LSB first.
pub const CTD_SENSOR_BIT: u8 = 0;
pub const GPS_SENSOR_BIT: u8 = 1;
pub const BOTTOM_TRACK_SENSOR_BIT: u8 = 2;
pub const PULSE_COHERENT_SENSOR_BIT: u8 = 3;

/// Optional sections follow the header in this order.
pub const CTD_SECTION_SIZE: usize = 16;
pub const GPS_SECTION_SIZE: usize = 40;
pub const BOTTOM_TRACK_SECTION_SIZE: usize = 18;
pub const PULSE_COHERENT_SECTION_SIZE: usize = 12;

pub const MAX_BEAMS: u8 = 4;
pub const MAX_CELLS: u16 = 512;
/// Velocity (i16), standard deviation (u8) and amplitude (u8).
pub const BYTES_PER_BEAM_CELL: usize = 4;

pub const CHECKSUM_SIZE: usize = 2;
pub const CHECKSUM_SEED: u16 = 0xA596;
