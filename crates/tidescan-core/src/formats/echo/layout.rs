pub const CODE_U8: u8 = 1;
pub const CODE_I8: u8 = 2;
pub const CODE_U16: u8 = 3;
pub const CODE_I16: u8 = 4;
pub const CODE_U32: u8 = 5;
pub const CODE_I32: u8 = 6;
pub const CODE_F32: u8 = 7;
pub const CODE_COMPRESSED: u8 = 8;

/// Compressed samples: 4-bit exponent over a 12-bit mantissa.
pub const EXPONENT_SHIFT: u16 = 12;
pub const MANTISSA_MASK: u16 = 0x0FFF;
pub const MANTISSA_HIDDEN_BIT: u64 = 0x1000;
