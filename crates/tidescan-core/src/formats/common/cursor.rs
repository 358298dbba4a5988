use thiserror::Error;

/// Errors returned by bounded byte access.
///
/// An `OutOfRange` error means offset bookkeeping went wrong somewhere in a
/// locator; bad input data never produces one.
///
/// # Examples
/// ```
/// use tidescan_core::{ByteCursor, CursorError};
///
/// let cursor = ByteCursor::new(&[1, 2, 3]);
/// let err = cursor.read_bytes(2, 4).unwrap_err();
/// assert!(matches!(err, CursorError::OutOfRange { offset: 2, count: 4, len: 3 }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("read of {count} bytes at offset {offset} exceeds source length {len}")]
    OutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },
    #[error("bit index {bit} is outside 0..=7")]
    InvalidBit { bit: u8 },
}

/// Numbering convention for bits within a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Bit 0 is the least significant bit.
    Lsb0,
    /// Bit 0 is the most significant bit.
    Msb0,
}

/// Bounded, non-owning view over a byte buffer.
///
/// All reads are random access and leave the cursor untouched, so one cursor
/// can be copied freely and shared between threads.
///
/// # Examples
/// ```
/// use tidescan_core::{BitOrder, ByteCursor};
///
/// let cursor = ByteCursor::new(&[0x34, 0x12, 0b0000_0100]);
/// assert_eq!(cursor.read_u16_le(0).unwrap(), 0x1234);
/// assert!(cursor.read_bit(2, 2, BitOrder::Lsb0).unwrap());
/// assert!(cursor.read_bit(2, 5, BitOrder::Msb0).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes available from `offset` to the end of the buffer.
    pub fn remaining(&self, offset: usize) -> usize {
        self.bytes.len().saturating_sub(offset)
    }

    pub fn read_bytes(&self, offset: usize, count: usize) -> Result<&'a [u8], CursorError> {
        let out_of_range = CursorError::OutOfRange {
            offset,
            count,
            len: self.bytes.len(),
        };
        let end = offset.checked_add(count).ok_or(out_of_range.clone())?;
        self.bytes.get(offset..end).ok_or(out_of_range)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, CursorError> {
        Ok(self.read_array::<1>(offset)?[0])
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, CursorError> {
        Ok(u16::from_le_bytes(self.read_array(offset)?))
    }

    pub fn read_u32_le(&self, offset: usize) -> Result<u32, CursorError> {
        Ok(u32::from_le_bytes(self.read_array(offset)?))
    }

    pub fn read_bit(&self, offset: usize, bit: u8, order: BitOrder) -> Result<bool, CursorError> {
        if bit > 7 {
            return Err(CursorError::InvalidBit { bit });
        }
        let byte = self.read_u8(offset)?;
        let shift = match order {
            BitOrder::Lsb0 => bit,
            BitOrder::Msb0 => 7 - bit,
        };
        Ok((byte >> shift) & 1 == 1)
    }

    /// Offset of the next occurrence of `pattern` at or after `from`.
    pub fn find(&self, from: usize, pattern: &[u8]) -> Option<usize> {
        let (first, rest) = pattern.split_first()?;
        let mut pos = from;
        while pos < self.bytes.len() {
            let hit = pos + self.bytes[pos..].iter().position(|b| b == first)?;
            let tail = &self.bytes[hit + 1..];
            if tail.len() >= rest.len() && tail[..rest.len()] == *rest {
                return Some(hit);
            }
            pos = hit + 1;
        }
        None
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], CursorError> {
        let bytes = self.read_bytes(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
