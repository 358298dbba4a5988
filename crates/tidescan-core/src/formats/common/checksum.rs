/// Integrity functions used by the supported instrument families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// Sum of little-endian 16-bit words seeded with `0xB58C`; an odd
    /// trailing byte counts as the high byte of a final word.
    NortekWordSum,
    /// Unsigned sum of all bytes, modulo 2^16.
    ByteSum16,
    /// Unsigned sum of all bytes starting from `seed`, modulo 2^16.
    SeededByteSum16 { seed: u16 },
}

pub const NORTEK_SEED: u16 = 0xB58C;

/// Result of comparing a recomputed checksum with the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumOutcome {
    Match,
    Mismatch { computed: u16, declared: u16 },
}

impl ChecksumOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ChecksumOutcome::Match)
    }
}

pub fn compute(algorithm: ChecksumAlgorithm, span: &[u8]) -> u16 {
    match algorithm {
        ChecksumAlgorithm::NortekWordSum => {
            let mut words = span.chunks_exact(2);
            let mut sum = words.by_ref().fold(NORTEK_SEED, |acc, w| {
                acc.wrapping_add(u16::from_le_bytes([w[0], w[1]]))
            });
            if let [last] = words.remainder() {
                sum = sum.wrapping_add(u16::from(*last) << 8);
            }
            sum
        }
        ChecksumAlgorithm::ByteSum16 => byte_sum(0, span),
        ChecksumAlgorithm::SeededByteSum16 { seed } => byte_sum(seed, span),
    }
}

/// Recompute the checksum over `span` and compare with `declared`.
///
/// # Examples
/// ```
/// use tidescan_core::{ChecksumAlgorithm, ChecksumOutcome, verify_checksum};
///
/// let span = [1u8, 2, 3];
/// assert_eq!(verify_checksum(ChecksumAlgorithm::ByteSum16, &span, 6), ChecksumOutcome::Match);
/// assert!(!verify_checksum(ChecksumAlgorithm::ByteSum16, &span, 7).is_match());
/// ```
pub fn verify(algorithm: ChecksumAlgorithm, span: &[u8], declared: u16) -> ChecksumOutcome {
    let computed = compute(algorithm, span);
    if computed == declared {
        ChecksumOutcome::Match
    } else {
        ChecksumOutcome::Mismatch { computed, declared }
    }
}

fn byte_sum(seed: u16, span: &[u8]) -> u16 {
    span.iter()
        .fold(seed, |acc, b| acc.wrapping_add(u16::from(*b)))
}
