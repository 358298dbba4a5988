//! Building blocks shared by every instrument family: bounded byte access,
//! checksums, frame classification and embedded clock readings.

pub mod checksum;
pub mod clock;
pub mod cursor;
pub mod frame;

pub use checksum::{ChecksumAlgorithm, ChecksumOutcome};
pub use clock::RecordTime;
pub use cursor::{BitOrder, ByteCursor, CursorError};
pub use frame::{Candidate, Validity};
