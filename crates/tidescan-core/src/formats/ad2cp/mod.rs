//! Compact self-describing frames (Nortek AD2CP family).
//!
//! Every frame starts with the sync byte `0xA5` followed by a 10- or 12-byte
//! header that declares the payload size and carries two checksums: one
//! over the header itself and one over the payload. Because the header is
//! independently checksummed, a header that fails validation is never
//! trusted for metadata.
//!
//! Byte offsets live in `layout`; `parser` turns one sync offset into a
//! classified candidate.

pub mod layout;
pub mod parser;

pub use parser::{Ad2cpMeta, probe};
