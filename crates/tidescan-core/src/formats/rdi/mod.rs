//! Fixed-sync ensembles (Teledyne RDI family).
//!
//! An ensemble opens with `0x7F 0x7F`, declares its byte count (checksum
//! excluded) and a table of data-type offsets, and ends with a 16-bit byte
//! sum. Timestamps and ensemble numbers come from the variable leader
//! (`0x0080`) when the table points at one.

pub mod layout;
pub mod parser;

pub use parser::{RdiMeta, probe};
