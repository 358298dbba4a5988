//! Flagged-section profiles (SonTek ADP family).
//!
//! A profile opens with `0xA5 0x10 0x50` and an 80-byte header, followed
//! by whichever optional sections (CTD, GPS, bottom track, pulse-coherent)
//! the deployment recorded, the beam-by-cell profile data, and a seeded
//! 16-bit byte sum. Section presence is not encoded in the frame; callers
//! pass it as `SontekSections`.
//!
//! Requesting a section whose sensor the header reports as not installed is
//! a configuration error and fails the call.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::SontekError;
pub use parser::{Section, SontekMeta, SontekSections, probe};
