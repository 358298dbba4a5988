//! Single-ping echo-sounder payloads (BioSonics family).
//!
//! A ping payload is `channels` consecutive arrays of `samples_per_ping`
//! little-endian samples. The layout is not self-describing: channel count,
//! samples per ping and sample type come from the instrument configuration,
//! and a payload whose size disagrees with them is rejected.

pub mod error;
pub mod layout;
pub mod parser;

pub use error::PingError;
pub use parser::{DecodedPing, PingParams, SampleType, Samples, decode_ping, expand_compressed};
