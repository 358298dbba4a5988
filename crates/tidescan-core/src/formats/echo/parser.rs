use serde::Serialize;

use super::error::PingError;
use super::layout;

/// Wire representation of one echo sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    /// 16-bit word with a 4-bit exponent and 12-bit mantissa.
    Compressed,
}

impl SampleType {
    pub fn code(self) -> u8 {
        match self {
            SampleType::U8 => layout::CODE_U8,
            SampleType::I8 => layout::CODE_I8,
            SampleType::U16 => layout::CODE_U16,
            SampleType::I16 => layout::CODE_I16,
            SampleType::U32 => layout::CODE_U32,
            SampleType::I32 => layout::CODE_I32,
            SampleType::F32 => layout::CODE_F32,
            SampleType::Compressed => layout::CODE_COMPRESSED,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 | SampleType::Compressed => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
        }
    }
}

impl TryFrom<u8> for SampleType {
    type Error = PingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            layout::CODE_U8 => Ok(SampleType::U8),
            layout::CODE_I8 => Ok(SampleType::I8),
            layout::CODE_U16 => Ok(SampleType::U16),
            layout::CODE_I16 => Ok(SampleType::I16),
            layout::CODE_U32 => Ok(SampleType::U32),
            layout::CODE_I32 => Ok(SampleType::I32),
            layout::CODE_F32 => Ok(SampleType::F32),
            layout::CODE_COMPRESSED => Ok(SampleType::Compressed),
            _ => Err(PingError::UnknownSampleType { code }),
        }
    }
}

/// Instrument configuration needed to interpret a ping payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingParams {
    pub channels: usize,
    pub samples_per_ping: usize,
    pub sample_type: SampleType,
}

impl PingParams {
    /// Build from raw integers as they come from a deployment description.
    pub fn from_codes(
        channels: usize,
        samples_per_ping: usize,
        sample_type_code: u8,
    ) -> Result<Self, PingError> {
        Ok(Self {
            channels,
            samples_per_ping,
            sample_type: SampleType::try_from(sample_type_code)?,
        })
    }

    /// Payload size these parameters describe.
    pub fn expected_len(&self) -> Result<usize, PingError> {
        if self.channels == 0 {
            return Err(PingError::ZeroDimension { name: "channels" });
        }
        if self.samples_per_ping == 0 {
            return Err(PingError::ZeroDimension {
                name: "samples_per_ping",
            });
        }
        self.channels
            .checked_mul(self.samples_per_ping)
            .and_then(|n| n.checked_mul(self.sample_type.bytes_per_sample()))
            .ok_or(PingError::Overflow)
    }
}

/// Samples of one channel, typed by the wire sample type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum Samples {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    /// Expanded compressed samples.
    F64(Vec<f64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::I8(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::I16(v) => v.len(),
            Samples::U32(v) => v.len(),
            Samples::I32(v) => v.len(),
            Samples::F32(v) => v.len(),
            Samples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One decoded ping: a sample array per channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPing {
    pub channel_count: usize,
    pub samples_per_ping: usize,
    pub sample_type: SampleType,
    pub channels: Vec<Samples>,
}

/// Reinterpret `payload` as `channels` consecutive arrays of
/// `samples_per_ping` little-endian samples.
///
/// # Examples
/// ```
/// use tidescan_core::{PingParams, SampleType, Samples, decode_ping};
///
/// let params = PingParams { channels: 2, samples_per_ping: 2, sample_type: SampleType::I16 };
/// let payload = [1, 0, 0xff, 0xff, 2, 0, 3, 0];
/// let ping = decode_ping(&payload, &params)?;
/// assert_eq!(ping.channels[0], Samples::I16(vec![1, -1]));
/// assert_eq!(ping.channels[1], Samples::I16(vec![2, 3]));
/// # Ok::<(), tidescan_core::PingError>(())
/// ```
///
/// # Errors
/// `PingError::PayloadLength` when the payload is not exactly
/// `channels × samples_per_ping × bytes_per_sample` long, and
/// `PingError::ZeroDimension` for empty dimensions.
pub fn decode_ping(payload: &[u8], params: &PingParams) -> Result<DecodedPing, PingError> {
    let expected = params.expected_len()?;
    if payload.len() != expected {
        return Err(PingError::PayloadLength {
            expected,
            actual: payload.len(),
        });
    }

    let channel_len = expected / params.channels;
    let channels = payload
        .chunks_exact(channel_len)
        .map(|chunk| decode_channel(chunk, params.sample_type))
        .collect();

    Ok(DecodedPing {
        channel_count: params.channels,
        samples_per_ping: params.samples_per_ping,
        sample_type: params.sample_type,
        channels,
    })
}

fn decode_channel(bytes: &[u8], sample_type: SampleType) -> Samples {
    match sample_type {
        SampleType::U8 => Samples::U8(bytes.to_vec()),
        SampleType::I8 => Samples::I8(bytes.iter().map(|b| *b as i8).collect()),
        SampleType::U16 => Samples::U16(words(bytes).collect()),
        SampleType::I16 => Samples::I16(words(bytes).map(|w| w as i16).collect()),
        SampleType::U32 => Samples::U32(dwords(bytes).collect()),
        SampleType::I32 => Samples::I32(dwords(bytes).map(|d| d as i32).collect()),
        SampleType::F32 => Samples::F32(dwords(bytes).map(f32::from_bits).collect()),
        SampleType::Compressed => Samples::F64(words(bytes).map(expand_compressed).collect()),
    }
}

fn words(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
}

fn dwords(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
}

/// Expand a compressed sample word to its linear value.
///
/// # Examples
/// ```
/// use tidescan_core::expand_compressed;
///
/// assert_eq!(expand_compressed(0x0123), 291.0);
/// assert_eq!(expand_compressed(0x1000), 4096.0);
/// assert_eq!(expand_compressed(0x2001), 8194.0);
/// ```
pub fn expand_compressed(word: u16) -> f64 {
    let exponent = word >> layout::EXPONENT_SHIFT;
    let mantissa = u64::from(word & layout::MANTISSA_MASK);
    if exponent == 0 {
        mantissa as f64
    } else {
        ((mantissa + layout::MANTISSA_HIDDEN_BIT) << (exponent - 1)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{PingParams, SampleType, Samples, decode_ping, expand_compressed};
    use crate::formats::echo::error::PingError;

    fn params(channels: usize, samples: usize, sample_type: SampleType) -> PingParams {
        PingParams {
            channels,
            samples_per_ping: samples,
            sample_type,
        }
    }

    #[test]
    fn two_channels_of_four_int16_samples() {
        let payload: Vec<u8> = (0i16..8).flat_map(|v| (v - 4).to_le_bytes()).collect();
        assert_eq!(payload.len(), 16);
        let ping = decode_ping(&payload, &params(2, 4, SampleType::I16)).unwrap();
        assert_eq!(ping.channel_count, 2);
        assert_eq!(ping.channels.len(), 2);
        assert_eq!(ping.channels[0], Samples::I16(vec![-4, -3, -2, -1]));
        assert_eq!(ping.channels[1], Samples::I16(vec![0, 1, 2, 3]));
    }

    #[test]
    fn payload_one_byte_short_is_rejected() {
        let payload = vec![0u8; 15];
        let err = decode_ping(&payload, &params(2, 4, SampleType::I16)).unwrap_err();
        assert_eq!(
            err,
            PingError::PayloadLength {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = decode_ping(&[], &params(0, 4, SampleType::U8)).unwrap_err();
        assert_eq!(err, PingError::ZeroDimension { name: "channels" });
        let err = decode_ping(&[], &params(1, 0, SampleType::U8)).unwrap_err();
        assert_eq!(
            err,
            PingError::ZeroDimension {
                name: "samples_per_ping"
            }
        );
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = decode_ping(&[], &params(usize::MAX, 2, SampleType::U8)).unwrap_err();
        assert_eq!(err, PingError::Overflow);
    }

    #[test]
    fn sample_type_codes_round_trip() {
        for code in 1..=8u8 {
            let sample_type = SampleType::try_from(code).unwrap();
            assert_eq!(sample_type.code(), code);
        }
        assert_eq!(
            SampleType::try_from(9).unwrap_err(),
            PingError::UnknownSampleType { code: 9 }
        );
        assert!(PingParams::from_codes(1, 1, 0).is_err());
    }

    #[test]
    fn signedness_follows_sample_type() {
        let payload = [0xff, 0xff, 0xff, 0xff];
        let unsigned = decode_ping(&payload, &params(1, 1, SampleType::U32)).unwrap();
        assert_eq!(unsigned.channels[0], Samples::U32(vec![u32::MAX]));
        let signed = decode_ping(&payload, &params(1, 1, SampleType::I32)).unwrap();
        assert_eq!(signed.channels[0], Samples::I32(vec![-1]));
        let bytes = decode_ping(&payload, &params(2, 2, SampleType::I8)).unwrap();
        assert_eq!(bytes.channels[1], Samples::I8(vec![-1, -1]));
    }

    #[test]
    fn float_samples() {
        let payload: Vec<u8> = [1.5f32, -2.25].iter().flat_map(|v| v.to_le_bytes()).collect();
        let ping = decode_ping(&payload, &params(1, 2, SampleType::F32)).unwrap();
        assert_eq!(ping.channels[0], Samples::F32(vec![1.5, -2.25]));
    }

    #[test]
    fn compressed_samples_expand() {
        assert_eq!(expand_compressed(0x0000), 0.0);
        assert_eq!(expand_compressed(0x0fff), 4095.0);
        assert_eq!(expand_compressed(0x1fff), 8191.0);
        assert_eq!(expand_compressed(0xffff), (8191u64 << 14) as f64);

        let payload = [0x23, 0x01, 0x01, 0x20];
        let ping = decode_ping(&payload, &params(1, 2, SampleType::Compressed)).unwrap();
        assert_eq!(ping.channels[0], Samples::F64(vec![291.0, 8194.0]));
    }
}
