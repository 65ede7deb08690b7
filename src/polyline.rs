//! Flexible polyline codec.
//!
//! The wire format is a version varint, a header varint (precision,
//! third-dimension kind and third-dimension precision) and then one
//! zig-zag, delta-encoded varint per dimension per point. Each varint is
//! written as 5-bit groups in a 64-character URL-safe alphabet, with bit
//! 0x20 set on every group except the last.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::Coordinate;

const FORMAT_VERSION: u64 = 1;

const ENCODING_TABLE: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Largest shift that still leaves room for a full 5-bit group in a u64.
const MAX_SHIFT: u32 = 55;

/// Highest decimal precision the header can express.
pub const MAX_PRECISION: u8 = 15;

/// Precision used by the routing service for road geometry.
pub const DEFAULT_PRECISION: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed polyline at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },

    #[error("cannot encode polyline: {0}")]
    Unencodable(String),
}

impl CodecError {
    fn malformed(position: usize, reason: &'static str) -> Self {
        CodecError::Malformed { position, reason }
    }
}

/// A decoded route geometry.
///
/// Points are kept in encounter order. The codec does not validate
/// ranges; consumers filter with [`Coordinate::is_valid`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a path from already decoded points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns the points in path order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the path and returns its points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Kind of the optional third value carried by each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThirdDimension {
    Absent,
    Level,
    Altitude,
    Elevation,
    Custom1,
    Custom2,
}

impl ThirdDimension {
    fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(ThirdDimension::Absent),
            1 => Some(ThirdDimension::Level),
            2 => Some(ThirdDimension::Altitude),
            3 => Some(ThirdDimension::Elevation),
            // 4 and 5 are reserved by the format.
            6 => Some(ThirdDimension::Custom1),
            7 => Some(ThirdDimension::Custom2),
            _ => None,
        }
    }

    fn dimensions(self) -> usize {
        match self {
            ThirdDimension::Absent => 2,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Header {
    precision: u8,
    third_dimension: ThirdDimension,
}

/// Decodes a flexible polyline string into coordinates.
///
/// An empty string is an empty path. Third-dimension values are read
/// (they participate in the delta chain) and then discarded.
pub fn decode(encoded: &str) -> Result<Polyline, CodecError> {
    if encoded.is_empty() {
        return Ok(Polyline::default());
    }

    let mut values = UnsignedValues::new(encoded.as_bytes());
    let header = read_header(&mut values)?;
    let dimensions = header.third_dimension.dimensions();
    let factor = 10f64.powi(i32::from(header.precision));

    let mut last = [0i64; 3];
    let mut points = Vec::new();

    while let Some(first) = values.next() {
        let mut deltas = [0u64; 3];
        deltas[0] = first?;
        for delta in deltas.iter_mut().take(dimensions).skip(1) {
            *delta = values
                .next()
                .ok_or_else(|| CodecError::malformed(values.position, "incomplete coordinate tuple"))??;
        }

        for (dim, delta) in deltas.iter().take(dimensions).enumerate() {
            last[dim] = last[dim]
                .checked_add(to_signed(*delta))
                .ok_or_else(|| CodecError::malformed(values.position, "coordinate overflow"))?;
        }

        points.push(Coordinate::new(
            last[0] as f64 / factor,
            last[1] as f64 / factor,
        ));
    }

    Ok(Polyline::new(points))
}

/// Encodes 2-D coordinates with the given decimal precision.
pub fn encode(points: &[Coordinate], precision: u8) -> Result<String, CodecError> {
    if precision > MAX_PRECISION {
        return Err(CodecError::Unencodable(format!(
            "precision {} exceeds {}",
            precision, MAX_PRECISION
        )));
    }

    let factor = 10f64.powi(i32::from(precision));
    let mut out = String::new();
    encode_unsigned(FORMAT_VERSION, &mut out);
    encode_unsigned(u64::from(precision), &mut out);

    let mut last = [0i64; 2];
    for point in points {
        if !point.is_valid() {
            return Err(CodecError::Unencodable(format!(
                "invalid coordinate ({}, {})",
                point.lat, point.lng
            )));
        }
        for (dim, value) in [point.lat, point.lng].into_iter().enumerate() {
            let scaled = (value * factor).round() as i64;
            encode_unsigned(to_unsigned(scaled - last[dim]), &mut out);
            last[dim] = scaled;
        }
    }

    Ok(out)
}

fn read_header(values: &mut UnsignedValues<'_>) -> Result<Header, CodecError> {
    let version = values
        .next()
        .ok_or_else(|| CodecError::malformed(values.position, "missing format version"))??;
    if version != FORMAT_VERSION {
        return Err(CodecError::malformed(0, "unsupported format version"));
    }

    let header = values
        .next()
        .ok_or_else(|| CodecError::malformed(values.position, "missing header"))??;

    let precision = (header & 0x0F) as u8;
    let third_dimension = ThirdDimension::from_code((header >> 4) & 0x07)
        .ok_or_else(|| CodecError::malformed(values.position, "unsupported third dimension"))?;

    Ok(Header {
        precision,
        third_dimension,
    })
}

/// Iterates the raw varints of an encoded string.
struct UnsignedValues<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> UnsignedValues<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }
}

impl Iterator for UnsignedValues<'_> {
    type Item = Result<u64, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.bytes.len() {
            return None;
        }

        let mut result = 0u64;
        let mut shift = 0u32;
        while let Some(&byte) = self.bytes.get(self.position) {
            let value = match decode_char(byte) {
                Some(value) => value,
                None => {
                    let err = CodecError::malformed(self.position, "character outside alphabet");
                    self.position = self.bytes.len();
                    return Some(Err(err));
                }
            };
            self.position += 1;

            result |= u64::from(value & 0x1F) << shift;
            if value & 0x20 == 0 {
                return Some(Ok(result));
            }

            shift += 5;
            if shift > MAX_SHIFT {
                return Some(Err(CodecError::malformed(self.position, "varint too long")));
            }
        }

        Some(Err(CodecError::malformed(self.position, "truncated token")))
    }
}

fn decode_char(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'-' => Some(62),
        b'_' => Some(63),
        _ => None,
    }
}

fn encode_unsigned(mut value: u64, out: &mut String) {
    while value > 0x1F {
        out.push(ENCODING_TABLE[((value & 0x1F) | 0x20) as usize] as char);
        value >>= 5;
    }
    out.push(ENCODING_TABLE[value as usize] as char);
}

fn to_signed(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

fn to_unsigned(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}
