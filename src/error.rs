//! Error and Result types used by this crate, plus a handful of numeric
//! conversions that make the distinction between "this is a bug" and
//! "the file is lying to us" explicit at every narrowing cast.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// An operation that either succeeds or fails, without returning a value.
pub type UnitResult = Result<()>;

/// Deprecated alias kept for readability in places that predate `UnitResult`.
pub type PassiveResult = UnitResult;

pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;

/// Something went wrong while reading or writing an OpenEXR file.
#[derive(Debug)]
pub enum Error {
    /// The byte stream does not start with the OpenEXR magic number.
    NotExr(String),

    /// The file declares a version or feature-bit combination this crate cannot decode.
    UnsupportedVersion(String),

    /// The file is well-formed enough to identify as OpenEXR, but violates the format
    /// (a malformed attribute, an invalid header, an out-of-range value, ...).
    Invalid(String),

    /// The byte stream ended before all the data that the header promised was read.
    Truncated(String),

    /// A chunk offset pointed outside the stream, or a requested block was never written.
    MissingBlock(String),

    /// A compressor could not compress or decompress a block of pixel data.
    Compressor(String),

    /// A value requested from this crate's API that the caller is not allowed to ask for
    /// (for example, a conversion that can never be constructed from the given input).
    NotSupported(String),

    /// The underlying byte stream returned an io error.
    Io(IoError),
}

impl Error {
    /// The file is recognizable as not being an OpenEXR file at all.
    pub fn not_exr(message: impl Into<String>) -> Self {
        Error::NotExr(message.into())
    }

    /// The file requires a version or feature this crate does not implement.
    pub fn unsupported_version(message: impl Into<String>) -> Self {
        Error::UnsupportedVersion(message.into())
    }

    /// The file violates the format in a way that cannot be recovered from.
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid(message.into())
    }

    /// Not enough bytes remained in the stream to satisfy what the header promised.
    pub fn truncated(message: impl Into<String>) -> Self {
        Error::Truncated(message.into())
    }

    /// A block that should exist according to an offset table could not be located.
    pub fn missing_block(message: impl Into<String>) -> Self {
        Error::MissingBlock(message.into())
    }

    /// A compressor failed to produce or consume a valid bitstream.
    pub fn compressor(message: impl Into<String>) -> Self {
        Error::Compressor(message.into())
    }

    /// A requested feature or combination of features is not supported by this crate.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::NotSupported(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotExr(message) => write!(formatter, "not an exr file: {}", message),
            Error::UnsupportedVersion(message) => write!(formatter, "unsupported exr version: {}", message),
            Error::Invalid(message) => write!(formatter, "invalid: {}", message),
            Error::Truncated(message) => write!(formatter, "truncated: {}", message),
            Error::MissingBlock(message) => write!(formatter, "missing block: {}", message),
            Error::Compressor(message) => write!(formatter, "compression error: {}", message),
            Error::NotSupported(message) => write!(formatter, "not supported: {}", message),
            Error::Io(io_error) => write!(formatter, "io error: {}", io_error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(io_error) => Some(io_error),
            _ => None,
        }
    }
}

/// Enable using the `?` operator on `io::Result`.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        // an unexpected end of file while reading a fixed-size value almost always means
        // the file was truncated, which is a much more specific diagnosis than a raw io error
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated(error.to_string())
        }
        else {
            Error::Io(error)
        }
    }
}

/// Convert a `usize` computed in memory (a length, an offset, ...) to `i32` for writing to a file.
/// Panics in debug builds if the value does not fit, as that indicates a bug in this crate
/// rather than a malformed file (files containing such large values are rejected earlier).
pub fn usize_to_i32(value: usize) -> i32 {
    debug_assert!(i32::try_from(value).is_ok(), "value {} does not fit into i32", value);
    value as i32
}

/// Convert an `i32` read from a file to a `usize`, failing if it is negative.
pub fn i32_to_usize(value: i32, error_message: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::invalid(error_message))
}

/// Convert a `usize` to `u16`, failing if the value does not fit.
pub fn usize_to_u16(value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::invalid("value too large for 16 bits"))
}

/// Convert a `u64` read from a file (for example a chunk offset) to a `usize`.
/// Panics in debug builds if this machine cannot address that many bytes.
pub fn u64_to_usize(value: u64) -> usize {
    debug_assert!(usize::try_from(value).is_ok(), "offset {} does not fit into this machine's address space", value);
    value as usize
}

/// Convert a `usize` to `u64`. Always succeeds on any platform this crate supports.
pub fn usize_to_u64(value: usize) -> u64 {
    value as u64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_conversions_roundtrip_in_range() {
        assert_eq!(i32_to_usize(usize_to_i32(1234), "").unwrap(), 1234);
        assert!(i32_to_usize(-1, "negative").is_err());
        assert_eq!(u64_to_usize(usize_to_u64(42)), 42);
        assert!(usize_to_u16(70000).is_err());
    }
}
