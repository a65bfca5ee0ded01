// SPDX-License-Identifier: GPL-3.0-or-later
use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Errors produced by the segmentation engine and its PPM I/O collaborator.
///
/// There are no recoverable error conditions inside the engine itself: every
/// variant here is structural (bad input, exhausted resources, or a failure
/// reported by the I/O layer) and is meant to be surfaced to the caller, not
/// papered over.
pub enum Error {
    /// A frame's header or pixel payload disagreed with the engine's
    /// configured dimensions (or declared a max channel value other than
    /// 255). The engine's state is left untouched.
    InputRejected(InputRejection),

    /// Allocating the sample model or frame buffers failed, or the engine
    /// was constructed with parameters that can never produce a valid model
    /// (zero samples, an out-of-range threshold, and so on).
    ResourceExhaustion(String),

    /// The external I/O collaborator (the PPM reader/writer) failed.
    DriverIoError(io::Error),
}

/// The specific reason a frame was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    /// The PPM magic number wasn't `P3`.
    BadMagicNumber(String),
    /// Declared width/height didn't match the engine's configuration.
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Declared max channel value wasn't 255.
    MaxValueMismatch { found: u32 },
    /// The pixel payload ended before width*height*3 samples were read.
    TruncatedPayload { expected: usize, found: usize },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InputRejected(r) => f.debug_tuple("InputRejected").field(r).finish(),
            Self::ResourceExhaustion(msg) => {
                f.debug_tuple("ResourceExhaustion").field(msg).finish()
            }
            Self::DriverIoError(e) => f.debug_tuple("DriverIoError").field(e).finish(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InputRejected(reason) => write!(f, "frame rejected: {}", reason),
            Self::ResourceExhaustion(msg) => write!(f, "could not allocate engine state: {}", msg),
            Self::DriverIoError(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for InputRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BadMagicNumber(found) => {
                write!(f, "expected PPM magic number 'P3', found {:?}", found)
            }
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "expected {}x{} frame, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::MaxValueMismatch { found } => {
                write!(f, "expected a max channel value of 255, found {}", found)
            }
            Self::TruncatedPayload { expected, found } => write!(
                f,
                "expected {} sample values, payload only had {}",
                expected, found
            ),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::DriverIoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::DriverIoError(e)
    }
}

impl From<InputRejection> for Error {
    fn from(reason: InputRejection) -> Self {
        Self::InputRejected(reason)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
