use std::{fmt, num, path};

use thiserror::Error;

/// Error that happened during parsing 'CMSIS-SVD'
///
/// Only markup that cannot be parsed at all is an error. Missing elements are
/// represented as absent values in the model instead.
#[derive(Error, Debug)]
pub enum SvdParseError {
    #[error("malformed CMSIS-SVD document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),
    #[error("CMSIS-SVD content is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Which SVD property a numeric value was read from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericProp {
    BaseAddress,
    AddressOffset,
    Size,
    ResetValue,
    BitOffset,
    BitWidth,
}

impl fmt::Display for NumericProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            NumericProp::BaseAddress => "baseAddress",
            NumericProp::AddressOffset => "addressOffset",
            NumericProp::Size => "size",
            NumericProp::ResetValue => "resetValue",
            NumericProp::BitOffset => "bitOffset",
            NumericProp::BitWidth => "bitWidth",
        };
        write!(f, "{tag}")
    }
}

/// A value that is used for computation could not be interpreted as a number
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum NumericFormatError {
    #[error("could not parse {prop} from {text:?}")]
    ParseInt {
        prop: NumericProp,
        text: String,
        #[source]
        source: num::ParseIntError,
    },
    #[error("could not parse nonneg int for {prop} from {text:?}")]
    InvalidNonnegInt { prop: NumericProp, text: String },
    #[error("invalid size multiplier suffix: {0}")]
    InvalidSizeMultiplierSuffix(char),
    #[error("{prop} value {text:?} overflows 64 bits")]
    Overflow { prop: NumericProp, text: String },
    #[error("overflow: base address {base:#x} + offset {offset:#x} does not fit in 64 bits")]
    AddrOverflow { base: u64, offset: u64 },
}

/// Error that happened while loading an SVD file from disk
///
/// Keeps "the file could not be read" apart from "the file is not a valid document".
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read SVD file at {}", .path.display())]
    Io {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CMSIS-SVD parse error --> {}", .path.display())]
    Parse {
        path: path::PathBuf,
        #[source]
        source: SvdParseError,
    },
}
