//! Common structures of the Compact Font Format.

use std::fmt;

pub mod charset;
pub mod charstring;
pub mod dict;
mod fd_select;
mod index;
mod stack;
mod string;

pub use charset::{Charset, CharsetIter};
pub use fd_select::FdSelect;
pub use index::Index;
pub use stack::{Number, Stack};
pub use string::{Latin1String, StringId, STANDARD_STRINGS};

use crate::ReadError;

/// Errors that are specific to PostScript processing.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The `off_size` field in an INDEX contained an invalid value.
    InvalidIndexOffsetSize(u8),
    /// An INDEX contained a zero offset.
    ZeroOffsetInIndex,
    /// Too many operands were pushed.
    StackOverflow,
    /// An operator required more operands than were available.
    StackUnderflow,
    /// An operand was accessed outside of the stack.
    InvalidStackAccess(usize),
    /// An integer operand was expected but a real number was found.
    ExpectedI32StackEntry(usize),
    /// A number in a DICT or charstring could not be decoded.
    InvalidNumber,
    /// A DICT contained an unknown operator.
    InvalidDictOperator(u8),
    /// A charstring contained an unknown operator.
    InvalidCharstringOperator(u8),
    /// Subroutine calls were nested too deeply.
    CharstringNestingDepthLimitExceeded,
    /// A `callsubr` was found but the private DICT has no subroutines.
    MissingSubroutines,
    /// A biased subroutine index was outside of the subroutine INDEX.
    InvalidSubroutineIndex(i32),
    /// The top DICT did not contain a CharStrings offset.
    MissingCharstrings,
    /// A font DICT did not contain a private DICT.
    MissingPrivateDict,
    /// The glyph identifier was outside of the CharStrings INDEX.
    InvalidGlyphIndex(u32),
    /// Underlying parsing error.
    Read(ReadError),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndexOffsetSize(size) => {
                write!(f, "invalid offset size of {size} for INDEX (expected 1-4)")
            }
            Self::ZeroOffsetInIndex => {
                write!(f, "invalid offset of 0 in INDEX (must be >= 1)")
            }
            Self::StackOverflow => write!(f, "operand stack overflow"),
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::InvalidStackAccess(index) => {
                write!(f, "attempted to access an operand at index {index}")
            }
            Self::ExpectedI32StackEntry(index) => {
                write!(f, "operand at index {index} was not an integer")
            }
            Self::InvalidNumber => write!(f, "number is in an invalid format"),
            Self::InvalidDictOperator(op) => write!(f, "dict operator {op} is invalid"),
            Self::InvalidCharstringOperator(op) => {
                write!(f, "charstring operator {op} is invalid")
            }
            Self::CharstringNestingDepthLimitExceeded => write!(
                f,
                "exceeded subroutine nesting depth limit {} while evaluating a charstring",
                charstring::NESTING_DEPTH_LIMIT
            ),
            Self::MissingSubroutines => {
                write!(f, "encountered a callsubr operator but no subroutine index was provided")
            }
            Self::InvalidSubroutineIndex(index) => {
                write!(f, "subroutine index {index} is out of bounds")
            }
            Self::MissingCharstrings => write!(f, "the top DICT has no CharStrings offset"),
            Self::MissingPrivateDict => write!(f, "no private DICT was found"),
            Self::InvalidGlyphIndex(gid) => write!(f, "glyph {gid} has no charstring"),
            Self::Read(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
