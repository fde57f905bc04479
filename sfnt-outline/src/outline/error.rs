//! Errors produced when drawing outlines.

use core::fmt;

use raw::types::GlyphId;

pub use raw::{tables::postscript::Error as CffError, ReadError};

pub use super::path::ToPathError;

/// Errors that may occur when drawing glyphs.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawError {
    /// The font has neither `glyf` nor `CFF` outlines.
    NoSources,
    /// The glyph identifier is out of range.
    GlyphNotFound(GlyphId),
    /// Composite glyphs nest deeper than
    /// [`GLYF_COMPOSITE_RECURSION_LIMIT`](crate::GLYF_COMPOSITE_RECURSION_LIMIT)
    /// or load more than
    /// [`GLYF_COMPONENT_LOAD_LIMIT`](crate::GLYF_COMPONENT_LOAD_LIMIT)
    /// components, or CFF subroutine calls nest too deeply.
    ///
    /// Components that reference themselves also end up here.
    RecursionLimitExceeded(GlyphId),
    /// A point anchored component names a point that doesn't exist.
    InvalidAnchorPoint(GlyphId, u16),
    /// The glyph has more points than fit in a 16-bit index.
    TooManyPoints(GlyphId),
    /// Error while evaluating a CFF charstring.
    PostScript(CffError),
    /// The contour end points are inconsistent with the point data.
    ToPath(ToPathError),
    /// Error while reading font data.
    Read(ReadError),
}

impl From<ReadError> for DrawError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

impl From<CffError> for DrawError {
    fn from(e: CffError) -> Self {
        Self::PostScript(e)
    }
}

impl From<ToPathError> for DrawError {
    fn from(e: ToPathError) -> Self {
        Self::ToPath(e)
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources => write!(f, "the font has no glyph outlines"),
            Self::GlyphNotFound(gid) => write!(f, "glyph {gid} was not found in the font"),
            Self::RecursionLimitExceeded(gid) => {
                write!(f, "recursion limit exceeded when loading glyph {gid}")
            }
            Self::InvalidAnchorPoint(gid, index) => write!(
                f,
                "invalid anchor point index ({index}) for composite glyph {gid}"
            ),
            Self::TooManyPoints(gid) => write!(f, "glyph {gid} has too many points"),
            Self::PostScript(e) => write!(f, "{e}"),
            Self::ToPath(e) => write!(f, "{e}"),
            Self::Read(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DrawError {}
