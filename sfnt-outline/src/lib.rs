//! Metadata and glyph outlines for TrueType and OpenType fonts.
//!
//! This crate sits on top of the table parsers in [`raw`] and exposes the
//! pieces of a font that a text renderer needs: character mapping, naming,
//! classification attributes, global and per glyph metrics, variation axes
//! and glyph outlines from either the `glyf` or `CFF` table.
//!
//! Everything is reached through the [`MetadataProvider`] trait, which is
//! implemented for every [`TableProvider`](raw::TableProvider):
//!
//! ```
//! use sfnt_outline::{instance::{LocationRef, Size}, raw::FontRef, MetadataProvider};
//!
//! # fn wrapper(font_data: &[u8]) -> Option<()> {
//! let font = FontRef::new(font_data).ok()?;
//! let glyph_id = font.charmap().map('A')?;
//! let metrics = font.glyph_metrics(Size::new(16.0), LocationRef::default());
//! let _advance = metrics.advance_width(glyph_id);
//! # Some(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

extern crate alloc;

/// Expose our "raw" underlying parser crate.
pub extern crate sfnt_read as raw;

pub mod attribute;
pub mod charmap;
pub mod glyph_class;
pub mod glyph_name;
pub mod instance;
pub mod metrics;
pub mod outline;
pub mod string;
pub mod variation;
pub mod vertical_origin;

mod provider;
mod setting;

pub use outline::{OutlineGlyph, OutlineGlyphCollection, OutlineGlyphFormat};
pub use provider::MetadataProvider;
pub use setting::{ParseSettingError, Setting, VariationSetting};
pub use variation::{Axis, AxisCollection, NamedInstance, NamedInstanceCollection};

/// Type for a glyph identifier.
pub type GlyphId = raw::types::GlyphId;

/// Type for a 4-byte tag used to identify font tables and other resources.
pub type Tag = raw::types::Tag;

/// Type for a normalized variation coordinate.
pub type NormalizedCoord = raw::types::F2Dot14;

/// Maximum depth of nested composite glyphs.
///
/// Deeper nesting, including a component that refers back to one of its
/// ancestors, fails with
/// [`DrawError::RecursionLimitExceeded`](outline::DrawError::RecursionLimitExceeded).
pub const GLYF_COMPOSITE_RECURSION_LIMIT: usize = 8;

/// Maximum number of glyphs, counting every component, loaded to draw a
/// single composite glyph.
///
/// A small font can nest composites that each repeat their child many times;
/// drawing stops with
/// [`DrawError::RecursionLimitExceeded`](outline::DrawError::RecursionLimitExceeded)
/// once this many loads have been made.
pub const GLYF_COMPONENT_LOAD_LIMIT: usize = 4096;
