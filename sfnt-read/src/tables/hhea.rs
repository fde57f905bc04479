//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::Tag;

/// 'hhea'
pub const TAG: Tag = Tag::new(b"hhea");

/// The horizontal header table.
pub type Hhea<'a> = super::hvhea::HVhea<'a>;
