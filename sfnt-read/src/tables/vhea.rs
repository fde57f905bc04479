//! The [vhea](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea) table

use types::Tag;

/// 'vhea'
pub const TAG: Tag = Tag::new(b"vhea");

/// The vertical header table.
pub type Vhea<'a> = super::hvhea::HVhea<'a>;
