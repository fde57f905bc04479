//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::Tag;

/// 'hmtx'
pub const TAG: Tag = Tag::new(b"hmtx");

/// The horizontal metrics table.
pub type Hmtx<'a> = super::hvmtx::HVmtx<'a>;
