//! The [vmtx (Vertical Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx) table

use types::Tag;

/// 'vmtx'
pub const TAG: Tag = Tag::new(b"vmtx");

/// The vertical metrics table.
pub type Vmtx<'a> = super::hvmtx::HVmtx<'a>;
