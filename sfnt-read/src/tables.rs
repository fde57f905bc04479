//! The various font tables

pub mod avar;
pub mod cff;
pub mod cmap;
pub mod fvar;
pub mod gdef;
pub mod glyf;
pub mod gvar;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod hvar;
pub mod hvhea;
pub mod hvmtx;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod mvar;
pub mod name;
pub mod os2;
pub mod post;
pub mod postscript;
pub mod variations;
pub mod vhea;
pub mod vmtx;
pub mod vorg;
pub mod vvar;
