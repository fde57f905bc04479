//! Font fixtures for tests.
//!
//! Everything here is generated at runtime from small table builders, so a
//! test can take a fixture font and alter or drop individual tables.

#[macro_use]
pub mod bebuffer;
pub mod builder;
pub mod cff;
pub mod collection;
pub mod composite;
pub mod glyf;
pub mod glyf_a;
pub mod tables;
pub mod variable;

pub use bebuffer::BeBuffer;
