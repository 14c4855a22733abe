//! Interned names for the `opov` workspace.
//!
//! This crate provides:
//!
//! - [`Symbol`]: a 32-bit handle to an interned string
//! - [`StringInterner`]: the per-compile-unit string table, which also
//!   generates collision-free names for code the rewriting pass emits

pub mod interner;
pub mod symbol;

pub use interner::StringInterner;
pub use symbol::Symbol;
