//! Source-table readers, one module per scan.
//!
//! Each module exposes `each`, which streams typed rows to a callback in
//! result order and stops at the first error, plus the inserts used to
//! build fixtures.

pub mod access;
pub mod bsinfo;
pub mod ipinfo;
