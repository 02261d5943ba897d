//! Core stream parsing primitives
//!
//! This module contains the fundamental building blocks for reading a
//! SyncTeX stream:
//! - Decompress: gzip detection and inflation
//! - Scanner: memchr-accelerated line and field splitting
//! - Stream: StreamHandler-based scanner over header and content records
//! - Units: scaled points to page points

pub mod decompress;
pub mod scanner;
pub mod stream;
pub mod units;
