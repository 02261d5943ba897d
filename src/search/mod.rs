//! Lookups against a built [`SyncIndex`]
//!
//! - inverse: page position to `(file, line)`
//! - forward: `(file, line)` to a page rectangle
//! - parallel: batches of either, spread over the Rayon pool

pub mod forward;
pub mod geometry;
pub mod inverse;
pub mod parallel;

pub use forward::{forward_lookup, forward_lookup_with};
pub use inverse::{inverse_lookup, inverse_lookup_with};
pub use parallel::{forward_lookup_many, inverse_lookup_many, PagePoint};

use crate::config::SearchConfig;
use crate::index::SyncIndex;

/// Result of an inverse lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Normalized input name (empty when the tag was never declared)
    pub file: String,
    pub line: u32,
}

/// Result of a forward lookup, in page points with `y` growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRegion {
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SyncIndex {
    /// See [`inverse_lookup`]
    pub fn inverse_lookup(&self, page: u32, x: f64, y: f64) -> Option<SourceLocation> {
        inverse_lookup(self, page, x, y)
    }

    /// See [`forward_lookup`]
    pub fn forward_lookup(&self, file: &str, line: u32) -> Option<PageRegion> {
        forward_lookup(self, file, line)
    }

    pub fn inverse_lookup_with(
        &self,
        page: u32,
        x: f64,
        y: f64,
        config: &SearchConfig,
    ) -> Option<SourceLocation> {
        inverse_lookup_with(self, page, x, y, config)
    }

    pub fn forward_lookup_with(
        &self,
        file: &str,
        line: u32,
        config: &SearchConfig,
    ) -> Option<PageRegion> {
        forward_lookup_with(self, file, line, config)
    }
}
