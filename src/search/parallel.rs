//! Batch lookups
//!
//! Uses Rayon to answer many queries against one shared index. The index is
//! immutable once built, so queries need no coordination.

use rayon::prelude::*;

use super::{forward_lookup_with, inverse_lookup_with, PageRegion, SourceLocation};
use crate::config::SearchConfig;
use crate::index::SyncIndex;

/// One inverse query: page plus point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePoint {
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

/// Resolve many page positions in parallel; results keep query order
pub fn inverse_lookup_many(
    index: &SyncIndex,
    points: &[PagePoint],
    config: &SearchConfig,
) -> Vec<Option<SourceLocation>> {
    points
        .par_iter()
        .map(|p| inverse_lookup_with(index, p.page, p.x, p.y, config))
        .collect()
}

/// Resolve many `(file, line)` pairs in parallel; results keep query order
pub fn forward_lookup_many<S: AsRef<str> + Sync>(
    index: &SyncIndex,
    queries: &[(S, u32)],
    config: &SearchConfig,
) -> Vec<Option<PageRegion>> {
    queries
        .par_iter()
        .map(|(file, line)| forward_lookup_with(index, file.as_ref(), *line, config))
        .collect()
}
